use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction as Axis, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::trainer::{Direction, TrainerSession};
use crate::ui::components::challenge_area::{key_legend, render_symbols};
use crate::ui::theme::Theme;

pub struct TrainerPanel<'a> {
    trainer: &'a TrainerSession,
    now: Instant,
    theme: &'a Theme,
}

impl<'a> TrainerPanel<'a> {
    pub fn new(trainer: &'a TrainerSession, now: Instant, theme: &'a Theme) -> Self {
        Self {
            trainer,
            now,
            theme,
        }
    }

    fn settings_line(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        let value_style = if self.trainer.is_running() {
            Style::default().fg(colors.text_pending())
        } else {
            Style::default().fg(colors.accent())
        };
        Line::from(vec![
            Span::styled("[d] ", Style::default().fg(colors.text_pending())),
            Span::styled(self.trainer.direction().label(), value_style),
            Span::raw("    "),
            Span::styled("[c] ", Style::default().fg(colors.text_pending())),
            Span::styled(self.trainer.charset().label(), value_style),
        ])
    }

    fn prompt_line(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        let big = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        match (self.trainer.direction(), self.trainer.challenge()) {
            (_, None) => Line::from(Span::styled(
                "Press Space to start",
                Style::default().fg(colors.text_pending()),
            )),
            (Direction::TextToSymbols, Some(ch)) => Line::from(Span::styled(ch.to_string(), big)),
            (Direction::SymbolsToText, Some(ch)) => {
                if self.trainer.is_playing(self.now) {
                    Line::from(Span::styled("Listening...", big))
                } else if self.trainer.is_revealed() {
                    Line::from(vec![
                        Span::styled(self.trainer.code().to_string(), big),
                        Span::styled(
                            format!("  ({ch})"),
                            Style::default().fg(colors.warning()),
                        ),
                    ])
                } else {
                    Line::from(Span::styled("?", big))
                }
            }
        }
    }

    fn answer_line(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        let text = match self.trainer.direction() {
            Direction::TextToSymbols => {
                if self.trainer.input().is_empty() {
                    "_".to_string()
                } else {
                    render_symbols(self.trainer.input())
                }
            }
            Direction::SymbolsToText => self
                .trainer
                .typed()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "_".to_string()),
        };
        Line::from(Span::styled(text, Style::default().fg(colors.fg())))
    }
}

impl Widget for TrainerPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Practice Mode ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Axis::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        Paragraph::new(self.settings_line())
            .alignment(Alignment::Center)
            .render(layout[0], buf);
        Paragraph::new(self.prompt_line())
            .alignment(Alignment::Center)
            .render(layout[1], buf);

        if self.trainer.is_running() {
            Paragraph::new(self.answer_line())
                .alignment(Alignment::Center)
                .render(layout[2], buf);
            if self.trainer.direction() == Direction::TextToSymbols {
                Paragraph::new(key_legend(self.trainer.input().flash(self.now), self.theme))
                    .alignment(Alignment::Center)
                    .render(layout[3], buf);
            }
        }

        if let Some(feedback) = self.trainer.feedback() {
            let color = if feedback.is_correct() {
                colors.success()
            } else {
                colors.error()
            };
            let mut lines = vec![Line::from(Span::styled(
                feedback.message(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))];
            if let Some(note) = feedback.keyed_note() {
                lines.push(Line::from(Span::styled(
                    note,
                    Style::default().fg(colors.text_pending()),
                )));
            }
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .render(layout[4], buf);
        }
    }
}
