use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::morse::Symbol;
use crate::session::input::SymbolInput;
use crate::session::quiz::{QuizSession, QuizState};
use crate::ui::theme::Theme;

/// Spaced-out symbols so dots and dashes stay readable.
pub fn render_symbols(input: &SymbolInput) -> String {
    input
        .symbols()
        .iter()
        .map(|s| match s {
            Symbol::Dot => "•",
            Symbol::Dash => "—",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn feedback_text(state: QuizState) -> Option<&'static str> {
    match state {
        QuizState::Correct => Some("Correct!"),
        QuizState::Incorrect => Some("Try Again!"),
        QuizState::TimeExpired => Some("Time's Up!"),
        _ => None,
    }
}

/// Dot/dash key legend with the last pressed key highlighted briefly.
pub fn key_legend<'a>(flash: Option<Symbol>, theme: &Theme) -> Line<'a> {
    let colors = &theme.colors;
    let key = |symbol: Symbol, label: &'static str| {
        let style = if flash == Some(symbol) {
            Style::default()
                .fg(colors.bg())
                .bg(colors.key_flash())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg()).bg(colors.accent_dim())
        };
        Span::styled(label, style)
    };
    Line::from(vec![
        key(Symbol::Dot, "  [z] •  "),
        Span::raw("   "),
        key(Symbol::Dash, "  [x] —  "),
    ])
}

pub struct ChallengeArea<'a> {
    quiz: &'a QuizSession,
    now: Instant,
    theme: &'a Theme,
}

impl<'a> ChallengeArea<'a> {
    pub fn new(quiz: &'a QuizSession, now: Instant, theme: &'a Theme) -> Self {
        Self { quiz, now, theme }
    }
}

impl Widget for ChallengeArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let state = self.quiz.state();

        let border = match state {
            QuizState::Correct => colors.success(),
            QuizState::Incorrect | QuizState::TimeExpired => colors.error(),
            _ => colors.border_focused(),
        };
        let block = Block::bordered()
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        let Some(challenge) = self.quiz.challenge() else {
            Paragraph::new(self.quiz.summary().status_line())
                .alignment(Alignment::Center)
                .style(Style::default().fg(colors.success()))
                .render(inner, buf);
            return;
        };

        let kind = if self.quiz.is_word_challenge() { "word" } else { "character" };
        Paragraph::new(Line::from(Span::styled(
            format!("Translate this {kind}:"),
            Style::default().fg(colors.text_pending()),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        Paragraph::new(Line::from(Span::styled(
            challenge.to_string(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[1], buf);

        let input_style = match state {
            QuizState::Correct => Style::default().fg(colors.text_correct()),
            QuizState::Incorrect | QuizState::TimeExpired => Style::default()
                .fg(colors.text_incorrect())
                .add_modifier(Modifier::CROSSED_OUT),
            _ => Style::default().fg(colors.fg()),
        };
        let input_text = if self.quiz.input().is_empty() {
            "_".to_string()
        } else {
            render_symbols(self.quiz.input())
        };
        Paragraph::new(Line::from(Span::styled(input_text, input_style)))
            .alignment(Alignment::Center)
            .render(layout[2], buf);

        Paragraph::new(key_legend(self.quiz.input().flash(self.now), self.theme))
            .alignment(Alignment::Center)
            .render(layout[3], buf);

        if let Some(text) = feedback_text(state) {
            let color = if state == QuizState::Correct {
                colors.success()
            } else {
                colors.error()
            };
            Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .render(layout[4], buf);
        }

        let hint = self.quiz.hint();
        let hint_line = if hint.is_loading() {
            Some(Line::from(Span::styled(
                "Getting hint...",
                Style::default().fg(colors.text_pending()),
            )))
        } else {
            hint.visible_text().map(|text| {
                Line::from(Span::styled(
                    text.to_string(),
                    Style::default().fg(colors.fg()),
                ))
            })
        };
        if let Some(line) = hint_line {
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(layout[5], buf);
        }
    }
}
