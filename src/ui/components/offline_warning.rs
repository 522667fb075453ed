use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub struct OfflineWarning<'a> {
    theme: &'a Theme,
}

impl<'a> OfflineWarning<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for OfflineWarning<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Offline ")
            .border_style(Style::default().fg(colors.warning()))
            .style(Style::default().bg(colors.bg()));

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "You are offline",
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "An internet connection is needed for AI hints.",
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(
                "Levels will reappear once the connection is back.",
                Style::default().fg(colors.text_pending()),
            )),
        ];

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
