use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};

use crate::engine::timing::{self, Urgency};
use crate::ui::theme::Theme;

pub struct ProgressBar<'a> {
    pub label: String,
    pub ratio: f64,
    pub caption: Option<String>,
    pub fill: Option<Color>,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            ratio: ratio.clamp(0.0, 1.0),
            caption: None,
            fill: None,
            theme,
        }
    }

    /// Countdown bar coloured by how much time is left.
    pub fn countdown(remaining_secs: f64, ratio: f64, theme: &'a Theme) -> Self {
        let colors = &theme.colors;
        let fill = match timing::urgency(ratio) {
            Urgency::Calm => colors.success(),
            Urgency::Hurry => colors.warning(),
            Urgency::Critical => colors.error(),
        };
        Self {
            label: "Time".to_string(),
            ratio: ratio.clamp(0.0, 1.0),
            caption: Some(format!("{remaining_secs:.1}s")),
            fill: Some(fill),
            theme,
        }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64) as u16;
        let fill = self.fill.unwrap_or_else(|| colors.bar_filled());
        let label = self
            .caption
            .unwrap_or_else(|| format!("{:.0}%", self.ratio * 100.0));

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(fill)
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}
