use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::catalog::Catalog;
use crate::engine::progression::ProgressionTracker;
use crate::ui::theme::Theme;

/// Row 0 is the practice entry; row `i + 1` is catalog level `i`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelListState {
    pub selected: usize,
    pub offset: usize,
}

impl LevelListState {
    pub const PRACTICE_ROW: usize = 0;

    pub fn row_for_level(level_index: usize) -> usize {
        Self::PRACTICE_ROW + 1 + level_index
    }

    /// `None` when the practice entry is selected.
    pub fn selected_level(&self) -> Option<usize> {
        self.selected.checked_sub(Self::PRACTICE_ROW + 1)
    }

    pub fn move_by(&mut self, delta: isize, rows: usize) {
        if rows == 0 {
            return;
        }
        let max = rows - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(max);
    }

    pub fn select(&mut self, row: usize, rows: usize) {
        self.selected = row.min(rows.saturating_sub(1));
    }

    /// Scroll so the selection sits inside a window of `height` rows.
    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
    }

    /// Centre the selection, used after finishing a level.
    pub fn center_on_selected(&mut self, height: usize) {
        self.offset = self.selected.saturating_sub(height / 2);
    }
}

pub struct LevelList<'a> {
    catalog: &'a Catalog,
    tracker: &'a ProgressionTracker,
    state: &'a LevelListState,
    show_preview: bool,
    theme: &'a Theme,
}

impl<'a> LevelList<'a> {
    pub fn new(
        catalog: &'a Catalog,
        tracker: &'a ProgressionTracker,
        state: &'a LevelListState,
        theme: &'a Theme,
    ) -> Self {
        Self {
            catalog,
            tracker,
            state,
            show_preview: true,
            theme,
        }
    }

    pub fn show_preview(mut self, show: bool) -> Self {
        self.show_preview = show;
        self
    }

    fn practice_line(&self, selected: bool) -> Line<'static> {
        let colors = &self.theme.colors;
        let indicator = if selected { ">" } else { " " };
        Line::from(vec![
            Span::styled(
                format!(" {indicator} [p] Practice Mode"),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(if selected { Modifier::BOLD } else { Modifier::empty() }),
            ),
            Span::styled(
                "   untimed trainer, letters and numbers",
                Style::default().fg(colors.text_pending()),
            ),
        ])
    }

    fn level_line(&self, level_index: usize, selected: bool) -> Line<'static> {
        let colors = &self.theme.colors;
        let Some(level) = self.catalog.get(level_index) else {
            return Line::from("");
        };
        let unlocked = self.tracker.is_unlocked(level_index);
        let indicator = if selected { ">" } else { " " };
        let marker = if !unlocked {
            "[locked]"
        } else if level_index < self.tracker.highest_unlocked() {
            "[done]  "
        } else {
            "[open]  "
        };

        let name_style = if !unlocked {
            Style::default().fg(colors.locked())
        } else if selected {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg())
        };
        let marker_style = if unlocked {
            Style::default().fg(colors.success())
        } else {
            Style::default().fg(colors.locked())
        };

        let mut spans = vec![
            Span::styled(format!(" {indicator} {:>4}. ", level_index + 1), name_style),
            Span::styled(marker.to_string(), marker_style),
            Span::styled(format!(" {}", level.name), name_style),
        ];
        if self.show_preview && unlocked {
            spans.push(Span::styled(
                format!("   {}", level.preview()),
                Style::default().fg(colors.text_pending()),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for LevelList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Levels ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        let total = self.catalog.len();
        let header = Paragraph::new(Line::from(Span::styled(
            format!(
                " You have unlocked {} of {} levels",
                self.tracker.unlocked_count(total),
                total
            ),
            Style::default().fg(colors.fg()),
        )));
        header.render(layout[0], buf);

        let rows = layout[1];
        let height = rows.height as usize;
        let lines: Vec<Line> = (self.state.offset..(self.state.offset + height).min(total + 1))
            .map(|row| {
                let selected = row == self.state.selected;
                match row.checked_sub(1) {
                    None => self.practice_line(selected),
                    Some(level_index) => self.level_line(level_index, selected),
                }
            })
            .collect();
        Paragraph::new(lines).render(rows, buf);
    }
}
