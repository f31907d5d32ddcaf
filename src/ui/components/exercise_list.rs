use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::exercise::{CatalogEntry, ExerciseKind};
use crate::store::schema::HistoryData;
use crate::ui::theme::Theme;

/// The exercise menu: one row per catalog entry with the best recorded
/// speed, scrolled so the selection stays visible.
pub struct ExerciseList<'a> {
    pub entries: &'a [CatalogEntry],
    pub selected: usize,
    pub history: &'a HistoryData,
    pub theme: &'a Theme,
}

impl<'a> ExerciseList<'a> {
    pub fn new(
        entries: &'a [CatalogEntry],
        selected: usize,
        history: &'a HistoryData,
        theme: &'a Theme,
    ) -> Self {
        Self {
            entries,
            selected,
            history,
            theme,
        }
    }
}

/// First row to draw so that `selected` sits inside a window of `height`.
fn scroll_offset(selected: usize, height: usize, len: usize) -> usize {
    if height == 0 || len <= height {
        return 0;
    }
    selected
        .saturating_sub(height / 2)
        .min(len - height)
}

fn kind_marker(kind: ExerciseKind) -> &'static str {
    match kind {
        ExerciseKind::Practice => "·",
        ExerciseKind::Review => "↺",
        ExerciseKind::Text => "¶",
    }
}

impl Widget for ExerciseList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(inner);

        let title_lines = vec![
            Line::from(Span::styled(
                "otiyot",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Hebrew Typing Tutor",
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let list_area = layout[1];
        let height = list_area.height as usize;
        let offset = scroll_offset(self.selected, height, self.entries.len());

        let lines: Vec<Line> = self
            .entries
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, entry)| {
                let is_selected = i == self.selected;
                let indicator = if is_selected { ">" } else { " " };
                let best = self
                    .history
                    .best_wpm(&entry.id)
                    .map(|wpm| format!("  best {wpm} wpm"))
                    .unwrap_or_default();
                let style = if is_selected {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {indicator} {:>3} {} {}", i + 1, kind_marker(entry.kind), entry.label),
                        style,
                    ),
                    Span::styled(best, Style::default().fg(colors.text_pending())),
                ])
            })
            .collect();

        Paragraph::new(lines).render(list_area, buf);
    }
}
