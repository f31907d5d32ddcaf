use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::ExerciseResult;
use crate::ui::theme::Theme;

pub struct ResultPanel<'a> {
    result: &'a ExerciseResult,
    best_wpm: Option<u32>,
    theme: &'a Theme,
}

impl<'a> ResultPanel<'a> {
    pub fn new(result: &'a ExerciseResult, best_wpm: Option<u32>, theme: &'a Theme) -> Self {
        Self {
            result,
            best_wpm,
            theme,
        }
    }
}

impl Widget for ResultPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Exercise Complete ")
            .border_style(Style::default().fg(colors.accent()))
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
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.result.label.as_str(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let best = match self.best_wpm {
            Some(best) if best > self.result.wpm => format!("  (best {best})"),
            Some(_) => "  (new best)".to_string(),
            None => String::new(),
        };
        Paragraph::new(Line::from(vec![
            Span::styled("  Speed:    ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{} WPM", self.result.wpm),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(best, Style::default().fg(colors.text_pending())),
        ]))
        .render(layout[1], buf);

        let acc_color = if self.result.accuracy >= 95.0 {
            colors.success()
        } else {
            colors.error()
        };
        Paragraph::new(Line::from(vec![
            Span::styled("  Accuracy: ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{:.1}%", self.result.accuracy),
                Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({}/{} correct)", self.result.correct, self.result.total_chars),
                Style::default().fg(colors.text_pending()),
            ),
        ]))
        .render(layout[2], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("  Time:     ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{:.1}s", self.result.elapsed_secs),
                Style::default().fg(colors.fg()),
            ),
        ]))
        .render(layout[3], buf);

        Paragraph::new(Line::from(Span::styled(
            "  [Enter] Next  [r] Retry  [Esc] Exercises",
            Style::default().fg(colors.accent()),
        )))
        .render(layout[5], buf);
    }
}
