use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};

use crate::keyboard::finger::{self, Finger, Hand};
use crate::keyboard::layout::HebrewLayout;
use crate::ui::theme::Theme;

/// The Hebrew layout in physical key order. Known letters take their
/// finger's color; the next expected key is highlighted when hints are on.
pub struct KeyboardDiagram<'a> {
    pub layout: &'a HebrewLayout,
    pub next_key: Option<char>,
    pub known_letters: &'a [char],
    pub theme: &'a Theme,
}

impl<'a> KeyboardDiagram<'a> {
    pub fn new(
        layout: &'a HebrewLayout,
        next_key: Option<char>,
        known_letters: &'a [char],
        theme: &'a Theme,
    ) -> Self {
        Self {
            layout,
            next_key,
            known_letters,
            theme,
        }
    }
}

fn finger_color(layout: &HebrewLayout, ch: char) -> Color {
    let Some(assignment) = finger::hebrew_finger(layout, ch) else {
        return Color::Rgb(120, 120, 120);
    };
    match (assignment.hand, assignment.finger) {
        (Hand::Left, Finger::Pinky) => Color::Rgb(180, 100, 100),
        (Hand::Left, Finger::Ring) => Color::Rgb(180, 140, 80),
        (Hand::Left, Finger::Middle) => Color::Rgb(120, 160, 80),
        (Hand::Left, Finger::Index) => Color::Rgb(80, 140, 180),
        (Hand::Right, Finger::Index) => Color::Rgb(100, 140, 200),
        (Hand::Right, Finger::Middle) => Color::Rgb(120, 160, 80),
        (Hand::Right, Finger::Ring) => Color::Rgb(180, 140, 80),
        (Hand::Right, Finger::Pinky) => Color::Rgb(180, 100, 100),
        _ => Color::Rgb(120, 120, 120),
    }
}

impl Widget for KeyboardDiagram<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Keyboard ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 3 || inner.width < 30 {
            return;
        }

        let key_width: u16 = 5;
        let offsets: &[u16] = &[1, 3, 5];

        for (row_idx, row) in self.layout.rows().iter().enumerate() {
            let y = inner.y + row_idx as u16;
            if y >= inner.y + inner.height {
                break;
            }

            let offset = offsets.get(row_idx).copied().unwrap_or(0);

            for (col_idx, cap) in row.iter().enumerate() {
                let x = inner.x + offset + col_idx as u16 * key_width;
                if x + key_width > inner.x + inner.width {
                    break;
                }

                let key = cap.hebrew;
                let style = if self.next_key == Some(key) {
                    Style::default().fg(colors.bg()).bg(colors.focused_key())
                } else if self.known_letters.contains(&key) {
                    Style::default()
                        .fg(colors.fg())
                        .bg(finger_color(self.layout, key))
                } else {
                    Style::default().fg(colors.text_pending()).bg(colors.bg())
                };

                buf.set_string(x, y, format!("[ {key} ]"), style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(next: Option<char>, known: &[char]) -> Buffer {
        let layout = HebrewLayout::new();
        let theme = Theme::default();
        let area = Rect::new(0, 0, 64, 5);
        let mut buf = Buffer::empty(area);
        KeyboardDiagram::new(&layout, next, known, &theme).render(area, &mut buf);
        buf
    }

    #[test]
    fn keys_show_hebrew_letters() {
        let buf = render(None, &[]);
        // Home row starts at inner x 1 + offset 3; 'כ' is the fourth key.
        assert_eq!(buf[(1 + 3 + 3 * 5 + 2, 2)].symbol(), "כ");
    }

    #[test]
    fn next_key_is_highlighted() {
        let theme = Theme::default();
        let buf = render(Some('כ'), &['כ']);
        let cell = &buf[(1 + 3 + 3 * 5 + 2, 2)];
        assert_eq!(cell.bg, theme.colors.focused_key());
    }

    #[test]
    fn known_letter_takes_finger_color() {
        let layout = HebrewLayout::new();
        let buf = render(None, &['ח']);
        let cell = &buf[(1 + 3 + 6 * 5 + 2, 2)];
        assert_eq!(cell.symbol(), "ח");
        assert_eq!(cell.bg, finger_color(&layout, 'ח'));
    }
}
