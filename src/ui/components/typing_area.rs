use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::input::CharStatus;
use crate::session::typing::TypingState;
use crate::ui::theme::Theme;

/// Renders the exercise text right to left.
///
/// Terminals lay cells out left to right without bidi reordering, so each
/// visual row is reversed here and aligned to the right edge.
pub struct TypingArea<'a> {
    typing: &'a TypingState,
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(typing: &'a TypingState, title: &'a str, theme: &'a Theme) -> Self {
        Self {
            typing,
            title,
            theme,
        }
    }
}

/// A render token maps a single target character to its display representation.
#[derive(Debug)]
struct RenderToken {
    target_idx: usize,
    display: char,
    is_line_break: bool,
}

fn build_render_tokens(target: &[char]) -> Vec<RenderToken> {
    target
        .iter()
        .enumerate()
        .map(|(i, &ch)| RenderToken {
            target_idx: i,
            display: if ch == '\n' { '\u{21b5}' } else { ch },
            is_line_break: ch == '\n',
        })
        .collect()
}

/// Splits tokens into rows no wider than `width`, breaking after line
/// breaks. Rows keep logical order.
fn layout_rows(tokens: &[RenderToken], width: usize) -> Vec<&[RenderToken]> {
    let mut rows = Vec::new();
    if width == 0 {
        return rows;
    }
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if token.is_line_break || i + 1 - start == width {
            rows.push(&tokens[start..=i]);
            start = i + 1;
        }
    }
    if start < tokens.len() {
        rows.push(&tokens[start..]);
    }
    rows
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let tokens = build_render_tokens(&self.typing.target);
        let typing = self.typing;

        let lines: Vec<Line> = layout_rows(&tokens, inner.width as usize)
            .into_iter()
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .rev()
                    .map(|token| {
                        let idx = token.target_idx;
                        let (display, style) = if idx < typing.cursor {
                            match typing.input[idx] {
                                CharStatus::Correct => {
                                    (token.display, Style::default().fg(colors.text_correct()))
                                }
                                CharStatus::Incorrect(actual) => (
                                    if token.is_line_break { token.display } else { actual },
                                    Style::default()
                                        .fg(colors.text_incorrect())
                                        .bg(colors.text_incorrect_bg())
                                        .add_modifier(Modifier::UNDERLINED),
                                ),
                            }
                        } else if idx == typing.cursor {
                            (
                                token.display,
                                Style::default()
                                    .fg(colors.text_cursor_fg())
                                    .bg(colors.text_cursor_bg()),
                            )
                        } else {
                            (token.display, Style::default().fg(colors.text_pending()))
                        };
                        Span::styled(display.to_string(), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .alignment(Alignment::Right)
            .render(inner, buf);
    }
}
