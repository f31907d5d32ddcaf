use ratatui::layout::{Constraint, Direction, Layout, Rect};

const KEYBOARD_HEIGHT: u16 = 5;
const PROGRESS_HEIGHT: u16 = 3;

/// Regions of the typing screen. Optional panels are dropped when the
/// terminal is too short or the user hid them.
pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub progress: Option<Rect>,
    pub keyboard: Option<Rect>,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect, want_keyboard: bool) -> Self {
        let show_extras = area.height >= 20 && area.width >= 60;
        let show_keyboard = show_extras && want_keyboard;

        let mut constraints = vec![Constraint::Length(3), Constraint::Min(5)];
        if show_extras {
            constraints.push(Constraint::Length(PROGRESS_HEIGHT));
        }
        if show_keyboard {
            constraints.push(Constraint::Length(KEYBOARD_HEIGHT));
        }
        constraints.push(Constraint::Length(2));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut next = 2;
        let progress = show_extras.then(|| {
            let rect = chunks[next];
            next += 1;
            rect
        });
        let keyboard = show_keyboard.then(|| {
            let rect = chunks[next];
            next += 1;
            rect
        });

        Self {
            header: chunks[0],
            main: chunks[1],
            progress,
            keyboard,
            footer: chunks[next],
        }
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let target_w = (area.width.saturating_mul(percent_x.min(100)) / 100).min(area.width);
    let target_h = (area.height.saturating_mul(percent_y.min(100)) / 100).min(area.height);
    let left = area.x + (area.width - target_w) / 2;
    let top = area.y + (area.height - target_h) / 2;
    Rect::new(left, top, target_w, target_h)
}
