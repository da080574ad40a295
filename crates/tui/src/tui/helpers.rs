use std::cmp::min;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub const BG_BASE: Color = Color::Rgb(14, 17, 23);
pub const BG_PANEL: Color = Color::Rgb(22, 26, 34);
pub const BG_ACCENT: Color = Color::Rgb(32, 37, 47);
pub const BG_DONE: Color = Color::Rgb(48, 24, 28);
pub const FG_ACCENT: Color = Color::Rgb(120, 161, 255);
pub const FG_DONE: Color = Color::Rgb(234, 59, 59);

/// Gap between the two dialog buttons.
const BUTTON_GAP: u16 = 4;

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = min(width, area.width);
    let h = min(height, area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn inset_rect(area: Rect, padding: u16) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let px = padding.min(area.width / 2);
    let py = padding.min(area.height / 2);
    Rect {
        x: area.x + px,
        y: area.y + py,
        width: area.width.saturating_sub(px * 2),
        height: area.height.saturating_sub(py * 2),
    }
}

pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Padded button caption, e.g. `"  Save  "`.
pub fn button_caption(label: &str) -> String {
    format!("  {label}  ")
}

/// Lay out two buttons side by side, centred on the first row of `area`.
pub fn button_rects(area: Rect, primary: &str, secondary: &str) -> (Rect, Rect) {
    let primary_width = button_caption(primary).chars().count() as u16;
    let secondary_width = button_caption(secondary).chars().count() as u16;
    let total = primary_width + BUTTON_GAP + secondary_width;
    let start = area.x + area.width.saturating_sub(total) / 2;

    let primary_rect = Rect {
        x: start,
        y: area.y,
        width: primary_width.min(area.width),
        height: area.height.min(1),
    };
    let secondary_x = start + primary_width + BUTTON_GAP;
    let secondary_rect = Rect {
        x: secondary_x,
        y: area.y,
        width: secondary_width.min(area.right().saturating_sub(secondary_x)),
        height: area.height.min(1),
    };
    (primary_rect, secondary_rect)
}

pub fn build_help_lines() -> Vec<(&'static str, &'static str)> {
    vec![
        ("i / a", "Focus the task input"),
        ("Enter (input)", "Add the typed task"),
        ("Esc (input)", "Leave the input and work with the list"),
        ("j / k or ↓ / ↑", "Move selection"),
        ("Space", "Toggle done"),
        ("e", "Rename selected task"),
        ("x / Delete", "Delete task (with confirmation)"),
        ("D", "Delete completed tasks"),
        ("X", "Delete all tasks"),
        ("1 / 2 / 3", "Show all, active, or done tasks"),
        ("Tab / Shift+Tab", "Cycle the filter"),
        ("h / ?", "Toggle this help overlay"),
        ("q / Ctrl+C", "Quit"),
        ("Dialogs", "←/→ choose • Enter activates • Esc or click outside cancels"),
    ]
}

pub fn accent_title(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_owned(),
        Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
    )])
}

pub fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
