//! Text rendering of the calculator panel and the history sidebar.

use crate::history::History;

use super::BufferDisplay;

/// Shown in the sidebar before anything has been computed.
pub const NO_HISTORY_MESSAGE: &str = "No history yet";

/// Render the display as two right-aligned lines.
///
/// The equation line sits above the value, which carries a `= ` prefix
/// once an equation is shown.
pub fn render_panel(display: &BufferDisplay, width: usize) -> String {
    let equation = display.equation().unwrap_or("");

    let value = if display.equation().is_some() {
        format!("= {}", display.value())
    } else {
        display.value().to_string()
    };

    let border = "─".repeat(width);
    format!(
        "┌{border}┐\n│{}│\n│{}│\n└{border}┘",
        align_right(equation, width),
        align_right(&value, width),
    )
}

/// Render the history sidebar, oldest entry first.
pub fn render_history(history: &History, width: usize) -> String {
    if history.is_empty() {
        return NO_HISTORY_MESSAGE.to_string();
    }

    let mut lines = Vec::with_capacity(history.len() * 2);
    for entry in history.entries() {
        lines.push(align_right(&entry.equation, width));

        let marker = if entry.is_error { "!" } else { " " };
        lines.push(align_right(&format!("{}{}", marker, entry.result), width));
    }
    lines.join("\n")
}

/// Right-align text to `width` columns, keeping the tail when it is too long.
fn align_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.chars().skip(len - width).collect()
    } else {
        format!("{}{}", " ".repeat(width - len), text)
    }
}
