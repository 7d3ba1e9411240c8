use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Character drawn in place of hidden text.
const MASK_CHAR: char = '•';

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for the overlay.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Scale a popup percentage by an animation progress, never below `floor`.
pub(crate) fn animated_percent(full: u16, floor: u16, progress: f32) -> u16 {
    let span = full.saturating_sub(floor) as f32;
    let scaled = floor as f32 + span * progress.clamp(0.0, 1.0);
    (scaled.round() as u16).clamp(floor, full)
}

/// Hide `text` while keeping its on-screen width, so the layout does not jump
/// when it is revealed.
pub(crate) fn mask_text(text: &str) -> String {
    let width = text.width();
    if width == 0 {
        return String::new();
    }
    MASK_CHAR.to_string().repeat(width)
}

/// Cut `text` to at most `max_width` terminal columns, marking the cut with an
/// ellipsis. Wide CJK characters count as two columns.
pub(crate) fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Two-digit position badge shown at the left of each card.
pub(crate) fn index_badge(index: usize) -> String {
    format!("{:02}", index + 1)
}

/// Greedy word wrap by terminal columns. Words wider than `width` (long runs
/// of CJK text have no spaces) are split between characters.
pub(crate) fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        let gap = usize::from(!current.is_empty());
        if current_width + gap + word_width <= width {
            if gap == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += gap + word_width;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        for ch in word.chars() {
            let w = ch.width().unwrap_or(0);
            if current_width + w > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += w;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
