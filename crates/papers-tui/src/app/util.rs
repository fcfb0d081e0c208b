use std::io::Write;

use ratatui::layout::Rect;

/// Copy text to the system clipboard via OSC 52 escape sequence.
/// Works in Ghostty, iTerm2, kitty, WezTerm, and most modern terminals.
pub(super) fn osc52_copy(text: &str) {
    use base64::Engine;
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    // Write directly to stdout, bypassing the terminal backend buffer
    let _ = std::io::stdout().write_all(format!("\x1b]52;c;{}\x07", encoded).as_bytes());
    let _ = std::io::stdout().flush();
}

/// Row index under a click inside a bordered list whose first data row sits
/// `header_rows` below the top border.
pub(super) fn clicked_row(area: Rect, header_rows: u16, x: u16, y: u16) -> Option<usize> {
    let top = area.y + 1 + header_rows;
    let bottom = area.y + area.height.saturating_sub(1);
    if x <= area.x || x >= area.x + area.width.saturating_sub(1) || y < top || y >= bottom {
        return None;
    }
    Some((y - top) as usize)
}

/// Single-line edit buffer operations. `cursor` is a byte offset that always
/// sits on a char boundary.
pub(super) fn insert_char(buffer: &mut String, cursor: &mut usize, ch: char) {
    buffer.insert(*cursor, ch);
    *cursor += ch.len_utf8();
}

pub(super) fn backspace(buffer: &mut String, cursor: &mut usize) {
    if *cursor > 0 {
        let prev = prev_boundary(buffer, *cursor);
        buffer.drain(prev..*cursor);
        *cursor = prev;
    }
}

pub(super) fn delete_forward(buffer: &mut String, cursor: usize) {
    if cursor < buffer.len() {
        let next = next_boundary(buffer, cursor);
        buffer.drain(cursor..next);
    }
}

pub(super) fn cursor_left(buffer: &str, cursor: &mut usize) {
    *cursor = prev_boundary(buffer, *cursor);
}

pub(super) fn cursor_right(buffer: &str, cursor: &mut usize) {
    *cursor = next_boundary(buffer, *cursor);
}

fn prev_boundary(buffer: &str, cursor: usize) -> usize {
    buffer[..cursor]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_boundary(buffer: &str, cursor: usize) -> usize {
    cursor
        + buffer[cursor..]
            .chars()
            .next()
            .map(|c| c.len_utf8())
            .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_buffer_handles_multibyte_chars() {
        let mut buf = String::from("ab");
        let mut cur = 1;
        insert_char(&mut buf, &mut cur, '\u{e9}');
        assert_eq!(buf, "a\u{e9}b");
        assert_eq!(cur, 3);
        cursor_left(&buf, &mut cur);
        assert_eq!(cur, 1);
        cursor_right(&buf, &mut cur);
        backspace(&mut buf, &mut cur);
        assert_eq!(buf, "ab");
        delete_forward(&mut buf, 0);
        assert_eq!(buf, "b");
    }

    #[test]
    fn clicked_row_skips_border_and_header() {
        let area = Rect::new(0, 2, 40, 10);
        assert_eq!(clicked_row(area, 1, 5, 2), None);
        assert_eq!(clicked_row(area, 1, 5, 3), None);
        assert_eq!(clicked_row(area, 1, 5, 4), Some(0));
        assert_eq!(clicked_row(area, 0, 5, 3), Some(0));
        assert_eq!(clicked_row(area, 1, 5, 11), None);
    }
}
