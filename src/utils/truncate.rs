//! Truncation Utilities
//!
//! Length caps for collaborator-provided text. Cuts land on UTF-8 and,
//! where possible, word boundaries.

const ELLIPSIS: &str = "...";

/// Keep the head of `content` within `max_bytes`, appending `...` when
/// anything was dropped. The result never exceeds `max_bytes`; budgets too
/// small for the marker get a bare cut.
pub fn truncate_text(content: &str, max_bytes: usize) -> String {
    if content.len() <= max_bytes {
        return content.to_string();
    }
    if max_bytes < ELLIPSIS.len() {
        return content[..floor_char_boundary(content, max_bytes)].to_string();
    }

    let head = &content[..floor_char_boundary(content, max_bytes - ELLIPSIS.len())];
    let head = match head.rfind(char::is_whitespace) {
        Some(space) if space > 0 => head[..space].trim_end(),
        _ => head,
    };

    format!("{}{}", head, ELLIPSIS)
}

fn floor_char_boundary(content: &str, mut end: usize) -> usize {
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    end
}
