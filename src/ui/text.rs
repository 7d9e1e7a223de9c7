use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Shortens `text` to at most `max_width` terminal cells, ending with `…`
/// when something was cut.
pub fn fit_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        // Leave one cell for the ellipsis
        if width + w > max_width - 1 {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

/// Single-line label: newlines and tabs become spaces.
pub fn label(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
