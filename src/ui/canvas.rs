use crate::ui::constants::{CharBuffer, StyleBuffer, WIDE_CONTINUATION};
use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

// Buffer canvas for drawing characters and styles
pub struct BufferCanvas {
    pub char_buffer: CharBuffer,
    pub style_buffer: StyleBuffer,
    pub width: usize,
    pub height: usize,
}

impl BufferCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            char_buffer: vec![vec![' '; width]; height],
            style_buffer: vec![vec![Style::default(); width]; height],
            width,
            height,
        }
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (y as usize) < self.height && (x as usize) < self.width
    }

    fn put(&mut self, x: usize, y: usize, ch: char, style: Style) {
        // Overwriting half of a wide character blanks the other half
        if self.char_buffer[y][x] == WIDE_CONTINUATION && x > 0 {
            self.char_buffer[y][x - 1] = ' ';
        }
        if x + 1 < self.width && self.char_buffer[y][x + 1] == WIDE_CONTINUATION {
            self.char_buffer[y][x + 1] = ' ';
        }
        self.char_buffer[y][x] = ch;
        self.style_buffer[y][x] = style;
    }

    pub fn set_char(&mut self, x: i64, y: i64, ch: char, style: Style) {
        if self.in_bounds(x, y) {
            self.put(x as usize, y as usize, ch, style);
        }
    }

    /// Writes `text` from `(x, y)`; double-width characters take two cells
    /// and are dropped when they would not fit.
    pub fn draw_styled_text(&mut self, x: i64, y: i64, text: &str, style: Style) {
        let mut col = x;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as i64;
            if w == 0 {
                continue;
            }
            if w == 2 {
                if self.in_bounds(col, y) && self.in_bounds(col + 1, y) {
                    self.put(col as usize, y as usize, ch, style);
                    self.put(col as usize + 1, y as usize, WIDE_CONTINUATION, style);
                }
            } else {
                self.set_char(col, y, ch, style);
            }
            col += w;
        }
    }

    /// Plots a straight line between two cells (Bresenham), endpoints included.
    pub fn draw_line(&mut self, from: (i64, i64), to: (i64, i64), ch: char, style: Style) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_char(x, y, ch, style);
            if (x, y) == to {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn to_lines(&self) -> Vec<Line<'_>> {
        let mut lines = Vec::new();

        for (y, row) in self.char_buffer.iter().enumerate() {
            let mut spans = Vec::new();
            let mut current_style = Style::default();
            let mut current_text = String::new();

            for (x, &ch) in row.iter().enumerate() {
                if ch == WIDE_CONTINUATION {
                    continue;
                }
                let style = self.style_buffer[y][x];
                if style != current_style {
                    if !current_text.is_empty() {
                        spans.push(Span::styled(current_text.clone(), current_style));
                        current_text.clear();
                    }
                    current_style = style;
                }
                current_text.push(ch);
            }

            if !current_text.is_empty() {
                spans.push(Span::styled(current_text, current_style));
            }

            lines.push(Line::from(spans));
        }

        lines
    }

    /// Plain text of a row, for tests and debugging.
    pub fn row_text(&self, y: usize) -> String {
        self.char_buffer
            .get(y)
            .map(|row| row.iter().filter(|&&c| c != WIDE_CONTINUATION).collect())
            .unwrap_or_default()
    }
}
