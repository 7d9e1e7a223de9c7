use ratatui::style::Style;

// Type aliases for clarity
pub type CharBuffer = Vec<Vec<char>>;
pub type StyleBuffer = Vec<Vec<Style>>;

// Constants for rendering
pub const CURSOR_INDICATOR: char = '▌';
pub const STATUS_EDIT_PREFIX: &str = "Edit: ";
pub const STATUS_TITLE_PREFIX: &str = "Map title: ";

// Right half of a double-width character; never printed
pub const WIDE_CONTINUATION: char = '\0';

pub const EDGE_CHAR: char = '·';
pub const AI_MARKER: &str = "✦ ";
pub const PENDING_MARKER: &str = " …";

// Widest label, in terminal cells
pub const LABEL_MAX_WIDTH: usize = 24;
// Cells kept free around the drawing so labels at the edges fit
pub const MARGIN_X: f64 = 12.0;
pub const MARGIN_Y: f64 = 1.0;
// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f64 = 2.0;
// Rows per layout unit when the map is tiny (a lone root)
pub const MAX_SCALE: f64 = 0.04;
