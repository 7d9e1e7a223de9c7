use crate::app::AppState;
use crate::layout::{Bounds, LayoutEngine, LayoutNode};
use crate::model::{Position, ThemeColor};
use crate::ui::canvas::BufferCanvas;
use crate::ui::constants::{
    AI_MARKER, CELL_ASPECT, EDGE_CHAR, LABEL_MAX_WIDTH, MARGIN_X, MARGIN_Y, MAX_SCALE, PENDING_MARKER,
};
use crate::ui::text::{fit_width, label};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Maps layout coordinates onto terminal cells, fitting the layout's
/// bounding box into the canvas and keeping circles round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    scale_x: f64,
    scale_y: f64,
    center: Position,
    canvas_center: (f64, f64),
}

impl Projection {
    pub fn fit(bounds: &Bounds, width: usize, height: usize) -> Self {
        let usable_w = (width as f64 - 2.0 * MARGIN_X).max(1.0);
        let usable_h = (height as f64 - 2.0 * MARGIN_Y).max(1.0);

        let by_width = if bounds.width() > 0.0 {
            usable_w / (bounds.width() * CELL_ASPECT)
        } else {
            f64::INFINITY
        };
        let by_height = if bounds.height() > 0.0 {
            usable_h / bounds.height()
        } else {
            f64::INFINITY
        };
        let scale_y = by_width.min(by_height).min(MAX_SCALE);

        Self {
            scale_x: scale_y * CELL_ASPECT,
            scale_y,
            center: Position::new(
                (bounds.min_x + bounds.max_x) / 2.0,
                (bounds.min_y + bounds.max_y) / 2.0,
            ),
            canvas_center: (width as f64 / 2.0, height as f64 / 2.0),
        }
    }

    pub fn project(&self, p: Position) -> (i64, i64) {
        let x = self.canvas_center.0 + (p.x - self.center.x) * self.scale_x;
        let y = self.canvas_center.1 + (p.y - self.center.y) * self.scale_y;
        (x.floor() as i64, y.floor() as i64)
    }
}

fn accent(color: ThemeColor) -> Color {
    let (r, g, b) = color.accent();
    Color::Rgb(r, g, b)
}

// Mind map renderer
pub struct MindMapRenderer<'a> {
    app: &'a AppState,
    layout: &'a LayoutEngine,
}

impl<'a> MindMapRenderer<'a> {
    pub fn new(app: &'a AppState) -> Self {
        Self {
            app,
            layout: &app.layout,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let canvas = self.draw(area.width as usize, area.height as usize);
        let paragraph = Paragraph::new(canvas.to_lines());
        frame.render_widget(paragraph, area);
    }

    pub fn draw(&self, width: usize, height: usize) -> BufferCanvas {
        let mut canvas = BufferCanvas::new(width, height);
        let projection = Projection::fit(&self.layout.bounds, width, height);

        let edge_style = Style::default().fg(Color::DarkGray);
        for edge in &self.layout.edges {
            if let (Some(source), Some(target)) = (self.layout.get(&edge.source), self.layout.get(&edge.target)) {
                canvas.draw_line(
                    projection.project(source.position),
                    projection.project(target.position),
                    EDGE_CHAR,
                    edge_style,
                );
            }
        }

        // Labels go on top of the edges
        for node in &self.layout.nodes {
            self.draw_label(&mut canvas, &projection, node);
        }

        canvas
    }

    fn draw_label(&self, canvas: &mut BufferCanvas, projection: &Projection, node: &LayoutNode) {
        let mut text = String::new();
        if node.node.is_ai_generated {
            text.push_str(AI_MARKER);
        }
        text.push_str(&label(&node.node.content));
        if self.app.ai.in_flight() == Some(node.id.as_str()) {
            text.push_str(PENDING_MARKER);
        }
        let text = fit_width(&text, LABEL_MAX_WIDTH);

        let mut style = Style::default().fg(accent(node.node.color));
        if node.is_root {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.app.move_source.as_deref() == Some(node.id.as_str()) {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if self.app.selected_node_id.as_deref() == Some(node.id.as_str()) {
            style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
        }

        let (x, y) = projection.project(node.position);
        let half = (UnicodeWidthStr::width(text.as_str()) / 2) as i64;
        canvas.draw_styled_text(x - half, y, &text, style);
    }
}
