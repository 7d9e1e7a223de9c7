pub mod canvas;
pub mod constants;
pub mod help;
pub mod mindmap;
pub mod status_line;
pub mod text;


use crate::app::{AppMode, AppState};
use help::HelpRenderer;
use mindmap::MindMapRenderer;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use status_line::StatusLineRenderer;

// Main render function
pub fn render(frame: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    // Render based on mode
    match &app.mode {
        AppMode::Help => HelpRenderer::render(frame, chunks[0]),
        _ => MindMapRenderer::new(app).render(frame, chunks[0]),
    }

    StatusLineRenderer::render(frame, app, chunks[1]);
}
