use crate::app::{AppMode, AppState, EditTarget};
use crate::ui::constants::{CURSOR_INDICATOR, STATUS_EDIT_PREFIX, STATUS_TITLE_PREFIX};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Wrap},
    Frame,
};

// Status line renderer
pub struct StatusLineRenderer;

impl StatusLineRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let (content, style) = Self::get_content_and_style(app, area);

        let paragraph = Paragraph::new(content)
            .style(style)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    pub fn get_content_and_style(app: &AppState, area: Rect) -> (String, Style) {
        match &app.mode {
            AppMode::Normal => Self::render_normal_mode(app),
            AppMode::Editing {
                target,
                buffer,
                cursor_pos,
            } => {
                let prefix = match target {
                    EditTarget::Node(_) => STATUS_EDIT_PREFIX,
                    EditTarget::MapTitle => STATUS_TITLE_PREFIX,
                };
                Self::render_edit_mode(prefix, buffer, *cursor_pos, area.width)
            }
            AppMode::Help => Self::render_help_mode(),
        }
    }

    /// Title, node count, durability, auto-save and AI state, then the message.
    pub fn summary(app: &AppState) -> String {
        let (title, count) = app
            .current_map()
            .map_or(("(no map)", 0), |m| (m.title.as_str(), m.nodes.len()));
        let saved = if app.store.is_saved() { "saved" } else { "unsaved" };
        let auto_save = if app.store.preferences().auto_save { "on" } else { "off" };
        let ai = if app.ai.is_busy() { "thinking" } else { "idle" };

        let mut content = format!(
            "{} | {} nodes | {} | auto-save {} | AI {}",
            title, count, saved, auto_save, ai
        );
        if let Some(ref msg) = app.message {
            content.push_str(" | ");
            content.push_str(msg);
        }
        content
    }

    fn render_normal_mode(app: &AppState) -> (String, Style) {
        let style = if app.message.is_some() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray).bg(Color::Black)
        };

        (Self::summary(app), style)
    }

    fn render_edit_mode(prefix: &str, buffer: &str, cursor_pos: usize, width: u16) -> (String, Style) {
        let mut display = String::from(prefix);
        let chars: Vec<char> = buffer.chars().collect();

        // Calculate visible portion if text is too long
        let available_width = (width as usize).saturating_sub(prefix.chars().count() + 1);
        let text_start = if cursor_pos > available_width.saturating_sub(10) {
            cursor_pos.saturating_sub(available_width / 2)
        } else {
            0
        };
        let text_end = (text_start + available_width).min(chars.len());
        let visible = &chars[text_start.min(text_end)..text_end];

        // Insert cursor indicator
        let visible_cursor = cursor_pos.saturating_sub(text_start).min(visible.len());
        display.extend(&visible[..visible_cursor]);
        display.push(CURSOR_INDICATOR);
        display.extend(&visible[visible_cursor..]);

        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        (display, style)
    }

    fn render_help_mode() -> (String, Style) {
        let content = String::from("Press ESC or q to close help");
        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        (content, style)
    }
}
