use crate::app::{AppMode, AppState, EditTarget};

// Byte offset of the `char_pos`-th character, or the end of the buffer
fn byte_index(buffer: &str, char_pos: usize) -> usize {
    buffer
        .char_indices()
        .nth(char_pos)
        .map_or(buffer.len(), |(i, _)| i)
}

pub fn begin_edit(app: &mut AppState, target: EditTarget, buffer: String) {
    let cursor_pos = buffer.chars().count();
    app.mode = AppMode::Editing {
        target,
        buffer,
        cursor_pos,
    };
}

pub fn start_editing(app: &mut AppState) {
    if let Some(node) = app.selected_node() {
        let (id, content) = (node.id.clone(), node.content.clone());
        begin_edit(app, EditTarget::Node(id), content);
    }
}

pub fn type_char(app: &mut AppState, c: char) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        let at = byte_index(buffer, *cursor_pos);
        buffer.insert(at, c);
        *cursor_pos += 1;
    }
}

pub fn backspace(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos > 0 {
            *cursor_pos -= 1;
            let at = byte_index(buffer, *cursor_pos);
            buffer.remove(at);
        }
    }
}

pub fn delete_char(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos < buffer.chars().count() {
            let at = byte_index(buffer, *cursor_pos);
            buffer.remove(at);
        }
    }
}

pub fn move_cursor_left(app: &mut AppState) {
    if let AppMode::Editing { cursor_pos, .. } = &mut app.mode {
        *cursor_pos = cursor_pos.saturating_sub(1);
    }
}

pub fn move_cursor_right(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        if *cursor_pos < buffer.chars().count() {
            *cursor_pos += 1;
        }
    }
}

pub fn move_cursor_home(app: &mut AppState) {
    if let AppMode::Editing { cursor_pos, .. } = &mut app.mode {
        *cursor_pos = 0;
    }
}

pub fn move_cursor_end(app: &mut AppState) {
    if let AppMode::Editing {
        buffer, cursor_pos, ..
    } = &mut app.mode
    {
        *cursor_pos = buffer.chars().count();
    }
}

/// Applies the buffer to its target. Blank text leaves the target as it was.
pub fn confirm_edit(app: &mut AppState) {
    let AppMode::Editing { target, buffer, .. } = std::mem::replace(&mut app.mode, AppMode::Normal)
    else {
        return;
    };

    let text = buffer.trim();
    if text.is_empty() {
        app.set_message("Empty text ignored");
        return;
    }

    let result = match target {
        EditTarget::Node(id) => app.update_node(&id, text, None),
        EditTarget::MapTitle => app.rename_current_map(text),
    };
    if let Err(e) = result {
        app.set_message(e.to_string());
    }
}

pub fn cancel_edit(app: &mut AppState) {
    app.mode = AppMode::Normal;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::store::MindMapStore;

    fn create_test_app() -> AppState {
        let mut app = AppState::new(AppConfig::default(), MindMapStore::in_memory());
        app.ensure_current_map();
        app
    }

    fn buffer(app: &AppState) -> (&str, usize) {
        match &app.mode {
            AppMode::Editing {
                buffer, cursor_pos, ..
            } => (buffer.as_str(), *cursor_pos),
            _ => panic!("not editing"),
        }
    }

    #[test]
    fn test_start_editing_loads_content() {
        let mut app = create_test_app();
        start_editing(&mut app);
        assert_eq!(buffer(&app), ("New Mind Map", 12));
    }

    #[test]
    fn test_multibyte_editing() {
        let mut app = create_test_app();
        let root = app.root_id().unwrap();
        begin_edit(&mut app, EditTarget::Node(root), "アイデア".to_string());

        move_cursor_left(&mut app);
        type_char(&mut app, 'X');
        assert_eq!(buffer(&app), ("アイデXア", 4));

        backspace(&mut app);
        move_cursor_home(&mut app);
        delete_char(&mut app);
        assert_eq!(buffer(&app), ("イデア", 0));

        move_cursor_end(&mut app);
        move_cursor_right(&mut app);
        assert_eq!(buffer(&app).1, 3);
    }

    #[test]
    fn test_confirm_updates_node() {
        let mut app = create_test_app();
        start_editing(&mut app);
        move_cursor_end(&mut app);
        for c in " 2026".chars() {
            type_char(&mut app, c);
        }
        confirm_edit(&mut app);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.selected_node().unwrap().content, "New Mind Map 2026");
    }

    #[test]
    fn test_confirm_blank_is_ignored() {
        let mut app = create_test_app();
        let root = app.root_id().unwrap();
        begin_edit(&mut app, EditTarget::Node(root), "   ".to_string());
        confirm_edit(&mut app);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.selected_node().unwrap().content, "New Mind Map");
    }

    #[test]
    fn test_cancel_discards_changes() {
        let mut app = create_test_app();
        start_editing(&mut app);
        type_char(&mut app, '!');
        cancel_edit(&mut app);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.selected_node().unwrap().content, "New Mind Map");
    }

    #[test]
    fn test_confirm_map_title() {
        let mut app = create_test_app();
        begin_edit(&mut app, EditTarget::MapTitle, "Holiday".to_string());
        confirm_edit(&mut app);

        let map = app.current_map().unwrap();
        assert_eq!(map.title, "Holiday");
        assert_eq!(map.root().unwrap().content, "Holiday");
    }
}
