use crate::actions::editing;
use crate::app::{AppState, EditTarget};

pub fn add_child(app: &mut AppState) {
    let Some(parent_id) = app.selected_node_id.clone() else {
        app.set_message("No node selected");
        return;
    };

    match app.add_child(&parent_id, None) {
        Ok(id) => {
            app.selected_node_id = Some(id.clone());
            // Start with an empty buffer; confirming it empty keeps the default text
            editing::begin_edit(app, EditTarget::Node(id), String::new());
        }
        Err(e) => app.set_message(e.to_string()),
    }
}

pub fn delete_node(app: &mut AppState) {
    let Some(id) = app.selected_node_id.clone() else {
        return;
    };

    match app.delete_node(&id) {
        Ok(count) => app.set_message(format!("Deleted {} node(s)", count)),
        Err(e) => app.set_message(e.to_string()),
    }
}

pub fn cycle_color(app: &mut AppState, forward: bool) {
    let Some(id) = app.selected_node_id.clone() else {
        return;
    };

    match app.cycle_color(&id, forward) {
        Ok(color) => app.set_message(format!("Colour: {}", color.as_str())),
        Err(e) => app.set_message(e.to_string()),
    }
}

pub fn mark_for_move(app: &mut AppState) {
    let Some(node) = app.selected_node() else {
        return;
    };
    if node.is_root() {
        app.set_message("The root node cannot be moved");
        return;
    }

    let (id, content) = (node.id.clone(), node.content.clone());
    app.move_source = Some(id);
    app.set_message(format!("Marked \"{}\"; select a new parent and press p", content));
}

pub fn move_marked_here(app: &mut AppState) {
    let Some(source) = app.move_source.clone() else {
        app.set_message("Mark a node with x first");
        return;
    };
    let Some(target) = app.selected_node_id.clone() else {
        return;
    };

    match app.move_node(&source, &target) {
        Ok(()) => {
            app.move_source = None;
            app.selected_node_id = Some(source);
            app.set_message("Node moved");
        }
        // Keep the mark so another parent can be tried
        Err(e) => app.set_message(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppMode;
    use crate::config::AppConfig;
    use crate::model::{ThemeColor, DEFAULT_NODE_CONTENT};
    use crate::store::MindMapStore;

    fn create_test_app() -> AppState {
        let mut app = AppState::new(AppConfig::default(), MindMapStore::in_memory());
        app.ensure_current_map();
        app
    }

    #[test]
    fn test_add_child_enters_editing_and_selects() {
        let mut app = create_test_app();
        let root = app.root_id().unwrap();

        add_child(&mut app);

        let selected = app.selected_node().unwrap();
        assert_eq!(selected.parent_id.as_deref(), Some(root.as_str()));
        assert_eq!(selected.content, DEFAULT_NODE_CONTENT);
        assert!(matches!(app.mode, AppMode::Editing { ref buffer, .. } if buffer.is_empty()));
    }

    #[test]
    fn test_delete_root_shows_message() {
        let mut app = create_test_app();
        delete_node(&mut app);

        assert_eq!(app.current_map().unwrap().nodes.len(), 1);
        assert!(app.message.as_deref().unwrap().contains("root"));
    }

    #[test]
    fn test_cycle_color() {
        let mut app = create_test_app();
        let before = app.selected_node().unwrap().color;

        cycle_color(&mut app, true);
        assert_eq!(app.selected_node().unwrap().color, before.next());
        cycle_color(&mut app, false);
        assert_eq!(app.selected_node().unwrap().color, before);
        assert_eq!(before, ThemeColor::Ocean);
    }

    #[test]
    fn test_mark_and_move() {
        let mut app = create_test_app();
        let root = app.root_id().unwrap();
        let a = app.add_child(&root, Some("A")).unwrap();
        let b = app.add_child(&root, Some("B")).unwrap();

        app.selected_node_id = Some(root.clone());
        mark_for_move(&mut app);
        assert!(app.move_source.is_none());

        app.selected_node_id = Some(b.clone());
        mark_for_move(&mut app);
        app.selected_node_id = Some(a.clone());
        move_marked_here(&mut app);

        assert!(app.move_source.is_none());
        let moved = app.current_map().unwrap().get_node(&b).unwrap();
        assert_eq!(moved.parent_id, Some(a));
    }

    #[test]
    fn test_move_under_itself_keeps_mark() {
        let mut app = create_test_app();
        let root = app.root_id().unwrap();
        let a = app.add_child(&root, Some("A")).unwrap();

        app.selected_node_id = Some(a.clone());
        mark_for_move(&mut app);
        move_marked_here(&mut app);

        assert_eq!(app.move_source, Some(a));
        assert!(app.message.is_some());
    }
}
