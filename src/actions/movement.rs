use crate::app::AppState;

// Screen coordinates: y grows downwards, like the layout's
fn move_in_direction(app: &mut AppState, direction_x: f64, direction_y: f64) -> bool {
    let Some(active_id) = app.selected_node_id.as_deref() else {
        return false;
    };

    match app.layout.nearest_in_direction(active_id, direction_x, direction_y) {
        Some(target) => {
            app.selected_node_id = Some(target.to_string());
            true
        }
        None => false,
    }
}

pub fn go_up(app: &mut AppState) {
    move_in_direction(app, 0.0, -1.0);
}

pub fn go_down(app: &mut AppState) {
    move_in_direction(app, 0.0, 1.0);
}

/// Moves left, or to the parent when nothing lies to the left.
pub fn go_left(app: &mut AppState) {
    if move_in_direction(app, -1.0, 0.0) {
        return;
    }
    let parent = app.selected_node().and_then(|n| n.parent_id.clone());
    if let Some(parent) = parent.filter(|p| app.layout.contains(p)) {
        app.selected_node_id = Some(parent);
    }
}

pub fn go_right(app: &mut AppState) {
    move_in_direction(app, 1.0, 0.0);
}

pub fn go_to_root(app: &mut AppState) {
    if let Some(root) = app.root_id() {
        app.selected_node_id = Some(root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::store::MindMapStore;

    // root with children right (600,300) and left (200,300); `deep` hangs
    // below the right child
    fn create_test_app() -> (AppState, String, String, String) {
        let mut app = AppState::new(AppConfig::default(), MindMapStore::in_memory());
        app.ensure_current_map();
        let root = app.root_id().unwrap();
        let right = app.add_child(&root, Some("Right")).unwrap();
        let left = app.add_child(&root, Some("Left")).unwrap();
        app.add_child(&right, Some("Deep")).unwrap();
        (app, root, right, left)
    }

    #[test]
    fn test_horizontal_movement() {
        let (mut app, root, right, left) = create_test_app();

        go_right(&mut app);
        assert_eq!(app.selected_node_id.as_deref(), Some(right.as_str()));

        go_to_root(&mut app);
        go_left(&mut app);
        assert_eq!(app.selected_node_id.as_deref(), Some(left.as_str()));

        // Nothing further left: fall back to the parent
        go_left(&mut app);
        assert_eq!(app.selected_node_id.as_deref(), Some(root.as_str()));
    }

    #[test]
    fn test_go_to_root() {
        let (mut app, root, right, _) = create_test_app();
        app.selected_node_id = Some(right);
        go_to_root(&mut app);
        assert_eq!(app.selected_node_id, Some(root));
    }

    #[test]
    fn test_no_move_when_nothing_in_direction() {
        let mut app = AppState::new(AppConfig::default(), MindMapStore::in_memory());
        app.ensure_current_map();
        let root = app.root_id();

        go_up(&mut app);
        go_down(&mut app);
        assert_eq!(app.selected_node_id, root);
    }
}
