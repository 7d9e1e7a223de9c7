mod common;

use ai_mindmap::actions::{apply_ideas, execute_action, request_ideas, Action};
use ai_mindmap::ai::{CommandIdeaGenerator, IdeaGenerator};
use ai_mindmap::app::{AppMode, AppState};
use ai_mindmap::config::AppConfig;
use ai_mindmap::model::ThemeColor;
use ai_mindmap::storage::{KeyValueStore, MemoryStore};
use ai_mindmap::store::{MindMapStore, STORAGE_KEY};
use common::sample_map;

fn app_with(config: AppConfig) -> AppState {
    let mut app = AppState::new(config, MindMapStore::in_memory());
    app.ensure_current_map();
    app
}

fn type_text(app: &mut AppState, text: &str) {
    for c in text.chars() {
        execute_action(Action::TypeChar(c), app).unwrap();
    }
}

#[test]
fn test_build_a_small_map_with_keys() {
    let mut app = app_with(AppConfig::default());

    execute_action(Action::RenameMap, &mut app).unwrap();
    execute_action(Action::MoveCursorEnd, &mut app).unwrap();
    // Clear the old title
    for _ in 0.."New Mind Map".chars().count() {
        execute_action(Action::Backspace, &mut app).unwrap();
    }
    type_text(&mut app, "Garden");
    execute_action(Action::ConfirmEdit, &mut app).unwrap();

    execute_action(Action::AddChild, &mut app).unwrap();
    type_text(&mut app, "Vegetables");
    execute_action(Action::ConfirmEdit, &mut app).unwrap();
    execute_action(Action::NextColor, &mut app).unwrap();

    execute_action(Action::GoToRoot, &mut app).unwrap();
    execute_action(Action::AddChild, &mut app).unwrap();
    type_text(&mut app, "Flowers");
    execute_action(Action::ConfirmEdit, &mut app).unwrap();

    let map = app.current_map().unwrap();
    let contents: Vec<&str> = map.nodes.iter().map(|n| n.content.as_str()).collect();
    assert_eq!(map.title, "Garden");
    assert_eq!(contents, vec!["Garden", "Vegetables", "Flowers"]);
    assert_eq!(map.nodes[1].color, ThemeColor::Forest);
    assert_eq!(app.layout.nodes.len(), 3);
    assert_eq!(app.mode, AppMode::Normal);
}

#[test]
fn test_deleting_a_branch_cascades() {
    let mut store = MindMapStore::in_memory();
    store.import_mind_map(sample_map(), true).unwrap();
    let mut app = AppState::new(AppConfig::default(), store);

    app.selected_node_id = Some("c1".to_string());
    execute_action(Action::DeleteNode, &mut app).unwrap();

    let ids: Vec<&str> = app.current_map().unwrap().nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["root", "c0", "c2"]);
    assert_eq!(app.selected_node_id.as_deref(), Some("root"));
    assert_eq!(app.message.as_deref(), Some("Deleted 2 node(s)"));
}

#[test]
fn test_changes_reach_the_backend() {
    let mut app = app_with(AppConfig::default());
    execute_action(Action::AddChild, &mut app).unwrap();
    type_text(&mut app, "Persisted");
    execute_action(Action::ConfirmEdit, &mut app).unwrap();

    let raw = app.store.backend().get(STORAGE_KEY).unwrap().unwrap();
    assert!(raw.contains("\"content\":\"Persisted\""));

    let reloaded = MindMapStore::load(Box::new(MemoryStore::with_entry(STORAGE_KEY, &raw)), STORAGE_KEY);
    assert_eq!(reloaded.current_mind_map().unwrap().nodes.len(), 2);
}

#[cfg(unix)]
#[test]
fn test_idea_round_trip_through_command() {
    let command = "cat > /dev/null; echo '- Tomatoes'; echo '- Beans'";
    let config = AppConfig {
        idea_command: Some(command.to_string()),
        ..AppConfig::default()
    };
    let mut app = app_with(config);
    let root = app.root_id().unwrap();

    request_ideas(&mut app);
    let request = app.pending_request.take().unwrap();
    assert_eq!(request.target_node_id, root);

    // A second press while the first is outstanding does nothing
    request_ideas(&mut app);
    assert!(app.pending_request.is_none());

    let result = CommandIdeaGenerator::new(command).generate(&request);
    apply_ideas(&mut app, result);

    let map = app.current_map().unwrap();
    let ideas: Vec<&str> = map
        .nodes
        .iter()
        .filter(|n| n.is_ai_generated)
        .map(|n| n.content.as_str())
        .collect();
    assert_eq!(ideas, vec!["Tomatoes", "Beans"]);
    assert!(map
        .nodes
        .iter()
        .filter(|n| n.is_ai_generated)
        .all(|n| n.parent_id.as_deref() == Some(root.as_str()) && n.color == ThemeColor::Lavender));
    assert!(!app.ai.is_busy());
    assert_eq!(app.layout.nodes.len(), 3);
}

#[cfg(unix)]
#[test]
fn test_failing_command_leaves_map_alone() {
    let command = "exit 1";
    let config = AppConfig {
        idea_command: Some(command.to_string()),
        ..AppConfig::default()
    };
    let mut app = app_with(config);

    request_ideas(&mut app);
    let request = app.pending_request.take().unwrap();
    apply_ideas(&mut app, CommandIdeaGenerator::new(command).generate(&request));

    assert_eq!(app.current_map().unwrap().nodes.len(), 1);
    assert!(!app.ai.is_busy());
    assert!(app.message.as_deref().unwrap().starts_with("AI idea generation failed"));
}
