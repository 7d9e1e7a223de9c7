use ai_mindmap::app::{AppMode, AppState};
use ai_mindmap::config::AppConfig;
use ai_mindmap::store::MindMapStore;
use ai_mindmap::ui;
use insta::assert_snapshot;
use ratatui::{backend::TestBackend, Terminal};

fn create_test_app(title: &str) -> AppState {
    let mut store = MindMapStore::in_memory();
    store.create_mind_map(Some(title));
    AppState::new(AppConfig::default(), store)
}

fn rendered_rows(app: &AppState, width: u16, height: u16) -> Vec<String> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();

    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect())
        .collect()
}

#[test]
fn test_render_lone_root() {
    let app = create_test_app("Solo");

    let backend = TestBackend::new(60, 8);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| ui::render(frame, &app)).unwrap();

    assert_snapshot!(terminal.backend(), @r#"
    "                                                            "
    "                                                            "
    "                                                            "
    "                            Solo                            "
    "                                                            "
    "                                                            "
    "                                                            "
    "Solo | 1 nodes | saved | auto-save on | AI idle             "
    "#);
}

#[test]
fn test_render_children_and_edges() {
    let mut app = create_test_app("Trip");
    let root = app.root_id().unwrap();
    let east = app.add_child(&root, Some("Beach")).unwrap();
    app.add_child(&root, Some("Mountains")).unwrap();
    app.add_child(&east, Some("Snorkel")).unwrap();

    let rows = rendered_rows(&app, 100, 30);
    let canvas = &rows[..29];

    for label in ["Trip", "Beach", "Mountains", "Snorkel"] {
        assert!(canvas.iter().any(|r| r.contains(label)), "{} not drawn", label);
    }
    assert!(canvas.iter().any(|r| r.contains('·')));
    assert!(rows[29].starts_with("Trip | 4 nodes | saved"));
}

#[test]
fn test_render_help_screen() {
    let mut app = create_test_app("Help");
    app.mode = AppMode::Help;

    let rows = rendered_rows(&app, 60, 40);
    assert!(rows.iter().any(|r| r.contains("ai-mindmap Help")));
    assert!(rows.iter().any(|r| r.contains("Generate AI ideas")));
    assert!(rows[39].starts_with("Press ESC or q to close help"));
}
