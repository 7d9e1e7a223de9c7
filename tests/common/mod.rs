#![allow(dead_code)]
use ai_mindmap::layout::LayoutEngine;
use ai_mindmap::model::{MindMap, Node, ThemeColor};
use chrono::{DateTime, TimeZone, Utc};

/// Fixed instant so serialized output is stable.
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap() + chrono::Duration::milliseconds(123)
}

pub fn node(id: &str, parent: Option<&str>) -> Node {
    let mut node = Node::new(id, id.to_uppercase(), parent.map(str::to_string));
    node.created_at = fixed_time();
    node.updated_at = fixed_time();
    node
}

/// `root` with children `c0`, `c1`, `c2`, and `g` below `c1`.
pub fn sample_nodes() -> Vec<Node> {
    vec![
        node("root", None),
        node("c0", Some("root")),
        node("c1", Some("root")),
        node("c2", Some("root")),
        node("g", Some("c1")),
    ]
}

pub fn sample_map() -> MindMap {
    MindMap {
        id: "map-1".to_string(),
        title: "Sample".to_string(),
        nodes: sample_nodes(),
        theme: ThemeColor::Ocean,
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

/// One line per positioned node: id, level and position.
pub fn layout_table(engine: &LayoutEngine) -> String {
    engine
        .nodes
        .iter()
        .map(|n| format!("{} L{} ({:.1}, {:.1})", n.id, n.level, n.position.x, n.position.y))
        .collect::<Vec<_>>()
        .join("\n")
}
