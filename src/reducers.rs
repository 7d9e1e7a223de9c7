//! Pure `MindMap -> MindMap` transformations, applied through
//! [`MindMapStore::update_current_mind_map`](crate::store::MindMapStore::update_current_mind_map).

use crate::model::{now, MindMap, Node, ThemeColor};
use crate::tree;

pub fn append_nodes(mut map: MindMap, nodes: Vec<Node>) -> MindMap {
    map.nodes.extend(nodes);
    map
}

/// Sets a node's content and, when given, its colour.
pub fn update_node(mut map: MindMap, id: &str, content: &str, color: Option<ThemeColor>) -> MindMap {
    if let Some(node) = map.get_node_mut(id) {
        node.content = content.to_string();
        if let Some(color) = color {
            node.color = color;
        }
        node.updated_at = now();
    }
    map
}

pub fn set_color(mut map: MindMap, id: &str, color: ThemeColor) -> MindMap {
    if let Some(node) = map.get_node_mut(id) {
        node.color = color;
        node.updated_at = now();
    }
    map
}

/// Removes `id` and every node below it.
pub fn delete_subtree(mut map: MindMap, id: &str) -> MindMap {
    let mut doomed = tree::descendants_of(&map.nodes, id);
    doomed.insert(id.to_string());
    map.nodes.retain(|n| !doomed.contains(&n.id));
    map
}

/// Re-attaches `id` under `new_parent_id`. Left unchanged when the move
/// would break the tree.
pub fn move_node(mut map: MindMap, id: &str, new_parent_id: &str) -> MindMap {
    if tree::can_reparent(&map.nodes, id, new_parent_id).is_err() {
        return map;
    }
    if let Some(node) = map.get_node_mut(id) {
        node.parent_id = Some(new_parent_id.to_string());
        node.updated_at = now();
    }
    map
}

/// Renames the map; the root node mirrors the title.
pub fn rename(mut map: MindMap, title: &str) -> MindMap {
    map.title = title.to_string();
    let root_id = map.root().map(|r| r.id.clone());
    if let Some(root_id) = root_id {
        map = update_node(map, &root_id, title, None);
    }
    map
}

pub fn set_theme(mut map: MindMap, theme: ThemeColor) -> MindMap {
    map.theme = theme;
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MindMap {
        let mut map = MindMap::new("Root", ThemeColor::Ocean);
        let root = map.nodes[0].id.clone();
        map.nodes.push(Node::new("a", "A", Some(root.clone())));
        map.nodes.push(Node::new("b", "B", Some("a".to_string())));
        map.nodes.push(Node::new("c", "C", Some(root)));
        map
    }

    fn ids(map: &MindMap) -> Vec<&str> {
        map.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_delete_subtree_cascades() {
        let map = sample();
        let root = map.nodes[0].id.clone();
        let map = delete_subtree(map, "a");
        assert_eq!(ids(&map), vec![root.as_str(), "c"]);
    }

    #[test]
    fn test_delete_leaf_only_removes_leaf() {
        let map = delete_subtree(sample(), "b");
        assert_eq!(map.nodes.len(), 3);
        assert!(!map.contains("b"));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let map = sample();
        assert_eq!(delete_subtree(map.clone(), "zzz"), map);
    }

    #[test]
    fn test_update_node_keeps_color_when_none() {
        let map = update_node(sample(), "a", "Renamed", None);
        let a = map.get_node("a").unwrap();
        assert_eq!(a.content, "Renamed");
        assert_eq!(a.color, ThemeColor::Ocean);

        let map = update_node(map, "a", "Renamed", Some(ThemeColor::Blossom));
        assert_eq!(map.get_node("a").unwrap().color, ThemeColor::Blossom);
    }

    #[test]
    fn test_set_color() {
        let map = set_color(sample(), "c", ThemeColor::Forest);
        assert_eq!(map.get_node("c").unwrap().color, ThemeColor::Forest);
    }

    #[test]
    fn test_move_node() {
        let map = move_node(sample(), "c", "b");
        assert_eq!(map.get_node("c").unwrap().parent_id.as_deref(), Some("b"));

        // Moving a node under its own descendant is refused
        let map = move_node(map, "a", "c");
        assert_eq!(map.get_node("a").unwrap().parent_id, Some(map.nodes[0].id.clone()));
    }

    #[test]
    fn test_rename_updates_root() {
        let map = rename(sample(), "Holiday");
        assert_eq!(map.title, "Holiday");
        assert_eq!(map.root().unwrap().content, "Holiday");
    }

    #[test]
    fn test_append_nodes_preserves_order() {
        let map = append_nodes(
            sample(),
            vec![
                Node::new("x", "X", Some("c".to_string())),
                Node::new("y", "Y", Some("c".to_string())),
            ],
        );
        assert_eq!(&ids(&map)[4..], &["x", "y"]);
    }
}
