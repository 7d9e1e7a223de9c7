//! Structural queries over the flat, parent-pointer node list of a mind map.

use crate::model::Node;
use indextree::{Arena, NodeId as ArenaId};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Mind map has no root node")]
    NoRoot,
    #[error("Mind map has {0} root nodes, expected exactly one")]
    MultipleRoots(usize),
    #[error("Node {node} references missing parent {parent}")]
    DanglingParent { node: String, parent: String },
    #[error("Node ID {0} is used more than once")]
    DuplicateId(String),
    #[error("Node {0} is part of a parent cycle")]
    Cycle(String),
    #[error("Node with ID {0} not found")]
    NodeNotFound(String),
    #[error("The root node cannot be moved")]
    MoveRoot,
    #[error("Cannot move node {node} under its own subtree ({target})")]
    MoveIntoSubtree { node: String, target: String },
}

/// Parent id -> indices of its children in input order.
pub struct ChildIndex<'a> {
    children: HashMap<&'a str, Vec<usize>>,
}

impl<'a> ChildIndex<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, node) in nodes.iter().enumerate() {
            if let Some(parent) = node.parent_id.as_deref() {
                children.entry(parent).or_default().push(idx);
            }
        }
        Self { children }
    }

    pub fn children(&self, id: &str) -> &[usize] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Tree rebuilt for a single layout pass. Arena payloads are indices into
/// the node slice the tree was built from.
pub struct LayoutTree<'a> {
    pub nodes: &'a [Node],
    pub arena: Arena<usize>,
    pub root: ArenaId,
}

impl<'a> LayoutTree<'a> {
    pub fn node(&self, id: ArenaId) -> Option<&'a Node> {
        self.arena.get(id).map(|n| &self.nodes[*n.get()])
    }

    /// Number of nodes reachable from the root.
    pub fn reachable_count(&self) -> usize {
        self.root.descendants(&self.arena).count()
    }
}

/// Builds the parent -> children tree rooted at the first parentless node.
///
/// Additional roots, nodes with a missing parent and everything below them
/// are left out without error. Returns `None` when there is no root.
pub fn build_tree(nodes: &[Node]) -> Option<LayoutTree<'_>> {
    let root_idx = nodes.iter().position(Node::is_root)?;
    let index = ChildIndex::new(nodes);

    let mut arena = Arena::new();
    let root = arena.new_node(root_idx);

    // Each input node is placed at most once, even with duplicate ids.
    let mut placed = vec![false; nodes.len()];
    placed[root_idx] = true;

    let mut stack = vec![root];
    while let Some(parent) = stack.pop() {
        let parent_idx = *arena[parent].get();
        let mut added = Vec::new();
        for &child_idx in index.children(&nodes[parent_idx].id) {
            if placed[child_idx] {
                continue;
            }
            placed[child_idx] = true;
            let child = arena.new_node(child_idx);
            parent.append(child, &mut arena);
            added.push(child);
        }
        // Children order is fixed by `append`; the stack order only affects
        // the order arena slots are filled in.
        stack.extend(added.into_iter().rev());
    }

    Some(LayoutTree { nodes, arena, root })
}

pub fn root_of(nodes: &[Node]) -> Option<&Node> {
    nodes.iter().find(|n| n.is_root())
}

pub fn children_of<'a>(nodes: &'a [Node], id: &str) -> Vec<&'a Node> {
    nodes
        .iter()
        .filter(|n| n.parent_id.as_deref() == Some(id))
        .collect()
}

/// Every id transitively below `id`, not including `id` itself.
pub fn descendants_of(nodes: &[Node], id: &str) -> HashSet<String> {
    let index = ChildIndex::new(nodes);
    let mut found = HashSet::new();
    collect_descendants(nodes, &index, id, &mut found);
    found.remove(id);
    found
}

fn collect_descendants(nodes: &[Node], index: &ChildIndex, id: &str, found: &mut HashSet<String>) {
    for &child_idx in index.children(id) {
        let child = &nodes[child_idx];
        // Already seen means a cycle or a duplicated id
        if found.insert(child.id.clone()) {
            collect_descendants(nodes, index, &child.id, found);
        }
    }
}

/// Parent chain of `id`, nearest first. Stops early on cycles.
pub fn ancestors_of<'a>(nodes: &'a [Node], id: &str) -> Vec<&'a Node> {
    let by_id: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = by_id.get(id).and_then(|n| n.parent_id.as_deref());

    while let Some(parent_id) = current {
        if !seen.insert(parent_id) {
            break;
        }
        match by_id.get(parent_id) {
            Some(parent) => {
                chain.push(*parent);
                current = parent.parent_id.as_deref();
            }
            None => break,
        }
    }
    chain
}

/// Strict structural check: one root, unique ids, existing parents, no cycles.
pub fn validate(nodes: &[Node]) -> Result<(), TreeError> {
    let mut ids = HashSet::new();
    for node in nodes {
        if !ids.insert(node.id.as_str()) {
            return Err(TreeError::DuplicateId(node.id.clone()));
        }
    }

    let roots = nodes.iter().filter(|n| n.is_root()).count();
    match roots {
        0 => return Err(TreeError::NoRoot),
        1 => {}
        n => return Err(TreeError::MultipleRoots(n)),
    }

    for node in nodes {
        if let Some(parent) = node.parent_id.as_deref() {
            if !ids.contains(parent) {
                return Err(TreeError::DanglingParent {
                    node: node.id.clone(),
                    parent: parent.to_string(),
                });
            }
        }
    }

    // With one root and no dangling parents, anything unreachable sits on a cycle
    if let Some(tree) = build_tree(nodes) {
        if tree.reachable_count() != nodes.len() {
            let reachable: HashSet<usize> =
                tree.root.descendants(&tree.arena).map(|id| *tree.arena[id].get()).collect();
            if let Some(node) = nodes.iter().enumerate().find(|(i, _)| !reachable.contains(i)) {
                return Err(TreeError::Cycle(node.1.id.clone()));
            }
        }
    }

    Ok(())
}

/// Checks that `node_id` can be re-attached under `new_parent_id`.
pub fn can_reparent(nodes: &[Node], node_id: &str, new_parent_id: &str) -> Result<(), TreeError> {
    let node = nodes
        .iter()
        .find(|n| n.id == node_id)
        .ok_or_else(|| TreeError::NodeNotFound(node_id.to_string()))?;
    if !nodes.iter().any(|n| n.id == new_parent_id) {
        return Err(TreeError::NodeNotFound(new_parent_id.to_string()));
    }
    if node.is_root() {
        return Err(TreeError::MoveRoot);
    }
    if node_id == new_parent_id || descendants_of(nodes, node_id).contains(new_parent_id) {
        return Err(TreeError::MoveIntoSubtree {
            node: node_id.to_string(),
            target: new_parent_id.to_string(),
        });
    }
    Ok(())
}
