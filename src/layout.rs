use crate::model::{Node, Position};
use crate::tree::{build_tree, LayoutTree};
use indextree::NodeId as ArenaId;
use std::collections::HashMap;
use std::f64::consts::{FRAC_PI_2, TAU};

pub const DEFAULT_CENTER_X: f64 = 400.0;
pub const DEFAULT_CENTER_Y: f64 = 300.0;
pub const DEFAULT_LEVEL_DISTANCE: f64 = 200.0;
/// Extra ring distance added per level to reduce crowding further out.
pub const DEFAULT_LEVEL_INCREMENT: f64 = 50.0;
/// Centre angle of the root's full-circle sector.
pub const DEFAULT_ROOT_ANGLE: f64 = FRAC_PI_2;

/// Share of a child's slot handed down to its own children below level 1.
const SECTOR_NARROWING: f64 = 0.9;
/// Widest cone a node below level 1 may spread its children over.
const MAX_CHILD_SECTOR: f64 = FRAC_PI_2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub center_x: f64,
    pub center_y: f64,
    pub level_distance: f64,
    pub level_increment: f64,
    pub root_angle: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center_x: DEFAULT_CENTER_X,
            center_y: DEFAULT_CENTER_Y,
            level_distance: DEFAULT_LEVEL_DISTANCE,
            level_increment: DEFAULT_LEVEL_INCREMENT,
            root_angle: DEFAULT_ROOT_ANGLE,
        }
    }
}

impl LayoutConfig {
    /// Ring distance between a node at `level` and its children.
    pub fn distance(&self, level: usize) -> f64 {
        self.level_distance + level as f64 * self.level_increment
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub position: Position,
    pub level: usize,
    pub is_root: bool,
    pub node: Node,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    fn between(parent: &str, child: &str) -> Self {
        Self {
            id: format!("{}-{}", parent, child),
            source: parent.to_string(),
            target: child.to_string(),
        }
    }
}

/// Axis-aligned box around every positioned node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutEngine {
    /// Positioned nodes in depth-first order.
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<Edge>,
    pub bounds: Bounds,
    index: HashMap<String, usize>,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions every node reachable from the root of `nodes` on concentric
    /// rings. Unreachable nodes are skipped.
    pub fn calculate_layout(nodes: &[Node], config: &LayoutConfig) -> Self {
        let mut engine = Self::new();

        if let Some(tree) = build_tree(nodes) {
            let center = Position::new(config.center_x, config.center_y);
            engine.layout_subtree(&tree, config, tree.root, center, config.root_angle, TAU, 0);
            engine.calculate_bounds();
        }

        log::trace!(
            "radial layout: {} of {} nodes placed, {} edges",
            engine.nodes.len(),
            nodes.len(),
            engine.edges.len()
        );
        engine
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_subtree(
        &mut self,
        tree: &LayoutTree,
        config: &LayoutConfig,
        arena_id: ArenaId,
        position: Position,
        angle: f64,
        angle_range: f64,
        level: usize,
    ) {
        let Some(node) = tree.node(arena_id) else {
            return;
        };

        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(LayoutNode {
            id: node.id.clone(),
            position,
            level,
            is_root: level == 0,
            node: node.clone(),
        });

        let children: Vec<ArenaId> = arena_id.children(&tree.arena).collect();
        if children.is_empty() {
            return;
        }

        let child_count = children.len() as f64;
        let distance = config.distance(level);
        let angle_step = angle_range / child_count;
        let sector_start = angle - angle_range / 2.0;

        for (i, child_id) in children.into_iter().enumerate() {
            let Some(child) = tree.node(child_id) else {
                continue;
            };

            let child_angle = sector_start + angle_step * (i as f64 + 0.5);
            let child_position = Position::new(
                position.x + child_angle.cos() * distance,
                position.y + child_angle.sin() * distance,
            );

            self.edges.push(Edge::between(&node.id, &child.id));

            let child_range = if level == 0 {
                TAU / child_count
            } else {
                (angle_step * SECTOR_NARROWING).min(MAX_CHILD_SECTOR)
            };

            self.layout_subtree(tree, config, child_id, child_position, child_angle, child_range, level + 1);
        }
    }

    fn calculate_bounds(&mut self) {
        let mut iter = self.nodes.iter();
        let Some(first) = iter.next() else {
            self.bounds = Bounds::default();
            return;
        };

        let mut bounds = Bounds {
            min_x: first.position.x,
            min_y: first.position.y,
            max_x: first.position.x,
            max_y: first.position.y,
        };
        for layout in iter {
            bounds.min_x = bounds.min_x.min(layout.position.x);
            bounds.min_y = bounds.min_y.min(layout.position.y);
            bounds.max_x = bounds.max_x.max(layout.position.x);
            bounds.max_y = bounds.max_y.max(layout.position.y);
        }
        self.bounds = bounds;
    }

    pub fn get(&self, id: &str) -> Option<&LayoutNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Closest node lying in the half-plane given by `(direction_x,
    /// direction_y)`, measured from the node `from`.
    pub fn nearest_in_direction(&self, from: &str, direction_x: f64, direction_y: f64) -> Option<&str> {
        let origin = self.get(from)?.position;

        let mut best_distance = f64::MAX;
        let mut best_node = None;

        for layout in &self.nodes {
            if layout.id == from {
                continue;
            }

            let dx = layout.position.x - origin.x;
            let dy = layout.position.y - origin.y;

            // Projection onto the direction must be positive
            let along = dx * direction_x + dy * direction_y;
            if along <= 0.0 {
                continue;
            }

            // Penalise sideways drift so straight moves win
            let across = (dx * direction_y - dy * direction_x).abs();
            let distance = along + across * 2.0;

            if distance < best_distance {
                best_distance = distance;
                best_node = Some(layout.id.as_str());
            }
        }

        best_node
    }
}

/// Convenience wrapper returning positioned nodes and edges with default
/// canvas parameters.
pub fn nodes_and_edges(nodes: &[Node]) -> (Vec<LayoutNode>, Vec<Edge>) {
    let engine = LayoutEngine::calculate_layout(nodes, &LayoutConfig::default());
    (engine.nodes, engine.edges)
}

/// Normalises an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle % TAU;
    if wrapped < 0.0 {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Angle of `to` as seen from `from`, in `[0, 2π)`.
pub fn angle_between(from: Position, to: Position) -> f64 {
    normalize_angle((to.y - from.y).atan2(to.x - from.x))
}
