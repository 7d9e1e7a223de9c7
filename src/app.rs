use crate::ai::{idea_nodes, AiError, IdeaRequest, InFlightGuard};
use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::layout::LayoutEngine;
use crate::model::{MindMap, Node, NodeId, ThemeColor, DEFAULT_NODE_CONTENT};
use crate::reducers;
use crate::store::MindMapStore;
use crate::tree;

#[derive(Debug, Clone, PartialEq)]
pub enum EditTarget {
    Node(NodeId),
    MapTitle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Editing {
        target: EditTarget,
        buffer: String,
        cursor_pos: usize,
    },
    Help,
}

pub struct AppState {
    pub running: bool,
    pub mode: AppMode,
    pub store: MindMapStore,
    pub config: AppConfig,

    // Derived from the current map after every change
    pub layout: LayoutEngine,

    pub selected_node_id: Option<NodeId>,
    // Node marked with `x`, waiting for a new parent
    pub move_source: Option<NodeId>,
    pub ai: InFlightGuard,
    // Claimed request waiting to be handed to a worker thread
    pub pending_request: Option<IdeaRequest>,

    // Message for status line
    pub message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, store: MindMapStore) -> Self {
        let mut app = Self {
            running: true,
            mode: AppMode::Normal,
            store,
            config,
            layout: LayoutEngine::new(),
            selected_node_id: None,
            move_source: None,
            ai: InFlightGuard::new(),
            pending_request: None,
            message: None,
        };
        app.relayout();
        app
    }

    /// Makes sure there is a current map to draw, creating one if needed.
    pub fn ensure_current_map(&mut self) {
        if self.store.current_mind_map().is_some() {
            return;
        }
        if let Some(first) = self.store.mind_maps().first().map(|m| m.id.clone()) {
            // Only fails for unknown ids
            let _ = self.store.select_mind_map(&first);
        } else {
            self.store.create_mind_map(None);
        }
        self.relayout();
    }

    pub fn current_map(&self) -> Option<&MindMap> {
        self.store.current_mind_map()
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.layout.nodes.iter().find(|n| n.is_root).map(|n| n.id.clone())
    }

    pub fn selected_node(&self) -> Option<&Node> {
        let id = self.selected_node_id.as_deref()?;
        self.current_map()?.get_node(id)
    }

    /// Recomputes positions for the current map and repairs the selection.
    pub fn relayout(&mut self) {
        let layout_config = self.config.layout();
        self.layout = match self.store.current_mind_map() {
            Some(map) => LayoutEngine::calculate_layout(&map.nodes, &layout_config),
            None => LayoutEngine::new(),
        };

        let selection_valid = self
            .selected_node_id
            .as_deref()
            .is_some_and(|id| self.layout.contains(id));
        if !selection_valid {
            self.selected_node_id = self.root_id();
        }
        if let Some(source) = self.move_source.as_deref() {
            if !self.layout.contains(source) {
                self.move_source = None;
            }
        }
    }

    fn require_node(&self, id: &str) -> AppResult<&Node> {
        let map = self.current_map().ok_or(AppError::NoCurrentMap)?;
        map.get_node(id)
            .ok_or_else(|| AppError::NodeNotFound(id.to_string()))
    }

    fn apply<F>(&mut self, updater: F)
    where
        F: FnOnce(MindMap) -> MindMap,
    {
        self.store.update_current_mind_map(updater);
        self.relayout();
    }

    /// Appends a new child under `parent_id` and returns its id.
    pub fn add_child(&mut self, parent_id: &str, content: Option<&str>) -> AppResult<NodeId> {
        self.require_node(parent_id)?;

        let child = Node::child_of(
            parent_id,
            content.unwrap_or(DEFAULT_NODE_CONTENT),
            ThemeColor::default(),
        );
        let id = child.id.clone();
        log::debug!("adding node {} under {}", id, parent_id);

        self.apply(|map| reducers::append_nodes(map, vec![child]));
        Ok(id)
    }

    pub fn update_node(&mut self, id: &str, content: &str, color: Option<ThemeColor>) -> AppResult<()> {
        self.require_node(id)?;
        self.apply(|map| reducers::update_node(map, id, content, color));
        Ok(())
    }

    /// Removes a node together with its subtree. The root stays.
    pub fn delete_node(&mut self, id: &str) -> AppResult<usize> {
        let node = self.require_node(id)?;
        if node.is_root() {
            return Err(AppError::CannotDeleteRoot);
        }

        let before = self.current_map().map_or(0, |m| m.nodes.len());
        self.apply(|map| reducers::delete_subtree(map, id));
        let after = self.current_map().map_or(0, |m| m.nodes.len());
        Ok(before.saturating_sub(after))
    }

    pub fn move_node(&mut self, id: &str, new_parent_id: &str) -> AppResult<()> {
        let map = self.current_map().ok_or(AppError::NoCurrentMap)?;
        tree::can_reparent(&map.nodes, id, new_parent_id)?;

        self.apply(|map| reducers::move_node(map, id, new_parent_id));
        Ok(())
    }

    /// Steps the node's colour. Recolouring the root also sets the map theme.
    pub fn cycle_color(&mut self, id: &str, forward: bool) -> AppResult<ThemeColor> {
        let node = self.require_node(id)?;
        let is_root = node.is_root();
        let color = if forward { node.color.next() } else { node.color.previous() };

        self.apply(|map| {
            let map = reducers::set_color(map, id, color);
            if is_root {
                reducers::set_theme(map, color)
            } else {
                map
            }
        });
        Ok(color)
    }

    pub fn rename_current_map(&mut self, title: &str) -> AppResult<()> {
        if self.current_map().is_none() {
            return Err(AppError::NoCurrentMap);
        }
        self.apply(|map| reducers::rename(map, title));
        Ok(())
    }

    pub fn create_map(&mut self, title: Option<&str>) -> MindMap {
        let map = self.store.create_mind_map(title);
        self.selected_node_id = None;
        self.move_source = None;
        self.relayout();
        map
    }

    /// Steps through the stored maps, wrapping at both ends.
    pub fn cycle_map(&mut self, forward: bool) -> AppResult<()> {
        let maps = self.store.mind_maps();
        if maps.is_empty() {
            return Err(AppError::NoCurrentMap);
        }
        let current = self
            .current_map()
            .and_then(|cur| maps.iter().position(|m| m.id == cur.id));

        let len = maps.len();
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        };
        let id = maps[next].id.clone();

        self.store.select_mind_map(&id)?;
        self.selected_node_id = None;
        self.move_source = None;
        self.relayout();
        Ok(())
    }

    /// Claims the in-flight guard for `node_id` and builds the request.
    pub fn begin_ai_generation(&mut self, node_id: &str) -> AppResult<IdeaRequest> {
        self.require_node(node_id)?;
        if let Some(busy) = self.ai.in_flight() {
            return Err(AppError::AiBusy(busy.to_string()));
        }

        let map = self.current_map().ok_or(AppError::NoCurrentMap)?;
        let map_id = map.id.clone();
        let nodes = map.nodes.clone();
        self.ai.try_begin(&map_id, node_id);

        Ok(IdeaRequest {
            nodes,
            target_node_id: node_id.to_string(),
        })
    }

    /// Applies a settled idea request to the map it was made in, even when
    /// another map is current by now. The guard is released whatever the
    /// outcome; on failure no map is touched.
    pub fn finish_ai_generation(&mut self, result: Result<Vec<String>, AiError>) -> AppResult<usize> {
        let pending = self.ai.finish();

        let ideas = match result {
            Ok(ideas) => ideas,
            Err(e) => {
                log::warn!("idea generation for {:?} failed: {}", pending, e);
                return Err(e.into());
            }
        };

        let Some(pending) = pending else {
            log::warn!("dropping {} idea(s) with no request in flight", ideas.len());
            return Ok(0);
        };
        let map = self
            .store
            .mind_maps()
            .iter()
            .find(|m| m.id == pending.map_id)
            .ok_or_else(|| AppError::MapNotFound(pending.map_id.clone()))?;
        if map.get_node(&pending.node_id).is_none() {
            log::info!("target node {} is gone, dropping ideas", pending.node_id);
            return Err(AppError::NodeNotFound(pending.node_id));
        }

        let nodes = idea_nodes(&pending.node_id, &ideas);
        let count = nodes.len();
        if count > 0 {
            self.store
                .update_mind_map(&pending.map_id, |map| reducers::append_nodes(map, nodes))?;
            self.relayout();
        }
        Ok(count)
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }
}
