use crate::errors::{AppError, AppResult};
use crate::model::{now, MindMap, Preferences, PreferencesUpdate, StorageData, DEFAULT_MAP_TITLE};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::tree;

pub const STORAGE_KEY: &str = "aimindmap_data";

/// Owns every mind map of a session plus the current-map selector and the
/// user preferences, and writes them back through a [`KeyValueStore`].
///
/// Persistence failures never escape: they are logged, the in-memory state
/// keeps serving reads and writes, and [`MindMapStore::is_saved`] turns false.
pub struct MindMapStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
    data: StorageData,
    saved: bool,
}

impl MindMapStore {
    /// Reads the persisted blob under `key`. A missing or unreadable blob
    /// yields an empty collection.
    pub fn load(backend: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let data = match backend.get(&key) {
            Ok(Some(raw)) => match deserialize(&raw) {
                Ok(data) => {
                    log::info!("loaded {} mind map(s) from {:?}", data.mindmaps.len(), key);
                    data
                }
                Err(e) => {
                    log::warn!("stored data under {:?} is corrupt, starting empty: {}", key, e);
                    StorageData::default()
                }
            },
            Ok(None) => {
                log::info!("no stored data under {:?}, starting empty", key);
                StorageData::default()
            }
            Err(e) => {
                log::error!("failed to read stored data under {:?}: {}", key, e);
                StorageData::default()
            }
        };

        Self {
            backend,
            key,
            data,
            saved: true,
        }
    }

    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStore::new()), STORAGE_KEY)
    }

    pub fn data(&self) -> &StorageData {
        &self.data
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    pub fn mind_maps(&self) -> &[MindMap] {
        &self.data.mindmaps
    }

    pub fn preferences(&self) -> &Preferences {
        &self.data.preferences
    }

    /// False while changes are pending or the last write failed.
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn current_mind_map(&self) -> Option<&MindMap> {
        self.data
            .mindmaps
            .iter()
            .find(|m| m.id == self.data.current_map_id)
    }

    fn current_index(&self) -> Option<usize> {
        self.data
            .mindmaps
            .iter()
            .position(|m| m.id == self.data.current_map_id)
    }

    /// Appends a new single-root map, makes it current and returns a copy.
    pub fn create_mind_map(&mut self, title: Option<&str>) -> MindMap {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_MAP_TITLE);
        let map = MindMap::new(title, self.data.preferences.default_theme);

        self.data.current_map_id = map.id.clone();
        self.data.mindmaps.push(map.clone());
        log::debug!("created mind map {} ({:?})", map.id, map.title);
        self.commit();
        map
    }

    pub fn select_mind_map(&mut self, id: &str) -> AppResult<()> {
        if !self.data.mindmaps.iter().any(|m| m.id == id) {
            return Err(AppError::MapNotFound(id.to_string()));
        }
        self.data.current_map_id = id.to_string();
        self.commit();
        Ok(())
    }

    /// Replaces the current map with `updater(copy)` and stamps `updated_at`.
    /// Does nothing when no map is current.
    pub fn update_current_mind_map<F>(&mut self, updater: F) -> Option<&MindMap>
    where
        F: FnOnce(MindMap) -> MindMap,
    {
        let idx = self.current_index()?;
        Some(self.update_at(idx, updater))
    }

    /// Like [`MindMapStore::update_current_mind_map`] for any stored map,
    /// current or not.
    pub fn update_mind_map<F>(&mut self, id: &str, updater: F) -> AppResult<&MindMap>
    where
        F: FnOnce(MindMap) -> MindMap,
    {
        let idx = self
            .data
            .mindmaps
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| AppError::MapNotFound(id.to_string()))?;
        Ok(self.update_at(idx, updater))
    }

    fn update_at<F>(&mut self, idx: usize, updater: F) -> &MindMap
    where
        F: FnOnce(MindMap) -> MindMap,
    {
        let mut updated = updater(self.data.mindmaps[idx].clone());
        updated.updated_at = now();
        self.data.mindmaps[idx] = updated;

        self.commit();
        &self.data.mindmaps[idx]
    }

    pub fn update_preferences(&mut self, update: PreferencesUpdate) {
        let prefs = &mut self.data.preferences;
        if let Some(theme) = update.default_theme {
            prefs.default_theme = theme;
        }
        if let Some(auto_save) = update.auto_save {
            prefs.auto_save = auto_save;
        }
        self.commit();
    }

    /// Removes a map; clears the selection if it was current.
    pub fn delete_mind_map(&mut self, id: &str) -> AppResult<MindMap> {
        let idx = self
            .data
            .mindmaps
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| AppError::MapNotFound(id.to_string()))?;

        let removed = self.data.mindmaps.remove(idx);
        if self.data.current_map_id == id {
            self.data.current_map_id.clear();
        }
        self.commit();
        Ok(removed)
    }

    /// Adds (or replaces, on id collision) a map and makes it current.
    /// With `strict`, structurally invalid maps are rejected.
    pub fn import_mind_map(&mut self, map: MindMap, strict: bool) -> AppResult<()> {
        if strict {
            tree::validate(&map.nodes)?;
        }

        self.data.current_map_id = map.id.clone();
        match self.data.mindmaps.iter_mut().find(|m| m.id == map.id) {
            Some(existing) => *existing = map,
            None => self.data.mindmaps.push(map),
        }
        self.commit();
        Ok(())
    }

    pub fn export_mind_map(&self, id: &str) -> AppResult<String> {
        let map = self
            .data
            .mindmaps
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::MapNotFound(id.to_string()))?;
        Ok(serde_json::to_string_pretty(map)?)
    }

    /// Writes the whole collection to the backend now.
    pub fn save(&mut self) -> AppResult<()> {
        let blob = serialize(&self.data)?;
        match self.backend.set(&self.key, &blob) {
            Ok(()) => {
                self.saved = true;
                Ok(())
            }
            Err(e) => {
                self.saved = false;
                Err(e.into())
            }
        }
    }

    /// Persists after every mutation. The `auto_save` preference is stored
    /// like any other and never holds a write back.
    fn commit(&mut self) {
        if let Err(e) = self.save() {
            log::error!("failed to persist mind maps under {:?}: {}", self.key, e);
        }
    }
}

pub fn serialize(data: &StorageData) -> Result<String, serde_json::Error> {
    serde_json::to_string(data)
}

pub fn deserialize(raw: &str) -> Result<StorageData, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Suggested download name for an exported map.
pub fn export_file_name(map: &MindMap) -> String {
    let stem: String = map
        .title
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{}-mindmap.json", stem)
}
