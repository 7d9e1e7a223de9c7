use crate::app::AppState;
use crate::errors::AppError;
use crate::model::{MindMap, PreferencesUpdate};
use crate::store::export_file_name;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn save(app: &mut AppState) {
    match app.store.save() {
        Ok(()) => app.set_message("Saved"),
        Err(e) => {
            log::error!("explicit save failed: {}", e);
            app.set_message(format!("Failed to save: {}", e));
        }
    }
}

pub fn toggle_auto_save(app: &mut AppState) {
    let enabled = !app.store.preferences().auto_save;
    app.store.update_preferences(PreferencesUpdate {
        auto_save: Some(enabled),
        ..Default::default()
    });

    if app.store.is_saved() {
        app.set_message(format!("Auto-save {}", if enabled { "on" } else { "off" }));
    } else {
        app.set_message(format!(
            "Auto-save {} (not saved, storage is failing)",
            if enabled { "on" } else { "off" }
        ));
    }
}

/// Retries a failed write, then stops. A second failure keeps the app
/// running so the user can retry or force quit.
pub fn quit(app: &mut AppState) {
    if !app.store.is_saved() {
        if let Err(e) = app.store.save() {
            log::error!("flush on quit failed: {}", e);
            app.set_message(format!("Save failed ({}); press Q to quit anyway", e));
            return;
        }
    }
    app.running = false;
}

/// Writes the current map as pretty JSON to `path`. A directory gets a
/// `<title>-mindmap.json` file inside it. Returns the file written.
pub fn export_map(app: &AppState, path: &Path) -> Result<PathBuf> {
    let map = app.current_map().ok_or(AppError::NoCurrentMap)?;
    let json = app.store.export_mind_map(&map.id)?;

    let path = if path.is_dir() {
        path.join(export_file_name(map))
    } else {
        path.to_path_buf()
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;

    log::info!("exported map {} to {}", map.id, path.display());
    Ok(path)
}

/// Reads a single exported map from `path` into the store and selects it.
pub fn import_map(app: &mut AppState, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let map: MindMap = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a mind map export", path.display()))?;

    let title = map.title.clone();
    app.store.import_mind_map(map, app.config.strict_roots)?;
    app.selected_node_id = None;
    app.relayout();
    app.set_message(format!("Imported \"{}\"", title));
    Ok(())
}
