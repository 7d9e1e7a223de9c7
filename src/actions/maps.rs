use crate::actions::editing;
use crate::app::{AppState, EditTarget};

pub fn new_map(app: &mut AppState) {
    let map = app.create_map(None);
    // Name it straight away; Esc keeps the default title
    editing::begin_edit(app, EditTarget::MapTitle, String::new());
    log::debug!("new map {} ready for naming", map.id);
}

pub fn switch_map(app: &mut AppState, forward: bool) {
    match app.cycle_map(forward) {
        Ok(()) => {
            if let Some(map) = app.current_map() {
                let msg = format!("Map: {}", map.title);
                app.set_message(msg);
            }
        }
        Err(e) => app.set_message(e.to_string()),
    }
}

pub fn start_rename(app: &mut AppState) {
    if let Some(title) = app.current_map().map(|m| m.title.clone()) {
        editing::begin_edit(app, EditTarget::MapTitle, title);
    }
}
