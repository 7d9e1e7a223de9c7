use crate::ai::AiError;
use crate::app::AppState;

/// Claims the in-flight guard for the selected node and queues the request
/// for the event loop to hand to a worker.
pub fn request_ideas(app: &mut AppState) {
    if app.config.idea_command.is_none() {
        app.set_message("No idea_command configured");
        return;
    }
    let Some(id) = app.selected_node_id.clone() else {
        return;
    };

    match app.begin_ai_generation(&id) {
        Ok(request) => {
            log::info!("requesting ideas for node {}", id);
            app.pending_request = Some(request);
            app.set_message("Generating ideas...");
        }
        // A request already in flight: this one is dropped
        Err(e) => app.set_message(e.to_string()),
    }
}

/// Merges a settled request into the current map.
pub fn apply_ideas(app: &mut AppState, result: Result<Vec<String>, AiError>) {
    match app.finish_ai_generation(result) {
        Ok(0) => app.set_message("The generator returned no ideas"),
        Ok(count) => app.set_message(format!("Added {} idea(s)", count)),
        Err(e) => app.set_message(e.to_string()),
    }
}
