mod editing;
mod file;
mod help;
mod ideas;
mod maps;
mod movement;
mod node;

use crate::app::AppState;
use anyhow::Result;

// Re-export all public functions from submodules
pub use editing::*;
pub use file::*;
pub use help::*;
pub use ideas::*;
pub use maps::*;
pub use movement::*;
pub use node::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Application control
    Quit,
    ForceQuit,

    // Movement
    GoUp,
    GoDown,
    GoLeft,
    GoRight,
    GoToRoot,

    // Node manipulation
    AddChild,
    DeleteNode,
    NextColor,
    PreviousColor,
    MarkForMove,
    MoveMarkedHere,

    // AI
    GenerateIdeas,

    // Editing
    EditNode,
    TypeChar(char),
    Backspace,
    Delete,
    MoveCursorLeft,
    MoveCursorRight,
    MoveCursorHome,
    MoveCursorEnd,
    ConfirmEdit,
    CancelEdit,

    // Maps
    NewMap,
    PreviousMap,
    NextMap,
    RenameMap,

    // Persistence
    Save,
    ToggleAutoSave,

    // Help
    ShowHelp,
    CloseHelp,
}

pub fn execute_action(action: Action, app: &mut AppState) -> Result<()> {
    match action {
        Action::Quit => file::quit(app),
        Action::ForceQuit => {
            app.running = false;
        }

        // Movement actions
        Action::GoUp => movement::go_up(app),
        Action::GoDown => movement::go_down(app),
        Action::GoLeft => movement::go_left(app),
        Action::GoRight => movement::go_right(app),
        Action::GoToRoot => movement::go_to_root(app),

        // Node manipulation
        Action::AddChild => node::add_child(app),
        Action::DeleteNode => node::delete_node(app),
        Action::NextColor => node::cycle_color(app, true),
        Action::PreviousColor => node::cycle_color(app, false),
        Action::MarkForMove => node::mark_for_move(app),
        Action::MoveMarkedHere => node::move_marked_here(app),

        Action::GenerateIdeas => ideas::request_ideas(app),

        // Editing
        Action::EditNode => editing::start_editing(app),
        Action::TypeChar(c) => editing::type_char(app, c),
        Action::Backspace => editing::backspace(app),
        Action::Delete => editing::delete_char(app),
        Action::MoveCursorLeft => editing::move_cursor_left(app),
        Action::MoveCursorRight => editing::move_cursor_right(app),
        Action::MoveCursorHome => editing::move_cursor_home(app),
        Action::MoveCursorEnd => editing::move_cursor_end(app),
        Action::ConfirmEdit => editing::confirm_edit(app),
        Action::CancelEdit => editing::cancel_edit(app),

        // Maps
        Action::NewMap => maps::new_map(app),
        Action::PreviousMap => maps::switch_map(app, false),
        Action::NextMap => maps::switch_map(app, true),
        Action::RenameMap => maps::start_rename(app),

        // Persistence
        Action::Save => file::save(app),
        Action::ToggleAutoSave => file::toggle_auto_save(app),

        // Help
        Action::ShowHelp => help::show_help(app),
        Action::CloseHelp => help::close_help(app),
    }
    Ok(())
}
