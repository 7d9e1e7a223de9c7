use crate::actions::Action;
use crate::app::{AppMode, AppState};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

pub fn handle_events(app: &mut AppState) -> Result<Option<Action>> {
    if event::poll(Duration::from_millis(50))? {
        if let Event::Key(key) = event::read()? {
            // Windows reports releases as well
            if key.kind != KeyEventKind::Release {
                return Ok(handle_key_event(app, key));
            }
        }
    }
    Ok(None)
}

pub fn handle_key_event(app: &AppState, key: KeyEvent) -> Option<Action> {
    match &app.mode {
        AppMode::Normal => handle_normal_mode(key),
        AppMode::Editing { .. } => handle_editing_mode(key),
        AppMode::Help => handle_help_mode(key),
    }
}

fn handle_normal_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        // Quit
        (Char('q'), KeyModifiers::NONE) => Some(Action::Quit),
        (Char('Q'), KeyModifiers::SHIFT) => Some(Action::ForceQuit),
        (Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),

        // Movement
        (Char('h'), KeyModifiers::NONE) | (Left, _) => Some(Action::GoLeft),
        (Char('j'), KeyModifiers::NONE) | (Down, _) => Some(Action::GoDown),
        (Char('k'), KeyModifiers::NONE) | (Up, _) => Some(Action::GoUp),
        (Char('l'), KeyModifiers::NONE) | (Right, _) => Some(Action::GoRight),
        (Char('r'), KeyModifiers::NONE) => Some(Action::GoToRoot),

        // Node manipulation
        (Char('a'), KeyModifiers::NONE) | (Tab, KeyModifiers::NONE) => Some(Action::AddChild),
        (Char('e'), KeyModifiers::NONE) | (Enter, KeyModifiers::NONE) => Some(Action::EditNode),
        (Char('d'), KeyModifiers::NONE) | (Delete, _) => Some(Action::DeleteNode),
        (Char('c'), KeyModifiers::NONE) => Some(Action::NextColor),
        (Char('C'), KeyModifiers::SHIFT) => Some(Action::PreviousColor),
        (Char('x'), KeyModifiers::NONE) => Some(Action::MarkForMove),
        (Char('p'), KeyModifiers::NONE) => Some(Action::MoveMarkedHere),

        (Char('g'), KeyModifiers::NONE) => Some(Action::GenerateIdeas),

        // Maps
        (Char('n'), KeyModifiers::NONE) => Some(Action::NewMap),
        (Char('['), KeyModifiers::NONE) => Some(Action::PreviousMap),
        (Char(']'), KeyModifiers::NONE) => Some(Action::NextMap),
        (Char('t'), KeyModifiers::NONE) => Some(Action::RenameMap),

        // Persistence
        (Char('s'), KeyModifiers::NONE) => Some(Action::Save),
        (Char('A'), KeyModifiers::SHIFT) => Some(Action::ToggleAutoSave),

        // Help
        (Char('?'), _) => Some(Action::ShowHelp),

        _ => None,
    }
}

fn handle_editing_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        (Esc, _) => Some(Action::CancelEdit),
        (Enter, _) => Some(Action::ConfirmEdit),
        (Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Some(Action::TypeChar(c)),

        (Backspace, _) => Some(Action::Backspace),
        (Delete, _) => Some(Action::Delete),

        (Left, _) => Some(Action::MoveCursorLeft),
        (Right, _) => Some(Action::MoveCursorRight),
        (Home, _) | (Char('a'), KeyModifiers::CONTROL) => Some(Action::MoveCursorHome),
        (End, _) | (Char('e'), KeyModifiers::CONTROL) => Some(Action::MoveCursorEnd),

        _ => None,
    }
}

fn handle_help_mode(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseHelp),
        _ => None,
    }
}
