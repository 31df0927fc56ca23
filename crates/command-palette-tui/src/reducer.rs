use command_palette::{Display, PaletteEvent, SelectionEvent};
use ratatui::layout::Position;

use crate::{actions::Action, effect::Effect, state::*};

/// Root reducer
/// Takes state and action, updates state in place and returns effects to perform
pub fn reduce(state: &mut AppState, action: Action) -> Vec<Effect> {
    if !matches!(action, Action::TickSpinner | Action::None) {
        state.ui.last_error = None;
    }

    match action {
        Action::Palette(event) => palette_reducer(state, event),
        Action::MouseClick(column, row) => {
            let event = click_target(state, Position::new(column, row));
            match event {
                Some(event) => palette_reducer(state, event),
                None => vec![],
            }
        }
        other => {
            let mut effects = ui_reducer(&mut state.ui, &other);
            effects.extend(counter_reducer(state, &other));
            effects
        }
    }
}

/// Palette reducer - forwards events to the palette state machine
fn palette_reducer(state: &mut AppState, event: PaletteEvent) -> Vec<Effect> {
    if let Err(err) = state.palette.dispatch(event) {
        // The palette stays open and usable; just tell the user
        log::warn!("Command failed: {}", err);
        state.ui.last_error = Some(err.to_string());
    }
    vec![]
}

/// Work out what a click at `position` means for the palette
fn click_target(state: &AppState, position: Position) -> Option<PaletteEvent> {
    let layout = &state.ui.layout;

    if state.palette.is_open() {
        if let Some(index) = layout.suggestion_at(position) {
            return Some(PaletteEvent::Select(SelectionEvent::click(index)));
        }
        if layout.inside_palette(position) {
            return Some(PaletteEvent::FocusInput);
        }
        return Some(PaletteEvent::ClickOutside);
    }

    layout
        .trigger_button
        .contains(position)
        .then_some(PaletteEvent::TriggerButton)
}

/// UI state reducer - handles UI-related actions
fn ui_reducer(state: &mut UiState, action: &Action) -> Vec<Effect> {
    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::TickSpinner => {
            // Increment spinner frame for animation (0-9 cycle)
            state.spinner_frame = (state.spinner_frame + 1) % 10;
        }
        _ => {}
    }

    vec![]
}

/// Demo command reducer - the things the palette's commands actually do
fn counter_reducer(state: &mut AppState, action: &Action) -> Vec<Effect> {
    match action {
        Action::Increment => {
            state.counter += 1;
            log::info!("Counter incremented to {}", state.counter);
            command_completed(state);
            vec![Effect::RefreshCommands]
        }
        Action::Decrement => {
            state.counter -= 1;
            log::info!("Counter decremented to {}", state.counter);
            command_completed(state);
            vec![Effect::RefreshCommands]
        }
        Action::ResetCounter => {
            state.counter = 0;
            log::info!("Counter reset");
            command_completed(state);
            vec![Effect::RefreshCommands]
        }
        Action::StartSlowTask => {
            state.ui.tasks_running += 1;
            log::info!("Slow task started");
            vec![Effect::SpawnSlowTask]
        }
        Action::SlowTaskFinished => {
            state.ui.tasks_running = state.ui.tasks_running.saturating_sub(1);
            log::info!("Slow task finished");
            command_completed(state);
            vec![]
        }
        Action::TogglePaletteDisplay => {
            let mut config = state.palette.config().clone();
            config.display = match config.display {
                Display::Modal => Display::Inline,
                Display::Inline => Display::Modal,
            };
            log::info!("Palette display switched to {:?}", config.display);
            if let Err(err) = state.palette.update_config(config) {
                log::error!("Failed to update palette config: {}", err);
                state.ui.last_error = Some(err.to_string());
            }
            command_completed(state);
            vec![]
        }
        Action::ClearActivity => {
            if let Ok(mut logs) = state.activity.lock() {
                logs.clear();
            }
            command_completed(state);
            vec![Effect::RefreshCommands]
        }
        Action::RefreshCommands => vec![Effect::RefreshCommands],
        _ => vec![],
    }
}

/// A command handler's work is done; hide the spinner unless a slow task
/// is still running
fn command_completed(state: &mut AppState) {
    if state.ui.tasks_running == 0 {
        state.palette.finish_pending();
    }
}
