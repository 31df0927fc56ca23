use command_palette::PaletteEvent;

/// Action enum - represents all possible actions in the application
/// Actions are dispatched to the reducer to update state
#[derive(Debug, Clone)]
pub enum Action {
    /// Forwarded to the command palette state machine
    Palette(PaletteEvent),
    /// Left click at terminal cell (column, row)
    MouseClick(u16, u16),

    // Demo commands (what the palette's handlers dispatch)
    Increment,
    Decrement,
    ResetCounter,
    StartSlowTask,
    SlowTaskFinished,
    TogglePaletteDisplay,
    ClearActivity,
    /// Rebuild the palette's command list from the providers
    RefreshCommands,

    TickSpinner, // Increment spinner animation frame
    Quit,
    None,
}

impl Action {
    /// Map a handler id (as used in config files) to its action
    pub fn from_id(id: &str) -> Option<Action> {
        let action = match id {
            "increment" => Action::Increment,
            "decrement" => Action::Decrement,
            "reset" => Action::ResetCounter,
            "slow_task" => Action::StartSlowTask,
            "toggle_display" => Action::TogglePaletteDisplay,
            "clear_activity" => Action::ClearActivity,
            "quit" => Action::Quit,
            _ => return None,
        };
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        assert!(matches!(Action::from_id("increment"), Some(Action::Increment)));
        assert!(matches!(Action::from_id("quit"), Some(Action::Quit)));
        assert!(Action::from_id("launch_rockets").is_none());
    }
}
