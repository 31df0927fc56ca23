use command_palette::CommandPalette;
use ratatui::layout::{Position, Rect};

use crate::{log_capture::LogBuffer, theme::Theme};

/// Root application state following Redux pattern
#[derive(Debug)]
pub struct AppState {
    pub ui: UiState,
    pub counter: i64,
    pub palette: CommandPalette,
    /// Captured log records, shown in the activity pane
    pub activity: LogBuffer,
    pub theme: Theme,
}

impl AppState {
    pub fn new(palette: CommandPalette, activity: LogBuffer) -> Self {
        Self {
            ui: UiState::default(),
            counter: 0,
            palette,
            activity,
            theme: Theme::default(),
        }
    }

    /// Snapshot of what command providers filter on
    pub fn command_context(&self) -> CommandContext {
        CommandContext {
            counter: self.counter,
            has_activity: self.activity.lock().map(|l| !l.is_empty()).unwrap_or(false),
        }
    }
}

/// Context handed to command providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandContext {
    pub counter: i64,
    pub has_activity: bool,
}

/// UI-specific state (spinner, quit flag, last rendered layout)
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub spinner_frame: usize,
    pub should_quit: bool,
    /// Number of slow tasks still running
    pub tasks_running: usize,
    /// Last palette error, shown in the status line until the next action
    pub last_error: Option<String>,
    pub layout: LayoutState,
}

/// Screen regions recorded during the last render, used for mouse hit tests
#[derive(Debug, Clone, Default)]
pub struct LayoutState {
    pub trigger_button: Rect,
    pub palette_area: Option<Rect>,
    /// (row area, suggestion index)
    pub suggestion_rows: Vec<(Rect, usize)>,
}

impl LayoutState {
    pub fn suggestion_at(&self, position: Position) -> Option<usize> {
        self.suggestion_rows
            .iter()
            .find(|(area, _)| area.contains(position))
            .map(|(_, index)| *index)
    }

    pub fn inside_palette(&self, position: Position) -> bool {
        self.palette_area
            .map(|area| area.contains(position))
            .unwrap_or(false)
    }
}
