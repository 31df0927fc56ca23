//! Palette state machine
//!
//! Owns the open/closed state, the query and the derived suggestion list.
//! Every mutation runs the matcher synchronously, so the suggestions are
//! always up to date when the caller renders.

use crate::command::{Command, Suggestion};
use crate::config::{Display, PaletteConfig, Spinner};
use crate::error::{ConfigError, SelectError};
use crate::hotkey::{HotKeyGuard, HotKeyRegistry, KeyChord, ListenerId};
use crate::search::filter_commands;
use crate::selection::{self, SelectionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteStatus {
    #[default]
    Closed,
    Open,
}

/// Everything that can happen to a palette
#[derive(Debug, Clone)]
pub enum PaletteEvent {
    HotKey(KeyChord),
    TriggerButton,
    Escape,
    ClickOutside,
    QueryChanged(String),
    Input(char),
    Backspace,
    ClearQuery,
    HighlightNext,
    HighlightPrev,
    Select(SelectionEvent),
    /// Select the highlighted suggestion
    Confirm,
    CommandsChanged(Vec<Command>),
    /// The pending command reported back; hides the spinner
    CommandFinished,
    FocusInput,
    BlurInput,
}

/// A command palette bound to one command list
#[derive(Debug)]
pub struct CommandPalette {
    config: PaletteConfig,
    hot_keys: Vec<KeyChord>,
    commands: Vec<Command>,
    status: PaletteStatus,
    query: String,
    suggestions: Vec<Suggestion>,
    highlighted: usize,
    input_focused: bool,
    /// Name of the command whose spinner is showing
    pending: Option<String>,
    hotkey_guard: Option<HotKeyGuard>,
}

impl CommandPalette {
    /// Build a palette, rejecting invalid configuration up front
    pub fn new(commands: Vec<Command>, config: PaletteConfig) -> Result<Self, ConfigError> {
        let hot_keys = config.validate()?;
        let status = if config.open {
            PaletteStatus::Open
        } else {
            PaletteStatus::Closed
        };

        let mut palette = Self {
            input_focused: config.open,
            config,
            hot_keys,
            commands,
            status,
            query: String::new(),
            suggestions: Vec::new(),
            highlighted: 0,
            pending: None,
            hotkey_guard: None,
        };
        palette.refresh();

        log::debug!(
            "Command palette created with {} commands ({:?})",
            palette.commands.len(),
            palette.status
        );
        Ok(palette)
    }

    pub fn status(&self) -> PaletteStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == PaletteStatus::Open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn highlighted_suggestion(&self) -> Option<&Suggestion> {
        self.suggestions.get(self.highlighted)
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    /// Name of the command the spinner is showing for, if any
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn config(&self) -> &PaletteConfig {
        &self.config
    }

    pub fn placeholder(&self) -> &str {
        &self.config.placeholder
    }

    pub fn header(&self) -> Option<&str> {
        self.config.header.as_deref()
    }

    pub fn spinner(&self) -> &Spinner {
        &self.config.spinner
    }

    pub fn display(&self) -> Display {
        self.config.display
    }

    pub fn hot_keys(&self) -> &[KeyChord] {
        &self.hot_keys
    }

    /// Register this palette's hotkeys; replaces any earlier registration
    pub fn listen(&mut self, registry: &HotKeyRegistry) -> ListenerId {
        let guard = registry.register(self.hot_keys.clone());
        let id = guard.id();
        self.hotkey_guard = Some(guard);
        id
    }

    /// Drop the hotkey registration, if any
    pub fn unlisten(&mut self) {
        self.hotkey_guard = None;
    }

    pub fn listener_id(&self) -> Option<ListenerId> {
        self.hotkey_guard.as_ref().map(HotKeyGuard::id)
    }

    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        self.status = PaletteStatus::Open;
        self.input_focused = true;
        log::debug!("Command palette opened");
    }

    /// Close the palette and reset the query
    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        self.status = PaletteStatus::Closed;
        self.input_focused = false;
        self.pending = None;
        self.query.clear();
        self.highlighted = 0;
        self.refresh();
        log::debug!("Command palette closed");
    }

    /// Open if `chord` is one of the configured hotkeys
    ///
    /// Returns whether the chord was recognised, even if the palette was
    /// already open.
    pub fn handle_hotkey(&mut self, chord: &KeyChord) -> bool {
        if !self.hot_keys.contains(chord) {
            return false;
        }
        self.open();
        true
    }

    /// Escape only closes while the input has focus
    pub fn escape(&mut self) {
        if self.input_focused {
            self.close();
        }
    }

    /// Inline palettes have no overlay to click outside of
    pub fn click_outside(&mut self) {
        if self.config.display == Display::Modal {
            self.close();
        }
    }

    pub fn focus_input(&mut self) {
        if self.is_open() {
            self.input_focused = true;
        }
    }

    pub fn blur_input(&mut self) {
        self.input_focused = false;
    }

    /// Replace the query and re-filter
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.pending = None;
        self.highlighted = 0;
        self.refresh();
    }

    pub fn push_char(&mut self, c: char) {
        let mut query = std::mem::take(&mut self.query);
        query.push(c);
        self.set_query(query);
    }

    pub fn backspace(&mut self) {
        let mut query = std::mem::take(&mut self.query);
        query.pop();
        self.set_query(query);
    }

    /// Swap the command list, keeping the current query
    pub fn set_commands(&mut self, commands: Vec<Command>) {
        self.commands = commands;
        self.refresh();
        self.clamp_highlight();
        log::debug!(
            "Command list replaced ({} commands, {} shown)",
            self.commands.len(),
            self.suggestions.len()
        );
    }

    /// Apply a new configuration
    ///
    /// Validation happens before anything changes, so an invalid config
    /// leaves the palette as it was. Hotkey registrations follow the new
    /// chords.
    pub fn update_config(&mut self, config: PaletteConfig) -> Result<(), ConfigError> {
        let hot_keys = config.validate()?;
        self.config = config;
        self.hot_keys = hot_keys;

        if let Some(guard) = self.hotkey_guard.take() {
            if let Some(registry) = guard.registry() {
                self.hotkey_guard = Some(registry.register(self.hot_keys.clone()));
            }
        }

        self.refresh();
        self.clamp_highlight();
        Ok(())
    }

    pub fn highlight_next(&mut self) {
        if self.suggestions.is_empty() {
            return;
        }
        self.highlighted = (self.highlighted + 1) % self.suggestions.len();
    }

    pub fn highlight_prev(&mut self) {
        if self.suggestions.is_empty() {
            return;
        }
        self.highlighted = self
            .highlighted
            .checked_sub(1)
            .unwrap_or(self.suggestions.len() - 1);
    }

    /// Run the command behind `event`
    ///
    /// On success the palette closes or shows the spinner, depending on
    /// `close_on_select`. On failure nothing changes.
    pub fn select(&mut self, event: SelectionEvent) -> Result<(), SelectError> {
        let name = {
            let suggestion = selection::resolve(&self.suggestions, &event)?;
            selection::execute(suggestion)?;
            suggestion.command.name.clone()
        };

        if self.config.close_on_select {
            self.close();
        } else {
            self.highlighted = event.index;
            self.pending = Some(name);
        }
        Ok(())
    }

    /// Select the highlighted suggestion
    pub fn confirm(&mut self) -> Result<(), SelectError> {
        self.select(SelectionEvent::enter(self.highlighted))
    }

    /// Hide the spinner
    pub fn finish_pending(&mut self) {
        self.pending = None;
    }

    /// Single entry point for all palette events
    pub fn dispatch(&mut self, event: PaletteEvent) -> Result<(), SelectError> {
        match event {
            PaletteEvent::HotKey(chord) => {
                self.handle_hotkey(&chord);
            }
            PaletteEvent::TriggerButton => self.open(),
            PaletteEvent::Escape => self.escape(),
            PaletteEvent::ClickOutside => self.click_outside(),
            PaletteEvent::QueryChanged(query) => self.set_query(query),
            PaletteEvent::Input(c) => self.push_char(c),
            PaletteEvent::Backspace => self.backspace(),
            PaletteEvent::ClearQuery => self.set_query(""),
            PaletteEvent::HighlightNext => self.highlight_next(),
            PaletteEvent::HighlightPrev => self.highlight_prev(),
            PaletteEvent::Select(selection) => return self.select(selection),
            PaletteEvent::Confirm => return self.confirm(),
            PaletteEvent::CommandsChanged(commands) => self.set_commands(commands),
            PaletteEvent::CommandFinished => self.finish_pending(),
            PaletteEvent::FocusInput => self.focus_input(),
            PaletteEvent::BlurInput => self.blur_input(),
        }
        Ok(())
    }

    fn refresh(&mut self) {
        self.suggestions = filter_commands(
            &self.commands,
            &self.query,
            &self.config.options,
            self.config.max_displayed,
        );
    }

    fn clamp_highlight(&mut self) {
        if self.highlighted >= self.suggestions.len() {
            self.highlighted = 0;
        }
    }
}
