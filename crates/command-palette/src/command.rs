//! Command records and their match-annotated form

use std::fmt::{self, Debug};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::search::SearchKey;

/// Zero-argument handler invoked when a command is selected
pub type CommandFn = Arc<dyn Fn() + Send + Sync>;

/// What happens when a command is chosen
#[derive(Clone)]
pub enum CommandAction {
    /// A handler that can be invoked directly
    Callable(CommandFn),

    /// A handler id that could not be resolved (e.g. from a config file).
    /// Selecting such a command fails with [`crate::SelectError::NotCallable`].
    Unbound(String),
}

impl Debug for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandAction::Callable(_) => write!(f, "Callable"),
            CommandAction::Unbound(id) => write!(f, "Unbound({:?})", id),
        }
    }
}

/// A named command that can be executed from the palette
///
/// Cheap to clone: the handler is reference counted, so the palette can
/// hand out filtered copies without touching the caller's list.
#[derive(Debug, Clone)]
pub struct Command {
    /// Display label, also the primary search key (e.g. "Open File")
    pub name: String,

    /// Optional grouping label (e.g. "File")
    pub category: Option<String>,

    /// Optional keyboard shortcut hint (e.g. "Ctrl+O")
    pub shortcut: Option<String>,

    /// The handler to run on selection
    pub action: CommandAction,
}

impl Command {
    /// Create a command backed by a callable handler
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            category: None,
            shortcut: None,
            action: CommandAction::Callable(Arc::new(handler)),
        }
    }

    /// Create a command whose handler id did not resolve
    pub fn unbound(name: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
            shortcut: None,
            action: CommandAction::Unbound(action_id.into()),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.action, CommandAction::Callable(_))
    }

    /// Text the matcher runs against, built from the requested keys in order
    ///
    /// The name always comes first when requested, so match indices below
    /// the name's length point into the name.
    pub(crate) fn searchable_text(&self, keys: &[SearchKey]) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(keys.len());
        for key in keys {
            match key {
                SearchKey::Name => parts.push(&self.name),
                SearchKey::Category => {
                    if let Some(category) = &self.category {
                        parts.push(category);
                    }
                }
                SearchKey::Shortcut => {
                    if let Some(shortcut) = &self.shortcut {
                        parts.push(shortcut);
                    }
                }
            }
        }
        parts.join(" ")
    }
}

/// A command as it appears in a configuration file
///
/// `action` names a handler known to the host application; see
/// [`CommandSpec::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub shortcut: Option<String>,
}

impl CommandSpec {
    /// Build the [`Command`] for this entry, looking up its handler by id
    ///
    /// Unknown or missing handler ids produce an unbound command rather than
    /// an error: the failure surfaces when the user actually selects it.
    pub fn resolve<L>(&self, lookup: L) -> Command
    where
        L: Fn(&str) -> Option<CommandFn>,
    {
        let action_id = self.action.clone().unwrap_or_default();
        let action = match lookup(&action_id) {
            Some(handler) => CommandAction::Callable(handler),
            None => {
                log::warn!(
                    "Command {:?} refers to unknown action {:?}",
                    self.name,
                    action_id
                );
                CommandAction::Unbound(action_id)
            }
        };

        Command {
            name: self.name.clone(),
            category: self.category.clone(),
            shortcut: self.shortcut.clone(),
            action,
        }
    }
}

/// A command annotated with match metadata
///
/// Produced by [`crate::filter_commands`]; recomputed on every query.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub command: Command,

    /// Match score (0 when the query was empty or nothing matched)
    pub score: u32,

    /// Sorted char positions in `command.name` that matched the query
    pub indices: Vec<u32>,
}

impl Suggestion {
    /// Wrap a command without any match information
    pub fn unscored(command: Command) -> Self {
        Self {
            command,
            score: 0,
            indices: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.command.name
    }
}
