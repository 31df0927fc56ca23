//! Keyboard-driven command palette
//!
//! This crate provides the state behind a command palette overlay:
//! - Fuzzy search powered by nucleo-matcher
//! - An open/closed state machine driven by hotkeys, clicks and keystrokes
//! - Selection that runs the chosen command's handler
//! - Provider pattern for assembling context-aware command lists
//!
//! Rendering is left to the host application.
//!
//! # Example
//!
//! ```rust
//! use command_palette::{Command, CommandPalette, PaletteConfig, SelectionEvent};
//!
//! let commands = vec![
//!     Command::new("Fizz", || println!("fizz")),
//!     Command::new("Fizz Buzz", || println!("fizz buzz")),
//!     Command::new("Buzz", || println!("buzz")),
//! ];
//!
//! let mut palette = CommandPalette::new(commands, PaletteConfig::default())?;
//! palette.open();
//! palette.set_query("Fizz");
//!
//! let names: Vec<_> = palette.suggestions().iter().map(|s| s.name()).collect();
//! assert_eq!(names, ["Fizz", "Fizz Buzz"]);
//!
//! palette.select(SelectionEvent::enter(0))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod command;
mod config;
mod error;
mod hotkey;
mod palette;
mod provider;
mod search;
mod selection;

pub use command::{Command, CommandAction, CommandFn, CommandSpec, Suggestion};
pub use config::{Display, PaletteConfig, Spinner, DEFAULT_SPINNER_FRAMES};
pub use error::{ConfigError, SelectError, MAX_DISPLAYED_LIMIT};
pub use hotkey::{HotKeyGuard, HotKeyRegistry, HotKeys, Key, KeyChord, ListenerId, Modifiers};
pub use palette::{CommandPalette, PaletteEvent, PaletteStatus};
pub use provider::{CommandProvider, CommandRegistry};
pub use search::{
    filter_commands, CaseSensitivity, MatchKind, MatchOptions, NoMatchPolicy, SearchKey,
};
pub use selection::{execute, resolve, SelectionEvent, SelectionMethod};
