use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, MAX_DISPLAYED_LIMIT};
use crate::hotkey::{HotKeys, KeyChord};
use crate::search::MatchOptions;

/// Frames of the built-in loading animation
pub const DEFAULT_SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Loading indicator shown while a selected command is pending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spinner {
    /// Animated braille spinner
    #[default]
    Default,
    /// Fixed caller-supplied text
    Text(String),
}

impl Spinner {
    /// Text to render at animation tick `tick`
    pub fn frame(&self, tick: usize) -> &str {
        match self {
            Spinner::Default => DEFAULT_SPINNER_FRAMES[tick % DEFAULT_SPINNER_FRAMES.len()],
            Spinner::Text(text) => text,
        }
    }
}

/// How the palette is presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    /// Overlay on top of the application; clicking outside closes it
    #[default]
    Modal,
    /// Embedded in the surrounding layout, no overlay
    Inline,
}

/// Palette configuration, loadable from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Start in the open state
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub hot_keys: HotKeys,
    #[serde(default)]
    pub close_on_select: bool,
    #[serde(default = "default_max_displayed")]
    pub max_displayed: usize,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub spinner: Spinner,
    #[serde(default)]
    pub display: Display,
    /// Passed through to the matcher
    #[serde(default)]
    pub options: MatchOptions,
}

fn default_max_displayed() -> usize {
    7
}

fn default_placeholder() -> String {
    "Type a command".to_string()
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            open: false,
            hot_keys: HotKeys::default(),
            close_on_select: false,
            max_displayed: default_max_displayed(),
            placeholder: default_placeholder(),
            header: None,
            spinner: Spinner::default(),
            display: Display::default(),
            options: MatchOptions::default(),
        }
    }
}

impl PaletteConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PaletteConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the display limits and hotkeys, returning the parsed chords
    pub fn validate(&self) -> Result<Vec<KeyChord>, ConfigError> {
        if self.max_displayed > MAX_DISPLAYED_LIMIT {
            return Err(ConfigError::DisplayLimitExceeded {
                requested: self.max_displayed,
            });
        }
        if self.max_displayed == 0 {
            return Err(ConfigError::ZeroDisplayed);
        }
        self.hot_keys.chords()
    }
}
