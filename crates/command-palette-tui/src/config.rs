use command_palette::{CommandSpec, HotKeys, PaletteConfig};
use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

const CONFIG_FILE: &str = "command-palette.toml";

/// Application configuration loaded from command-palette.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_palette")]
    pub palette: PaletteConfig,
    /// Extra commands, appended after the built-in ones
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
}

fn default_palette() -> PaletteConfig {
    PaletteConfig {
        // Many terminals swallow shift when ctrl is held
        hot_keys: HotKeys::Multiple(vec![
            "command+shift+p".into(),
            "ctrl+shift+p".into(),
            "ctrl+p".into(),
        ]),
        header: Some("Demo commands".to_string()),
        ..Default::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            commands: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from CWD first, then home directory, or use defaults
    ///
    /// Only parse errors are reported here; the palette settings are
    /// validated when the palette is built.
    pub fn load() -> Self {
        let mut candidates = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(home) = env::var_os("HOME") {
            candidates.push(PathBuf::from(home).join(format!(".{}", CONFIG_FILE)));
        }

        for path in candidates {
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            match toml::from_str(&content) {
                Ok(config) => {
                    log::debug!("Loaded config from {}", path.display());
                    return config;
                }
                Err(err) => log::warn!("Ignoring {}: {}", path.display(), err),
            }
        }

        log::debug!("Using default config");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_palette::Display;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.palette.validate().unwrap().len(), 3);
        assert!(config.commands.is_empty());
    }

    #[test]
    fn test_parse_config_file() {
        let config: Config = toml::from_str(
            r#"
            [palette]
            close_on_select = true
            display = "inline"
            spinner = { text = "Working..." }

            [[commands]]
            name = "Bump"
            action = "increment"
            category = "Custom"

            [[commands]]
            name = "Launch rockets"
            action = "rockets"
            "#,
        )
        .unwrap();

        assert!(config.palette.close_on_select);
        assert_eq!(config.palette.display, Display::Inline);
        assert_eq!(config.commands.len(), 2);
        assert_eq!(config.commands[1].action.as_deref(), Some("rockets"));
    }

    #[test]
    fn test_missing_palette_table_uses_demo_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }
}
