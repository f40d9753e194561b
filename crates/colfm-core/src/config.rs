//! User configuration.
//!
//! Loaded once from `$XDG_CONFIG_HOME/colfm/config.toml` (or an explicit
//! path) before the event loop starts. Every value is an initial value only;
//! nothing here is reloaded at runtime.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sort::SortKey;

/// Extra width given to the active column for the size field.
pub const ACTIVE_BONUS: usize = 5;

/// Width of the preview sidebar when shown.
pub const SIDEBAR_MIN_WIDTH: usize = 20;

/// Column width limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct WidthBounds {
    /// Narrowest any column gets.
    #[builder(default = "8")]
    pub min: usize,

    /// Widest an inactive column gets.
    #[builder(default = "20")]
    pub max: usize,

    /// Widest the active column gets, before the size bonus.
    #[builder(default = "35")]
    pub max_active: usize,
}

impl Default for WidthBounds {
    fn default() -> Self {
        Self {
            min: 8,
            max: 20,
            max_active: 35,
        }
    }
}

impl WidthBoundsBuilder {
    fn validate(&self) -> Result<(), String> {
        let defaults = WidthBounds::default();
        let bounds = WidthBounds {
            min: self.min.unwrap_or(defaults.min),
            max: self.max.unwrap_or(defaults.max),
            max_active: self.max_active.unwrap_or(defaults.max_active),
        };
        bounds.check()
    }
}

impl WidthBounds {
    pub fn builder() -> WidthBoundsBuilder {
        WidthBoundsBuilder::default()
    }

    fn check(&self) -> Result<(), String> {
        if self.min < 4 {
            return Err(format!("widths.min must be at least 4, got {}", self.min));
        }
        if self.min > self.max || self.max > self.max_active {
            return Err(format!(
                "widths must satisfy min <= max <= max_active, got {}/{}/{}",
                self.min, self.max, self.max_active
            ));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check().map_err(|message| ConfigError::Invalid { message })
    }
}

/// A favorites-column shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// Path, `~` expands to the home directory.
    pub path: String,
    /// Label shown in the favorites column; defaults to `path`.
    #[serde(default)]
    pub label: Option<String>,
}

impl Favorite {
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: Some(label.into()),
        }
    }

    /// Expanded absolute path and display label.
    pub fn resolve(&self) -> (PathBuf, String) {
        let label = self.label.clone().unwrap_or_else(|| self.path.clone());
        (expand_tilde(&self.path), label)
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') => {
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(path),
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Program used to view non-directory entries.
    pub viewer: String,
    /// Shell for `!` commands; `$SHELL` or `/bin/sh` when unset.
    pub shell: Option<String>,
    /// Show dotfiles on startup.
    pub show_hidden: bool,
    /// Show `*~` backup files on startup.
    pub show_backups: bool,
    /// Show the preview sidebar on startup.
    pub sidebar: bool,
    /// Initial sort key.
    pub sort: SortKey,
    /// Initial sort direction.
    pub reverse: bool,
    /// Column width limits.
    pub widths: WidthBounds,
    /// Entries of the favorites root column.
    pub favorites: Vec<Favorite>,
    /// Root of an AVFS-style archive mount, enabling archive descent.
    pub avfs: Option<String>,
    /// Color overrides by role name, interpreted by the terminal front end.
    pub colors: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewer: "less".to_string(),
            shell: None,
            show_hidden: false,
            show_backups: true,
            sidebar: false,
            sort: SortKey::Name,
            reverse: false,
            widths: WidthBounds::default(),
            favorites: vec![
                Favorite::new("/", "/"),
                Favorite::new("~", "~"),
                Favorite::new("~/Desktop", "Desktop"),
            ],
            avfs: None,
            colors: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Default config file location.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("colfm").join("config.toml"))
    }

    /// Parse and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.widths.validate()?;
        Ok(config)
    }

    /// Load from the default location. A missing or broken file yields the
    /// defaults; a broken one is logged.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Shell used for `!` commands.
    pub fn shell(&self) -> String {
        self.shell
            .clone()
            .or_else(|| std::env::var("SHELL").ok())
            .unwrap_or_else(|| "/bin/sh".to_string())
    }

    /// Favorites with `~` expanded.
    pub fn resolved_favorites(&self) -> Vec<(PathBuf, String)> {
        self.favorites.iter().map(Favorite::resolve).collect()
    }
}
