use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::reference::DEFAULT_BASE_PATH;

/// Configuration for rendering stored content.
///
/// This struct holds settings that control how documents are rendered,
/// including where reference links point and how external links open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The path prefix of reference links.
    ///
    /// A reference to `pojk11` chapter `02` resolves to
    /// `{base_path}/pojk11/02`.
    base_path: String,

    /// Whether external links open in a new browsing context.
    ///
    /// When `true` (default), `link` marks render with
    /// `target="_blank" rel="noopener noreferrer"`.
    pub external_links_new_tab: bool,

    /// Vertical gap, in pixels, between a tooltip's anchor and its overlay.
    pub tooltip_offset: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            external_links_new_tab: true,
            tooltip_offset: default_tooltip_offset(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the path prefix of reference links.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Sets the path prefix of reference links.
    ///
    /// A missing leading slash is added and trailing slashes are removed, so
    /// `regmaps/` becomes `/regmaps`.
    pub fn set_base_path(&mut self, base_path: &str) {
        self.base_path = normalise_base_path(base_path);
    }
}

fn normalise_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn default_base_path() -> String {
    DEFAULT_BASE_PATH.to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_tooltip_offset() -> u32 {
    8
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_base_path")]
        base_path: String,

        #[serde(default = "default_true")]
        external_links_new_tab: bool,

        /// Vertical gap, in pixels, between a tooltip's anchor and its
        /// overlay.
        #[serde(default = "default_tooltip_offset")]
        tooltip_offset: u32,
    },
}

impl From<Versions> for super::Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                base_path,
                external_links_new_tab,
                tooltip_offset,
            } => Self {
                base_path: normalise_base_path(&base_path),
                external_links_new_tab,
                tooltip_offset,
            },
        }
    }
}

impl From<super::Config> for Versions {
    fn from(config: super::Config) -> Self {
        Self::V1 {
            base_path: config.base_path,
            external_links_new_tab: config.external_links_new_tab,
            tooltip_offset: config.tooltip_offset,
        }
    }
}
