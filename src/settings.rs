//! Settings infrastructure for mjml-regions.
//!
//! Settings are read from an `mjml-regions.toml` file. Every key is optional;
//! missing keys keep their default values.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::embedded::{EmbeddedConfig, DEFAULT_STYLE_TAGS};

/// File name searched for by [`discover_settings`].
pub const SETTINGS_FILE: &str = "mjml-regions.toml";

const DEFAULT_TEMPLATE_TAGS: &[&str] = &["mjml", "mjml-fragment"];

/// Root settings structure loaded from `mjml-regions.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Template literal tags whose contents are MJML documents.
    pub tags: Vec<String>,

    /// Custom tags whose bodies are style sheets.
    pub style_tags: Vec<String>,

    /// Formatting configuration.
    pub format: FormatSettings,
}

/// Formatting settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    /// Whether formatting of embedded regions is enabled (default: true).
    pub enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tags: DEFAULT_TEMPLATE_TAGS.iter().map(|t| t.to_string()).collect(),
            style_tags: DEFAULT_STYLE_TAGS.iter().map(|t| t.to_string()).collect(),
            format: FormatSettings::default(),
        }
    }
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Settings {
    /// Whether a template literal tagged with `tag` holds an MJML document.
    pub fn is_template_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Scanner configuration derived from these settings.
    pub fn embedded_config(&self) -> EmbeddedConfig {
        EmbeddedConfig::default().with_style_tags(self.style_tags.iter().cloned())
    }
}

/// Errors raised while loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load settings from a settings file.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Discover `mjml-regions.toml` by searching up the directory tree, then
/// direct children.
///
/// Search order:
/// 1. Walk up from `start_dir` to filesystem root
/// 2. If not found, check immediate child directories of `start_dir`
///
/// Returns `(settings, settings_dir)` where `settings_dir` is the directory
/// containing the found file. If none is found, or the file cannot be loaded,
/// default settings are returned.
pub fn discover_settings(start_dir: &Path) -> (Settings, PathBuf) {
    // Phase 1: Walk up from start_dir
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join(SETTINGS_FILE);
        if candidate.is_file() {
            return (load_or_default(&candidate), dir.to_path_buf());
        }
        current = dir.parent();
    }

    // Phase 2: Check immediate child directories
    if let Ok(entries) = std::fs::read_dir(start_dir) {
        for entry in entries.flatten() {
            if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                let candidate = entry.path().join(SETTINGS_FILE);
                if candidate.is_file() {
                    return (load_or_default(&candidate), entry.path());
                }
            }
        }
    }

    debug!(start_dir = %start_dir.display(), "no settings file found, using defaults");
    (Settings::default(), start_dir.to_path_buf())
}

fn load_or_default(path: &Path) -> Settings {
    match load_settings(path) {
        Ok(settings) => settings,
        Err(e) => {
            warn!(error = %e, "ignoring settings file");
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a unique temp directory for test isolation.
    fn make_test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("mjml-regions-test")
            .join(name)
            .join(format!("{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup_test_dir(dir: &Path) {
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tags, vec!["mjml", "mjml-fragment"]);
        assert_eq!(settings.style_tags, vec!["mj-style"]);
        assert!(settings.format.enabled);
        assert!(settings.is_template_tag("mjml-fragment"));
        assert!(!settings.is_template_tag("html"));
    }

    #[test]
    fn partial_settings_keep_defaults() {
        let settings: Settings = toml::from_str("[format]\nenabled = false\n").unwrap();
        assert!(!settings.format.enabled);
        assert_eq!(settings.tags, Settings::default().tags);

        let settings: Settings = toml::from_str("tags = [\"email\"]\n").unwrap();
        assert_eq!(settings.tags, vec!["email"]);
        assert!(settings.format.enabled);
        assert_eq!(settings.style_tags, vec!["mj-style"]);
    }

    #[test]
    fn embedded_config_uses_style_tags() {
        let settings: Settings = toml::from_str("style_tags = [\"mj-css\"]\n").unwrap();
        assert_eq!(settings.embedded_config().style_tags(), ["mj-css"]);
    }

    #[test]
    fn load_reports_errors() {
        let dir = make_test_dir("load-errors");
        let missing = dir.join("missing.toml");
        assert!(matches!(
            load_settings(&missing),
            Err(SettingsError::Io { path, .. }) if path == missing
        ));

        let broken = dir.join(SETTINGS_FILE);
        std::fs::write(&broken, "tags = [").unwrap();
        let err = load_settings(&broken).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().starts_with("failed to parse"));

        cleanup_test_dir(&dir);
    }

    #[test]
    fn discover_settings_in_current_dir() {
        let dir = make_test_dir("discover-current");
        std::fs::write(dir.join(SETTINGS_FILE), "tags = [\"mail\"]\n").unwrap();

        let (settings, settings_dir) = discover_settings(&dir);
        assert_eq!(settings_dir, dir);
        assert_eq!(settings.tags, vec!["mail"]);

        cleanup_test_dir(&dir);
    }

    #[test]
    fn discover_settings_in_parent_dir() {
        let parent = make_test_dir("discover-parent");
        let child = parent.join("subdir");
        std::fs::create_dir_all(&child).unwrap();
        std::fs::write(parent.join(SETTINGS_FILE), "style_tags = [\"mj-css\"]\n").unwrap();

        let (settings, settings_dir) = discover_settings(&child);
        assert_eq!(settings_dir, parent);
        assert_eq!(settings.style_tags, vec!["mj-css"]);

        cleanup_test_dir(&parent);
    }

    #[test]
    fn discover_settings_in_child_dir() {
        let parent = make_test_dir("discover-child");
        let child = parent.join("config");
        std::fs::create_dir_all(&child).unwrap();
        std::fs::write(child.join(SETTINGS_FILE), "[format]\nenabled = false\n").unwrap();

        let (settings, settings_dir) = discover_settings(&parent);
        assert_eq!(settings_dir, child);
        assert!(!settings.format.enabled);

        cleanup_test_dir(&parent);
    }

    #[test]
    fn discover_settings_not_found() {
        let dir = make_test_dir("discover-none");

        let (settings, settings_dir) = discover_settings(&dir);
        assert_eq!(settings_dir, dir);
        assert_eq!(settings, Settings::default());

        cleanup_test_dir(&dir);
    }

    #[test]
    fn unparsable_settings_fall_back_to_defaults() {
        let dir = make_test_dir("discover-broken");
        std::fs::write(dir.join(SETTINGS_FILE), "format = 3\n").unwrap();

        let (settings, settings_dir) = discover_settings(&dir);
        assert_eq!(settings_dir, dir);
        assert_eq!(settings, Settings::default());

        cleanup_test_dir(&dir);
    }
}
