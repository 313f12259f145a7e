use crate::error::{Error, Result};
use crate::spy::{RootMargin, ScrollIntoView, WatcherOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub spy: SpyConfig,
}

/// Scroll-spy settings
///
/// Field names also accept their camelCase spelling so the same struct can
/// be read from a JavaScript options object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpyConfig {
    /// Selector for the TOC links (default: ".toc-list .toc-link")
    #[serde(default = "default_link_selector", alias = "linkSelector")]
    pub link_selector: String,

    /// Class toggled on the link of the heading in view (default: "active")
    #[serde(default = "default_active_class", alias = "activeClass")]
    pub active_class: String,

    /// CSS margin shorthand applied to the viewport before intersection.
    /// The default pulls the bottom edge up to the middle of the screen.
    #[serde(default = "default_root_margin", alias = "rootMargin")]
    pub root_margin: String,

    /// Visible fraction needed for a crossing (default: 0, any contact)
    #[serde(default)]
    pub threshold: f64,

    /// How the active link is scrolled inside the navigation panel
    #[serde(default)]
    pub scroll: ScrollIntoView,
}

impl Default for SpyConfig {
    fn default() -> Self {
        Self {
            link_selector: default_link_selector(),
            active_class: default_active_class(),
            root_margin: default_root_margin(),
            threshold: 0.0,
            scroll: ScrollIntoView::default(),
        }
    }
}

fn default_link_selector() -> String {
    ".toc-list .toc-link".to_string()
}

fn default_active_class() -> String {
    "active".to_string()
}

fn default_root_margin() -> String {
    RootMargin::default().to_string()
}

impl SpyConfig {
    /// Parse and validate the watcher options.
    pub fn watcher_options(&self) -> Result<WatcherOptions> {
        let root_margin: RootMargin = self.root_margin.parse()?;
        WatcherOptions::new(root_margin, self.threshold)
    }
}

impl Config {
    /// Get the XDG-style config file path (~/.config/tocspy/config.toml)
    /// This is preferred on macOS for CLI tools and cross-platform dotfiles
    #[cfg(target_os = "macos")]
    fn xdg_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("tocspy").join("config.toml"))
    }

    /// Get the platform-specific config file path
    /// - macOS: ~/Library/Application Support/tocspy/config.toml
    /// - Linux: ~/.config/tocspy/config.toml
    /// - Windows: %APPDATA%/tocspy/config.toml
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tocspy").join("config.toml"))
    }

    /// Load config from file, or return default if file doesn't exist
    /// On macOS, checks ~/.config/tocspy first, then falls back to ~/Library/Application Support
    pub fn load() -> Self {
        #[cfg(target_os = "macos")]
        {
            if let Some(config) = Self::xdg_config_path().and_then(|p| Self::load_from(&p).ok()) {
                return config;
            }
        }

        Self::config_path()
            .and_then(|path| Self::load_from(&path).ok())
            .unwrap_or_default()
    }

    /// Load config from an explicit path. Unlike [`Config::load`], a missing
    /// or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| Error::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to the platform config path
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path().ok_or(Error::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let write_err = |source| Error::Write {
            path: path.to_path_buf(),
            source,
        };

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(write_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spy::Alignment;

    #[test]
    fn test_defaults_match_toc_markup() {
        let config = SpyConfig::default();
        assert_eq!(config.link_selector, ".toc-list .toc-link");
        assert_eq!(config.active_class, "active");
        assert_eq!(config.root_margin, "0px 0px -50% 0px");
        assert_eq!(config.watcher_options().unwrap(), WatcherOptions::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[spy]
active_class = "current"

[spy.scroll]
block = "center"
"#,
        )
        .unwrap();
        assert_eq!(config.spy.active_class, "current");
        assert_eq!(config.spy.link_selector, ".toc-list .toc-link");
        assert_eq!(config.spy.scroll.block, Alignment::Center);
        assert_eq!(config.spy.scroll.inline, Alignment::Start);
    }

    #[test]
    fn test_camel_case_options_object() {
        let config: SpyConfig = serde_json::from_str(
            r#"{"linkSelector": ".toc .entry", "rootMargin": "0px", "scroll": {"block": "start"}}"#,
        )
        .unwrap();
        assert_eq!(config.link_selector, ".toc .entry");
        assert_eq!(config.active_class, "active");
        assert_eq!(config.scroll.block, Alignment::Start);
        assert_eq!(
            config.watcher_options().unwrap().root_margin,
            crate::spy::RootMargin::ZERO
        );
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let config = SpyConfig {
            threshold: 2.0,
            ..SpyConfig::default()
        };
        assert!(matches!(
            config.watcher_options(),
            Err(Error::InvalidThreshold(_))
        ));

        let config = SpyConfig {
            root_margin: "1px 2px 3px 4px 5px".to_string(),
            ..SpyConfig::default()
        };
        assert!(matches!(
            config.watcher_options(),
            Err(Error::InvalidRootMargin { .. })
        ));
    }

    #[test]
    fn test_save_and_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.spy.threshold = 0.25;
        config.spy.scroll.inline = Alignment::Nearest;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_from_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::load_from(&dir.path().join("absent.toml")),
            Err(Error::Read { .. })
        ));
    }
}
