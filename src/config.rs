// SPDX-License-Identifier: MIT
//
// Configuration: file, environment, command line.
//
// Precedence, lowest first: built-in defaults, `config.toml`, environment
// variables, command-line flags. The file is optional; a missing file at
// the default location is the common case. Colors are written by users as
// names or hex and resolved here, once, into the escape strings the art
// compositor splices into frames.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use artloop_art::{ColorPreferences, GradientPreferences};
use artloop_term::color::CellColor;
use serde::Deserialize;

/// Frame rate when nothing else sets one.
pub const DEFAULT_FPS: i32 = 20;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Why configuration could not be resolved.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    Read { path: PathBuf, source: io::Error },
    /// The config file is not valid TOML for this schema.
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// An environment variable holds an unusable value.
    InvalidEnv { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse { path, source } => write!(f, "invalid config {}: {source}", path.display()),
            Self::InvalidEnv { name, value } => write!(f, "invalid value for {name}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidEnv { .. } => None,
        }
    }
}

// ─── File Schema ─────────────────────────────────────────────────────────────

/// `[colors]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorsSection {
    pub enabled: bool,
    pub brand: Option<String>,
    pub gradient: Vec<String>,
    pub scroll: bool,
    /// Lines per second.
    pub scroll_speed: f64,
}

impl Default for ColorsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            brand: None,
            gradient: Vec::new(),
            scroll: false,
            scroll_speed: 1.0,
        }
    }
}

/// `[panel]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelSection {
    pub enabled: bool,
    pub title: String,
}

impl Default for PanelSection {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "artloop".to_owned(),
        }
    }
}

/// `[prompt]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptSection {
    pub symbol: String,
    /// Shell for submitted commands; `$SHELL` when unset.
    pub shell: Option<String>,
}

impl Default for PromptSection {
    fn default() -> Self {
        Self {
            symbol: "❯".to_owned(),
            shell: None,
        }
    }
}

/// Everything `config.toml` can hold.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub fps: i32,
    pub frames: Option<PathBuf>,
    pub colors: ColorsSection,
    pub panel: PanelSection,
    pub prompt: PromptSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            frames: None,
            colors: ColorsSection::default(),
            panel: PanelSection::default(),
            prompt: PromptSection::default(),
        }
    }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// `$XDG_CONFIG_HOME/artloop/config.toml`, else `~/.config/artloop/config.toml`.
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    config_path_from(|name| std::env::var_os(name).map(PathBuf::from))
}

fn config_path_from(var: impl Fn(&str) -> Option<PathBuf>) -> Option<PathBuf> {
    let base = var("XDG_CONFIG_HOME")
        .filter(|p| p.is_absolute())
        .or_else(|| var("HOME").map(|h| h.join(".config")))?;
    Some(base.join("artloop").join("config.toml"))
}

impl Config {
    /// Parse a config document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML or unknown keys.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Load from an explicit path (must exist) or the default location
    /// (may be missing).
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(p) => (p.to_owned(), true),
            None => match default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        match fs::read_to_string(&path) {
            Ok(text) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::from_toml(&text, &path)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    /// Apply `NO_COLOR`, `ARTLOOP_FPS` and `ARTLOOP_FRAMES` from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Fails if `ARTLOOP_FPS` is not an integer.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// [`apply_env`](Self::apply_env) with an injectable lookup.
    ///
    /// # Errors
    ///
    /// Fails if `ARTLOOP_FPS` is not an integer.
    pub fn apply_env_from(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if var("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            self.colors.enabled = false;
        }
        if let Some(value) = var("ARTLOOP_FPS") {
            self.fps = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "ARTLOOP_FPS",
                value,
            })?;
        }
        if let Some(value) = var("ARTLOOP_FRAMES").filter(|v| !v.is_empty()) {
            self.frames = Some(PathBuf::from(value));
        }
        Ok(())
    }

    /// The compositor's view of the color settings, at the final frame rate.
    #[must_use]
    pub fn color_preferences(&self) -> ColorPreferences {
        if !self.colors.enabled {
            return ColorPreferences::disabled();
        }
        ColorPreferences {
            enabled: true,
            brand: self.colors.brand.as_deref().and_then(resolve_color),
            gradient: GradientPreferences {
                colors: self
                    .colors
                    .gradient
                    .iter()
                    .map(String::as_str)
                    .filter_map(resolve_color)
                    .collect(),
                scroll: self.colors.scroll,
                scroll_speed: self.colors.scroll_speed,
                fps: self.fps,
            },
        }
    }

    /// Shell used for submitted commands.
    #[must_use]
    pub fn shell(&self) -> String {
        self.prompt
            .shell
            .clone()
            .or_else(|| std::env::var("SHELL").ok())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "/bin/sh".to_owned())
    }
}

/// A user color string as an SGR foreground escape.
///
/// Unparsable colors are logged and dropped.
#[must_use]
pub fn resolve_color(color: &str) -> Option<String> {
    match color.parse::<CellColor>() {
        Ok(color) => Some(color.fg_code()),
        Err(e) => {
            tracing::warn!("ignoring {e}");
            None
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn parse(text: &str) -> Config {
        Config::from_toml(text, Path::new("test.toml")).unwrap()
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    // ── File ────────────────────────────────────────────────────

    #[test]
    fn empty_document_is_defaults() {
        let c = parse("");
        assert_eq!(c.fps, 20);
        assert!(c.colors.enabled);
        assert!(c.panel.enabled);
        assert_eq!(c.panel.title, "artloop");
        assert_eq!(c.prompt, PromptSection::default());
    }

    #[test]
    fn full_document() {
        let c = parse(
            r##"
fps = 30
frames = "/tmp/cat.frames"

[colors]
brand = "#ff8800"
gradient = ["red", "yellow", "208"]
scroll = true
scroll_speed = 4.5

[panel]
enabled = false
title = "hello"

[prompt]
symbol = "$"
shell = "/bin/zsh"
"##,
        );
        assert_eq!(c.fps, 30);
        assert_eq!(c.frames.as_deref(), Some(Path::new("/tmp/cat.frames")));
        assert_eq!(c.colors.gradient.len(), 3);
        assert!(c.colors.scroll);
        assert!(!c.panel.enabled);
        assert_eq!(c.prompt.symbol, "$");
        assert_eq!(c.shell(), "/bin/zsh");
    }

    #[test]
    fn unknown_key_is_an_error() {
        let err = Config::from_toml("colour = true", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("invalid config x.toml"));
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(Config::from_toml("fps = \"fast\"", Path::new("x.toml")).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/artloop.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn path_prefers_xdg() {
        let xdg = config_path_from(|n| match n {
            "XDG_CONFIG_HOME" => Some(PathBuf::from("/xdg")),
            "HOME" => Some(PathBuf::from("/home/u")),
            _ => None,
        });
        assert_eq!(xdg, Some(PathBuf::from("/xdg/artloop/config.toml")));

        let home = config_path_from(|n| (n == "HOME").then(|| PathBuf::from("/home/u")));
        assert_eq!(home, Some(PathBuf::from("/home/u/.config/artloop/config.toml")));

        assert_eq!(config_path_from(|_| None), None);
    }

    #[test]
    fn relative_xdg_is_ignored() {
        let p = config_path_from(|n| match n {
            "XDG_CONFIG_HOME" => Some(PathBuf::from("rel")),
            "HOME" => Some(PathBuf::from("/h")),
            _ => None,
        });
        assert_eq!(p, Some(PathBuf::from("/h/.config/artloop/config.toml")));
    }

    // ── Environment ─────────────────────────────────────────────

    #[test]
    fn env_overrides() {
        let mut c = Config::default();
        c.apply_env_from(env(&[
            ("NO_COLOR", "1"),
            ("ARTLOOP_FPS", " 12 "),
            ("ARTLOOP_FRAMES", "/a.frames"),
        ]))
        .unwrap();
        assert!(!c.colors.enabled);
        assert_eq!(c.fps, 12);
        assert_eq!(c.frames, Some(PathBuf::from("/a.frames")));
    }

    #[test]
    fn empty_no_color_is_ignored() {
        let mut c = Config::default();
        c.apply_env_from(env(&[("NO_COLOR", "")])).unwrap();
        assert!(c.colors.enabled);
    }

    #[test]
    fn bad_fps_env_is_an_error() {
        let mut c = Config::default();
        let err = c.apply_env_from(env(&[("ARTLOOP_FPS", "fast")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for ARTLOOP_FPS: \"fast\"");
    }

    // ── Colors ──────────────────────────────────────────────────

    #[test]
    fn resolves_colors_to_escapes() {
        let mut c = parse("fps = 10\n[colors]\nbrand = \"#ff8800\"\ngradient = [\"nope\", \"#000\"]");
        c.colors.scroll = true;
        let prefs = c.color_preferences();
        assert_eq!(prefs.brand.as_deref(), Some("\x1b[38;2;255;136;0m"));
        assert_eq!(prefs.gradient.colors, vec!["\x1b[38;2;0;0;0m".to_owned()]);
        assert_eq!(prefs.gradient.fps, 10);
        assert!(prefs.gradient.scroll);
    }

    #[test]
    fn disabled_colors_resolve_to_nothing() {
        let mut c = parse("[colors]\nbrand = \"red\"");
        c.colors.enabled = false;
        assert_eq!(c.color_preferences(), ColorPreferences::disabled());
    }

    #[test]
    fn unknown_color_is_dropped() {
        assert_eq!(resolve_color("chartreuse-ish"), None);
        assert!(resolve_color("bright-red").is_some());
    }
}
