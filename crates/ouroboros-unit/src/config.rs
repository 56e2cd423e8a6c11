//! Output configuration

use crate::error::{Result, UnitError};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::str::FromStr;

/// Environment variable selecting the colour mode (`auto`, `always`, `never`)
pub const COLOR_ENV: &str = "OUROBOROS_UNIT_COLOR";

/// When to emit ANSI colour escapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum ColorMode {
    /// Colour when stdout is a terminal
    #[default]
    Auto,
    /// Always colour
    Always,
    /// Never colour
    Never,
}

impl ColorMode {
    /// Resolve the mode to a yes/no decision for stdout
    pub fn enabled_for_stdout(&self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorMode::Auto => write!(f, "auto"),
            ColorMode::Always => write!(f, "always"),
            ColorMode::Never => write!(f, "never"),
        }
    }
}

impl FromStr for ColorMode {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(UnitError::InvalidConfig(format!(
                "unknown color mode '{}' (expected auto, always or never)",
                other
            ))),
        }
    }
}

/// Framework configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitConfig {
    /// Colour mode for the console sink
    pub color: ColorMode,
    /// Flush the sink after every message
    pub flush_each_message: bool,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            flush_each_message: true,
        }
    }
}

impl UnitConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set colour mode
    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    /// Set per-message flushing
    pub fn with_flush_each_message(mut self, flush: bool) -> Self {
        self.flush_each_message = flush;
        self
    }

    /// Build a config from `OUROBOROS_UNIT_COLOR` and `NO_COLOR`
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var(COLOR_ENV).ok().as_deref(),
            std::env::var("NO_COLOR").ok().as_deref(),
        )
    }

    fn from_vars(color: Option<&str>, no_color: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(mode) = color {
            config.color = mode.parse()?;
        }

        // NO_COLOR wins over everything when set to a non-empty value
        if no_color.is_some_and(|v| !v.is_empty()) {
            config.color = ColorMode::Never;
        }

        Ok(config)
    }
}
