//! CLI configuration

use localizar::{ValidationOptions, DEFAULT_MIN_VALID_SELECTORS};
use serde::{Deserialize, Serialize};

/// Verbosity level for CLI output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Verbosity {
    /// Only errors
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Verbose output with details
    Verbose,
    /// Debug output with everything
    Debug,
}

impl Verbosity {
    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(&self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Check if debug mode
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Color output preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Auto-detect terminal support
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Determine if colors should be used
    #[must_use]
    pub fn should_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output preference
    pub color: ColorChoice,
    /// Minimum valid selectors an element needs to pass validation
    pub min_valid_selectors: usize,
    /// Require at least one CSS candidate
    pub require_css: bool,
    /// Require at least one XPath candidate
    pub require_xpath: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::default(),
            color: ColorChoice::default(),
            min_valid_selectors: DEFAULT_MIN_VALID_SELECTORS,
            require_css: true,
            require_xpath: true,
        }
    }
}

impl CliConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity level
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color preference
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set the minimum valid selector count
    #[must_use]
    pub const fn with_min_valid_selectors(mut self, count: usize) -> Self {
        self.min_valid_selectors = count;
        self
    }

    /// Set whether a CSS candidate is required
    #[must_use]
    pub const fn with_require_css(mut self, required: bool) -> Self {
        self.require_css = required;
        self
    }

    /// Set whether an XPath candidate is required
    #[must_use]
    pub const fn with_require_xpath(mut self, required: bool) -> Self {
        self.require_xpath = required;
        self
    }

    /// Build the validation options this configuration describes
    #[must_use]
    pub const fn validation_options(&self) -> ValidationOptions {
        ValidationOptions::new()
            .with_min_valid_selectors(self.min_valid_selectors)
            .with_require_css(self.require_css)
            .with_require_xpath(self.require_xpath)
    }
}
