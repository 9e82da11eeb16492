//! # Output Configuration
//!
//! Decides whether `graphmize tree` may style its output: the cyan patch
//! lines and the header glyph.
//!
//! The color mode comes from `--color`, then the `color` settings key, then
//! [`DEFAULT_COLOR`]. `always` and `never` are final. In `auto` mode the
//! terminal environment decides:
//! - `NO_COLOR` set to anything disables colors
//! - `CLICOLOR=0` disables colors
//! - `CLICOLOR_FORCE` set to a non-zero value forces colors, even off a TTY
//! - `TERM=dumb` disables colors
//! - otherwise colors follow what stdout supports
//!
//! ```rust
//! use graphmize::output::OutputConfig;
//!
//! let config = OutputConfig::resolve(Some("never"), Some("always")).unwrap();
//! assert!(!config.use_color);
//! assert_eq!(config.decorate("🌳 ", ""), "");
//! ```

use std::env;
use std::str::FromStr;

use crate::defaults::DEFAULT_COLOR;
use crate::suggestions;

/// Accepted values for the color setting
pub const COLOR_CHOICES: [&str; 3] = ["auto", "always", "never"];

/// A color mode as given on the command line or in the settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ColorChoice {
    type Err = anyhow::Error;

    /// Case-insensitive. Unknown values fail with a did-you-mean hint.
    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(suggestions::invalid_color(value)),
        }
    }
}

/// The parts of the process environment that `auto` mode looks at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalEnv {
    no_color: bool,
    clicolor: Option<String>,
    clicolor_force: Option<String>,
    term: Option<String>,
    stdout_colors: bool,
}

impl TerminalEnv {
    /// Snapshot the environment variables and the stdout terminal.
    pub fn capture() -> Self {
        Self {
            no_color: env::var_os("NO_COLOR").is_some(),
            clicolor: env::var("CLICOLOR").ok(),
            clicolor_force: env::var("CLICOLOR_FORCE").ok(),
            term: env::var("TERM").ok(),
            stdout_colors: console::Term::stdout().features().colors_supported(),
        }
    }

    fn wants_color(&self) -> bool {
        if self.no_color || self.clicolor.as_deref() == Some("0") {
            return false;
        }
        if self
            .clicolor_force
            .as_deref()
            .is_some_and(|force| !force.is_empty() && force != "0")
        {
            return true;
        }
        self.term.as_deref() != Some("dumb") && self.stdout_colors
    }
}

/// Whether the tree output is styled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Pick the color mode by precedence (`flag`, then `setting`, then the
    /// default) and apply it to the current environment.
    ///
    /// An unknown mode is an error even when a higher-precedence source
    /// would not have used it, as long as it is the one selected.
    pub fn resolve(flag: Option<&str>, setting: Option<&str>) -> anyhow::Result<Self> {
        let choice: ColorChoice = flag.or(setting).unwrap_or(DEFAULT_COLOR).parse()?;
        Ok(Self::for_choice(choice, &TerminalEnv::capture()))
    }

    /// Apply a color mode to a given environment.
    pub fn for_choice(choice: ColorChoice, env: &TerminalEnv) -> Self {
        let use_color = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => env.wants_color(),
        };
        Self { use_color }
    }

    /// `styled` when colors are on, `plain` otherwise.
    pub fn decorate<'a>(&self, styled: &'a str, plain: &'a str) -> &'a str {
        if self.use_color {
            styled
        } else {
            plain
        }
    }
}
