pub mod switcher;

use clap::ValueEnum;
use std::fmt;

/// Operation requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Media keys as designed by Apple
    Media,
    /// Standard function keys
    Func,
    /// Switch to the other mode
    Auto,
    /// Report the currently active mode
    Query,
}

/// Fn-key behavior currently configured for the keyboard.
///
/// `Unknown` means the options file could not be read at all; `Disabled`
/// means it exists but carries neither recognized fnmode flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Media,
    Func,
    Unknown,
    Disabled,
}

impl Mode {
    /// The other of the two real modes. Anything that is not clearly
    /// `Media` toggles to `Media`, the canonical fallback.
    pub fn toggle(&self) -> Self {
        match self {
            Mode::Media => Mode::Func,
            _ => Mode::Media,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Media => "media",
            Mode::Func => "func",
            Mode::Unknown => "unknown",
            Mode::Disabled => "disabled",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_between_real_modes() {
        assert_eq!(Mode::Media.toggle(), Mode::Func);
        assert_eq!(Mode::Func.toggle(), Mode::Media);
    }

    #[test]
    fn toggle_falls_back_to_media() {
        assert_eq!(Mode::Unknown.toggle(), Mode::Media);
        assert_eq!(Mode::Disabled.toggle(), Mode::Media);
    }

    #[test]
    fn labels_match_cli_words() {
        assert_eq!(Mode::Media.to_string(), "media");
        assert_eq!(Mode::Func.to_string(), "func");
        assert_eq!(Mode::Unknown.to_string(), "unknown");
        assert_eq!(Mode::Disabled.to_string(), "disabled");
    }
}
