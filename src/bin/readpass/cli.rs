//! CLI flag schema for the askpass-style helper.

use clap::{Parser, ValueEnum};
use passread::{AppConfig, EchoPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub(crate) enum EchoMode {
    /// Print nothing while typing
    #[default]
    Hidden,
    /// Print the mask glyph for every character
    Masked,
    /// Print characters as typed
    Echoed,
}

impl From<EchoMode> for EchoPolicy {
    fn from(mode: EchoMode) -> Self {
        match mode {
            EchoMode::Hidden => EchoPolicy::Hidden,
            EchoMode::Masked => EchoPolicy::Masked,
            EchoMode::Echoed => EchoPolicy::Echoed,
        }
    }
}

/// Read a secret from the terminal and print it to stdout.
///
/// The prompt and any echo go to stderr, so stdout carries only the secret.
#[derive(Debug, Parser)]
#[command(name = "readpass", version, about)]
pub(crate) struct ReadpassConfig {
    #[command(flatten)]
    pub(crate) app: AppConfig,

    /// How typed characters are displayed
    #[arg(long = "mode", value_enum, env = "PASSREAD_MODE", default_value_t = EchoMode::Hidden)]
    pub(crate) mode: EchoMode,

    /// Prompt printed to stderr before reading
    #[arg(default_value = "Password: ")]
    pub(crate) prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_hidden_with_password_prompt() {
        let config = ReadpassConfig::parse_from(["readpass"]);
        assert_eq!(config.mode, EchoMode::Hidden);
        assert_eq!(config.prompt, "Password: ");
        assert_eq!(EchoPolicy::from(config.mode), EchoPolicy::Hidden);
    }

    #[test]
    fn parses_mode_and_positional_prompt() {
        let config = ReadpassConfig::parse_from(["readpass", "--mode", "masked", "PIN: "]);
        assert_eq!(config.mode, EchoMode::Masked);
        assert_eq!(config.prompt, "PIN: ");
        assert_eq!(EchoPolicy::from(EchoMode::Echoed), EchoPolicy::Echoed);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(ReadpassConfig::try_parse_from(["readpass", "--mode", "loud"]).is_err());
    }
}
