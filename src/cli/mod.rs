//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// Clinidoc - clinical document generation
#[derive(Parser, Debug)]
#[command(name = "clinidoc")]
#[command(version, about, long_about = None)]
#[command(author = "Clinidoc Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "clinidoc.toml", env = "CLINIDOC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CLINIDOC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a document for a patient
    Generate(commands::generate::GenerateArgs),

    /// Print the initial values of a form template
    Prefill(commands::prefill::PrefillArgs),

    /// Validate a template content or form schema file
    CheckTemplate(commands::check_template::CheckTemplateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Commands {
    /// Whether the command needs the configuration file loaded for logging
    pub fn uses_config(&self) -> bool {
        matches!(self, Commands::Generate(_) | Commands::Prefill(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::parse_from([
            "clinidoc",
            "generate",
            "--template",
            "referral",
            "--patient",
            "pat-001",
            "--appointment",
            "apt-001",
            "--json",
        ]);
        assert_eq!(cli.config, "clinidoc.toml");
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.records.template, "referral");
        assert_eq!(args.records.appointment.as_deref(), Some("apt-001"));
        assert!(args.json);
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["clinidoc", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["clinidoc", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_prefill_requires_patient() {
        let result = Cli::try_parse_from(["clinidoc", "prefill", "--template", "intake"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_check_template() {
        let cli = Cli::parse_from(["clinidoc", "check-template", "note.json"]);
        assert!(matches!(cli.command, Commands::CheckTemplate(_)));
        assert!(!cli.command.uses_config());
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["clinidoc", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
