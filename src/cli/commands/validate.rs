//! Validate config command implementation

use crate::config::load_config;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Records File: {}", config.store.records_path);
        println!(
            "  Default Place: {}",
            config.documents.default_place.as_deref().unwrap_or("(none)")
        );
        println!(
            "  Default Doctor: {}",
            config
                .documents
                .default_doctor_id
                .as_deref()
                .unwrap_or("(none)")
        );
        if config.logging.local_enabled {
            println!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        } else {
            println!("  Log Files: disabled");
        }
        println!();

        if !Path::new(&config.store.records_path).exists() {
            println!(
                "⚠️  Records file does not exist yet: {}",
                config.store.records_path
            );
        }

        Ok(0)
    }
}
