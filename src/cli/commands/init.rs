//! Init command implementation
//!
//! Writes a starter `clinidoc.toml`.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "clinidoc.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Clinidoc configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::starter_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Point store.records_path at your records file");
                println!("  2. Set documents.default_doctor_id or pass --doctor");
                println!("  3. Validate configuration: clinidoc validate-config");
                println!("  4. Generate a document: clinidoc generate --template <ID> --patient <ID>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    fn starter_config() -> &'static str {
        r#"# Clinidoc Configuration File

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[store]
# JSON file with doctors, patients, appointments and templates
records_path = "records.json"

[documents]
# Used for system.place when --place is not given
# default_place = "Riverside Clinic"

# Acting doctor when --doctor is not given
# default_doctor_id = "doc-001"

[logging]
# Write JSON log files in addition to console output
local_enabled = false
local_path = "logs"
# Log rotation (daily or hourly)
local_rotation = "daily"
"#
    }
}
