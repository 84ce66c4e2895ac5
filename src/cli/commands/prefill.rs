//! Prefill command implementation
//!
//! Prints the initial values of a form template for one patient as JSON.

use super::{exit_code_for, open_service, RecordArgs};
use clap::Args;

/// Arguments for the prefill command
#[derive(Args, Debug)]
pub struct PrefillArgs {
    #[command(flatten)]
    pub records: RecordArgs,
}

impl PrefillArgs {
    /// Execute the prefill command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let (config, service) = match open_service(config_path) {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };

        let selection = match self.records.selection(&config) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let form = service
            .prefill_form(
                &selection.doctor_id,
                &selection.template_id,
                Some(&selection.patient_id),
                selection.appointment_id.as_ref(),
                self.records.place.as_deref(),
            )
            .await;

        match form {
            Ok(form) => {
                tracing::debug!(
                    template_id = %form.template_id,
                    prefilled = form.values.len(),
                    "Prefilled form"
                );
                println!("{}", serde_json::to_string_pretty(&form.values)?);
                Ok(0)
            }
            Err(e) => {
                eprintln!("❌ Failed to prefill form");
                eprintln!("   Error: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}
