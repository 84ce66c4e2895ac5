//! Generate command implementation
//!
//! Produces one document for a patient and prints it, either rendered as
//! plain text or as the stored JSON.

use super::{exit_code_for, open_service, RecordArgs};
use crate::adapters::render::TextRenderer;
use crate::core::builder::FieldValues;
use crate::core::service::{DocumentService, GenerateRequest, GenerationOutcome};
use crate::log_error_with_context;
use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub records: RecordArgs,

    /// JSON file with form values (form templates only)
    #[arg(long)]
    pub values: Option<PathBuf>,

    /// Document title (defaults to the template name)
    #[arg(long)]
    pub title: Option<String>,

    /// Print the generated document as JSON
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    /// Execute the generate command
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

        tracing::info!(
            template_id = %selection.template_id,
            patient_id = %selection.patient_id,
            "Generating document"
        );

        let mut request = GenerateRequest::new(
            selection.doctor_id,
            selection.template_id,
            selection.patient_id,
        );
        request.appointment_id = selection.appointment_id;
        request.place = self.records.place.clone();
        request.title = self.title.clone();
        if let Some(path) = &self.values {
            request.submitted = Some(read_values(path)?);
        }

        let outcome = match service.generate(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log_error_with_context!(&e, "Document generation failed");
                eprintln!("❌ Failed to generate document");
                eprintln!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        match outcome {
            GenerationOutcome::Generated(document) => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&document)?);
                } else {
                    let rendered = DocumentService::render(&document, &TextRenderer::new())?;
                    print!("{rendered}");
                    eprintln!("✅ Generated document {}", document.id);
                }
                Ok(0)
            }
            GenerationOutcome::Rejected(result) => {
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    eprintln!("❌ Form submission rejected");
                    for error in &result.errors {
                        eprintln!("   - {error}");
                    }
                }
                Ok(3)
            }
        }
    }
}

/// Reads form values from a JSON object file
fn read_values(path: &Path) -> anyhow::Result<FieldValues> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read values file {}", path.display()))?;
    let values: FieldValues = serde_json::from_str(&contents)
        .with_context(|| format!("Values file {} must hold a JSON object", path.display()))?;
    Ok(values)
}
