//! Check-template command implementation
//!
//! Validates a template content file without touching any records. Both
//! text content (version "1.0") and form schemas (version 2) are accepted.

use crate::core::template::TemplateBody;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the check-template command
#[derive(Args, Debug)]
pub struct CheckTemplateArgs {
    /// JSON file holding template content or a form schema
    pub file: PathBuf,
}

impl CheckTemplateArgs {
    /// Execute the check-template command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        println!("🔍 Checking template: {}", self.file.display());
        println!();

        let contents = match std::fs::read_to_string(&self.file) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to read template file");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&contents) {
            Ok(v) => v,
            Err(e) => {
                println!("❌ Template file is not valid JSON");
                println!("   Error: {e}");
                return Ok(4);
            }
        };

        match TemplateBody::from_value(&value) {
            Ok(body) => {
                println!("✅ Template is valid");
                println!();
                print_summary(&body);
                Ok(0)
            }
            Err(e) => {
                println!("❌ Template is invalid");
                println!("   Error: {e}");
                Ok(4)
            }
        }
    }
}

fn print_summary(body: &TemplateBody) {
    match body {
        TemplateBody::Text(content) => {
            println!("  Format: text");
            println!("  Declared variables: {}", content.variables.len());
            let undeclared = content.undeclared_placeholders();
            if !undeclared.is_empty() {
                println!("  ⚠️  Undeclared placeholders: {}", undeclared.join(", "));
            }
        }
        TemplateBody::Form(schema) => {
            println!("  Format: form");
            println!("  Elements: {}", schema.elements.len());
            println!("  Input fields: {}", schema.input_elements().count());
            let locked: Vec<&str> = schema
                .input_elements()
                .filter(|e| e.is_locked())
                .map(|e| e.name.as_str())
                .collect();
            if !locked.is_empty() {
                println!("  Locked fields: {}", locked.join(", "));
            }
        }
    }
}
