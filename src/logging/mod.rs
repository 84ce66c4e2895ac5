//! Logging
//!
//! Structured logging built on `tracing`:
//! - human-readable console output
//! - optional JSON log files with daily or hourly rotation
//! - level set from configuration, overridable through `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use clinidoc::logging::init_logging;
//! use clinidoc::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log a successfully generated document
///
/// # Example
///
/// ```no_run
/// use clinidoc::log_document_generated;
/// use clinidoc::domain::ids::{DocumentId, TemplateId};
///
/// let document_id = DocumentId::new("doc-1").unwrap();
/// let template_id = TemplateId::new("referral").unwrap();
/// log_document_generated!(&document_id, &template_id, "text");
/// ```
#[macro_export]
macro_rules! log_document_generated {
    ($document_id:expr, $template_id:expr, $format:expr) => {
        tracing::info!(
            document_id = %$document_id,
            template_id = %$template_id,
            format = $format,
            "Document generated"
        );
    };
}

/// Log a form submission that failed validation
///
/// Only the number of errors and field names are logged, never values.
///
/// # Example
///
/// ```no_run
/// use clinidoc::log_submission_rejected;
/// use clinidoc::domain::ids::TemplateId;
///
/// let template_id = TemplateId::new("intake").unwrap();
/// let errors = vec!["Full name is required".to_string()];
/// log_submission_rejected!(&template_id, &errors);
/// ```
#[macro_export]
macro_rules! log_submission_rejected {
    ($template_id:expr, $errors:expr) => {
        tracing::warn!(
            template_id = %$template_id,
            error_count = $errors.len(),
            "Form submission rejected"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use clinidoc::log_error_with_context;
/// use clinidoc::domain::DocsError;
///
/// let error = DocsError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::ids::{DocumentId, TemplateId};
    use crate::domain::DocsError;

    #[test]
    fn test_macros_expand_without_subscriber() {
        let document_id = DocumentId::new("doc-1").unwrap();
        let template_id = TemplateId::new("referral").unwrap();
        let errors = vec!["Name is required".to_string()];
        let error = DocsError::Other("boom".to_string());

        log_document_generated!(&document_id, &template_id, "form");
        log_submission_rejected!(&template_id, &errors);
        log_error_with_context!(&error, "while testing");
    }
}
