//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ClinidocConfig;
use crate::domain::errors::DocsError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`ClinidocConfig`]
/// 4. Applies environment variable overrides (`CLINIDOC_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`DocsError::Configuration`] if the file is missing or unreadable,
/// references unset variables, is not valid TOML, or fails validation.
///
/// # Examples
///
/// ```no_run
/// use clinidoc::config::loader::load_config;
///
/// let config = load_config("clinidoc.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ClinidocConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DocsError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DocsError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ClinidocConfig = toml::from_str(&contents)
        .map_err(|e| DocsError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        DocsError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid env var regex");
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(DocsError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `CLINIDOC_*` prefix
///
/// Variables follow the pattern `CLINIDOC_<SECTION>_<KEY>`, for example
/// `CLINIDOC_STORE_RECORDS_PATH`.
fn apply_env_overrides(config: &mut ClinidocConfig) {
    if let Ok(val) = std::env::var("CLINIDOC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("CLINIDOC_STORE_RECORDS_PATH") {
        config.store.records_path = val;
    }

    if let Ok(val) = std::env::var("CLINIDOC_DOCUMENTS_DEFAULT_PLACE") {
        config.documents.default_place = Some(val);
    }
    if let Ok(val) = std::env::var("CLINIDOC_DOCUMENTS_DEFAULT_DOCTOR_ID") {
        config.documents.default_doctor_id = Some(val);
    }

    if let Ok(val) = std::env::var("CLINIDOC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CLINIDOC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("CLINIDOC_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
