//! Configuration management for Clinidoc.
//!
//! Clinidoc reads a TOML file (default `clinidoc.toml`) with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CLINIDOC_<SECTION>_<KEY>` overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`StoreConfig`] - location of the records file
//! - [`DocumentsConfig`] - default place and acting doctor
//! - [`LoggingConfig`] - local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [store]
//! records_path = "${CLINIDOC_DATA_DIR}/records.json"
//!
//! [documents]
//! default_place = "Riverside Clinic"
//! default_doctor_id = "doc-001"
//!
//! [logging]
//! local_enabled = true
//! local_path = "logs"
//! local_rotation = "daily"
//! ```
//!
//! ```rust,no_run
//! use clinidoc::config::load_config;
//!
//! # fn example() {
//! match load_config("clinidoc.toml") {
//!     Ok(config) => println!("Records: {}", config.store.records_path),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{ApplicationConfig, ClinidocConfig, DocumentsConfig, LoggingConfig, StoreConfig};
