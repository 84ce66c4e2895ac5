//! Record store adapters
//!
//! - [`traits`] - the [`RecordStore`] abstraction used by document generation
//! - [`memory`] - an in-memory implementation loaded from a JSON fixture

pub mod memory;
pub mod traits;

pub use memory::{MemoryRecordStore, RecordSet};
pub use traits::RecordStore;

use crate::config::StoreConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Creates the record store described by configuration
///
/// # Errors
///
/// Returns an error if the configured records file cannot be loaded.
pub fn create_record_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    tracing::debug!(records_path = %config.records_path, "Creating record store");
    let store = MemoryRecordStore::from_file(&config.records_path)?;
    Ok(Arc::new(store))
}
