//! Integrations at the edges of document generation.
//!
//! - [`store`] - owner-scoped record storage behind the [`store::RecordStore`] trait
//! - [`render`] - sinks that turn generated documents into output
//!
//! Core logic only talks to these through traits, so tests and the CLI can
//! swap implementations freely.

pub mod render;
pub mod store;
