//! langrepo: word-list ingest and repository builder for Australian
//! Indigenous language data
//!
//! Reconciles two geography registries (the authoritative AIATSIS workbook
//! and the community Gambay geojson) into one record per language code,
//! extracts fixed-layout word-list spreadsheets, transcodes the referenced
//! recordings into web formats, and writes a static JSON repository tree
//! that a map front end can serve directly.

pub mod config;
pub mod extract;
pub mod geography;
pub mod issue;
pub mod pipeline;
pub mod repository;
pub mod sheet;
pub mod types;

pub use config::Config;
pub use pipeline::Pipeline;
pub use types::*;
