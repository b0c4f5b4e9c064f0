//! Geography sources and their reconciliation
//!
//! Two independently maintained registries describe where a language is
//! spoken: the authoritative AIATSIS registry (codes, coordinates, override
//! flags) and the community-maintained Gambay geojson. [`reconcile`] merges
//! them into one record store keyed by language code.

pub mod gambay;
pub mod reconcile;
pub mod registry;

pub use gambay::{load_features, GambayFeature};
pub use reconcile::{reconcile, Reconciled};
pub use registry::{RegistryEntry, RegistryTable};

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Registry codes containing this marker are registry-only languages that
/// unconditionally get a synthetic record.
pub const REGISTRY_ONLY_MARKER: char = '#';

/// Errors loading a geography source
#[derive(Debug, Error)]
pub enum GeographyError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse geojson '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Sheet(#[from] crate::sheet::SheetError),
}

impl GeographyError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Audit record of a field injected into a Gambay feature from the
/// registry. Reported in `gambay-additions.json`, unused downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GambayAddition {
    pub property: String,
    pub value: String,
    pub name: String,
}
