//! The community-maintained Gambay geojson
//!
//! A plain geojson feature collection; each feature names a language and
//! may self-describe a code. Parsing is ordinary serde_json over typed
//! structs.

use super::GeographyError;
use crate::types::{Geometry, LanguageCode, LanguageRecord, RecordProperties, Source};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<GambayFeature>,
}

/// One community geo-feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GambayFeature {
    pub geometry: Geometry,
    pub properties: GambayProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GambayProperties {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
}

impl GambayFeature {
    /// Convert into a language record tagged `source = "Gambay"` under the
    /// given canonical code.
    pub fn into_record(self, code: LanguageCode) -> LanguageRecord {
        let mut properties = RecordProperties::new(code, self.properties.name, Source::Gambay);
        properties.selected = self.properties.selected;
        LanguageRecord::new(self.geometry, properties)
    }
}

/// Load the feature collection. A missing or malformed file is fatal to
/// the whole run.
pub fn load_features(path: &Path) -> Result<Vec<GambayFeature>, GeographyError> {
    let raw = std::fs::read_to_string(path).map_err(|e| GeographyError::io(path, e))?;
    let collection: FeatureCollection =
        serde_json::from_str(&raw).map_err(|source| GeographyError::Json {
            path: path.display().to_string(),
            source,
        })?;
    info!(
        "Loaded {} Gambay features from {}",
        collection.features.len(),
        path.display()
    );
    Ok(collection.features)
}
