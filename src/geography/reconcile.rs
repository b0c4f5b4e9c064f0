//! Merging the two geography sources into one record store
//!
//! Step order is the precedence rule: a Gambay feature carrying its own
//! code loses to one resolved via the registry only if they collide on the
//! same code, registry overrides beat both, and `#`-marked registry codes
//! beat everything.

use super::registry::RegistryTable;
use super::{GambayAddition, GambayFeature, REGISTRY_ONLY_MARKER};
use crate::issue::Issue;
use crate::types::{normalize_code, Geometry, RecordStore, Source};
use tracing::debug;

/// Result of reconciliation: the merged store plus its audit trail.
#[derive(Debug, Default)]
pub struct Reconciled {
    pub store: RecordStore,
    pub additions: Vec<GambayAddition>,
    pub issues: Vec<Issue>,
}

/// Merge the registry and the community features.
pub fn reconcile(registry: &RegistryTable, features: Vec<GambayFeature>) -> Reconciled {
    let mut out = Reconciled::default();

    for feature in features {
        merge_feature(registry, feature, &mut out);
    }
    apply_registry_entries(registry, &mut out);

    debug!("Reconciled {} language records", out.store.len());
    out
}

fn merge_feature(registry: &RegistryTable, feature: GambayFeature, out: &mut Reconciled) {
    let name = feature.properties.name.clone();

    match feature.properties.code.as_deref().filter(|c| !c.is_empty()) {
        Some(code) => {
            let trimmed = code.trim();
            let canonical = normalize_code(code);
            // Only casing is worth an error; stray whitespace is normalized
            // away silently.
            if canonical != trimmed {
                out.issues.push(Issue::error(
                    "Gambay code lowercased",
                    format!(
                        "Gambay code for {} is lowercase: '{}'. Should be {}",
                        name, trimmed, canonical
                    ),
                ));
            }
            out.store
                .insert(canonical.clone(), feature.into_record(canonical));
        }
        None => match registry.get(&name) {
            Some(entry) if !entry.code.is_empty() => {
                out.additions.push(GambayAddition {
                    property: "code".to_string(),
                    value: entry.code.clone(),
                    name: name.clone(),
                });
                let canonical = normalize_code(&entry.code);
                out.store
                    .insert(canonical.clone(), feature.into_record(canonical));
            }
            Some(_) => {
                out.issues.push(Issue::error(
                    "Missing code in Austlang",
                    format!(
                        "Gambay language '{}' found in Austlang but no code was present - language excluded",
                        name
                    ),
                ));
            }
            None => {
                // Neither source can supply a code; the feature produces no
                // record but the gap is made visible.
                out.issues.push(Issue::warning(
                    "Gambay language unmatched",
                    format!(
                        "Gambay language '{}' has no code and no Austlang entry - language excluded",
                        name
                    ),
                ));
            }
        },
    }
}

/// Registry overrides, then the `#` escape hatch for registry-only codes.
fn apply_registry_entries(registry: &RegistryTable, out: &mut Reconciled) {
    for entry in registry.iter() {
        if entry.override_flag {
            let code = normalize_code(&entry.code);
            match out.store.get_mut(&code) {
                Some(record) => {
                    record.geometry = Geometry::point(entry.lng, entry.lat);
                    record.properties.name = entry.name.clone();
                    record.properties.source = Source::Austlang;
                }
                None => out.store.insert(code, entry.to_record()),
            }
        }
        if entry.code.contains(REGISTRY_ONLY_MARKER) {
            out.store
                .insert(normalize_code(&entry.code), entry.to_record());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geography::gambay::GambayProperties;
    use crate::issue::IssueLevel;
    use crate::sheet::Sheet;

    fn feature(name: &str, code: Option<&str>) -> GambayFeature {
        GambayFeature {
            geometry: Geometry::point(131.5, -20.2),
            properties: GambayProperties {
                name: name.to_string(),
                code: code.map(String::from),
                selected: None,
            },
        }
    }

    fn registry(rows: &[[&str; 8]]) -> RegistryTable {
        let mut all = vec![vec![String::new(); 8]];
        all.extend(
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect::<Vec<_>>()),
        );
        RegistryTable::from_sheet(&Sheet::from_rows("registry", all))
    }

    #[test]
    fn feature_with_uppercase_code_is_stored_as_given() {
        let out = reconcile(&registry(&[]), vec![feature("Warlpiri", Some("N151"))]);
        assert_eq!(out.store.len(), 1);
        let record = out.store.get("N151").unwrap();
        assert_eq!(record.properties.source, Source::Gambay);
        assert!(out.issues.is_empty());
        assert!(out.additions.is_empty());
    }

    #[test]
    fn lowercase_code_is_error_and_stored_uppercased() {
        let out = reconcile(&registry(&[]), vec![feature("Warlpiri", Some("n151"))]);
        assert!(out.store.contains_code("N151"));
        assert!(!out.store.contains_code("n151"));
        assert_eq!(out.store.get("N151").unwrap().properties.code, "N151");

        let issue = &out.issues[0];
        assert_eq!(issue.kind, "Gambay code lowercased");
        assert_eq!(issue.level, IssueLevel::Error);
    }

    #[test]
    fn whitespace_around_uppercase_code_is_normalized_without_error() {
        let out = reconcile(&registry(&[]), vec![feature("Warlpiri", Some(" N151 "))]);
        assert!(out.store.contains_code("N151"));
        assert!(out.issues.is_empty(), "{:?}", out.issues);
    }

    #[test]
    fn codeless_feature_takes_code_from_registry_with_addition() {
        let table = registry(&[["N151", "Warlpiri", "", "-20.2", "131.5", "", "", ""]]);
        let out = reconcile(&table, vec![feature("Warlpiri", None)]);

        let record = out.store.get("N151").unwrap();
        assert_eq!(record.properties.source, Source::Gambay);
        assert_eq!(out.additions.len(), 1);
        assert_eq!(out.additions[0].property, "code");
        assert_eq!(out.additions[0].value, "N151");
        assert_eq!(out.additions[0].name, "Warlpiri");
    }

    #[test]
    fn registry_entry_with_empty_code_drops_feature_with_error() {
        let table = registry(&[["", "Warlpiri", "", "-20.2", "131.5", "", "", ""]]);
        let out = reconcile(&table, vec![feature("Warlpiri", None)]);

        assert!(out.store.is_empty());
        assert_eq!(out.issues[0].kind, "Missing code in Austlang");
        assert_eq!(out.issues[0].level, IssueLevel::Error);
    }

    #[test]
    fn unmatched_codeless_feature_warns_and_leaves_store_untouched() {
        let out = reconcile(&registry(&[]), vec![feature("Nowhere", None)]);
        assert!(out.store.is_empty());
        assert_eq!(out.issues.len(), 1);
        assert_eq!(out.issues[0].kind, "Gambay language unmatched");
        assert_eq!(out.issues[0].level, IssueLevel::Warning);
    }

    #[test]
    fn override_entry_wins_over_gambay_record() {
        let table = registry(&[["N151", "Warlpiri Proper", "", "-25", "140", "", "", "1"]]);
        let out = reconcile(&table, vec![feature("Warlpiri", Some("N151"))]);

        let record = out.store.get("N151").unwrap();
        assert_eq!(record.properties.source, Source::Austlang);
        assert_eq!(record.properties.name, "Warlpiri Proper");
        assert_eq!(
            record.geometry.coordinates,
            serde_json::json!([140.0, -25.0])
        );
        // Override keeps whatever the Gambay record already carried beyond
        // geography; here that is just the record itself surviving.
        assert_eq!(out.store.len(), 1);
    }

    #[test]
    fn override_without_existing_record_synthesizes_one() {
        let table = registry(&[["C5", "Registry Lang", "", "-25", "140", "", "", "1"]]);
        let out = reconcile(&table, vec![]);

        let record = out.store.get("C5").unwrap();
        assert_eq!(record.properties.source, Source::Austlang);
        assert_eq!(record.properties.selected, Some(false));
    }

    #[test]
    fn hash_marker_overwrites_even_an_override() {
        // The same code arrives via a Gambay feature, then an override row,
        // then a #-marked row; the marker must win last.
        let table = registry(&[
            ["A1#", "Marked", "", "-10", "100", "", "", "1"],
        ]);
        let out = reconcile(&table, vec![feature("Other", Some("A1#"))]);

        let record = out.store.get("A1#").unwrap();
        assert_eq!(record.properties.source, Source::Austlang);
        assert_eq!(record.properties.name, "Marked");
        assert_eq!(
            record.geometry.coordinates,
            serde_json::json!([100.0, -10.0])
        );
    }

    #[test]
    fn codes_collide_case_insensitively() {
        // "n151" and "N151" must resolve to one record, the later write.
        let out = reconcile(
            &registry(&[]),
            vec![feature("First", Some("n151")), feature("Second", Some("N151"))],
        );
        assert_eq!(out.store.len(), 1);
        assert_eq!(out.store.get("N151").unwrap().properties.name, "Second");
    }
}
