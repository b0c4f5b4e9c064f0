//! End-to-end build over a temporary dist tree: reconcile the two geography
//! sources, fill a record from sheet-shaped data, build the repository and
//! check every master artifact.

use langrepo::geography::{load_features, reconcile, RegistryTable};
use langrepo::issue::IssueLog;
use langrepo::repository::{
    record_dir, shard_name, write_master_indices, RepositoryBuilder, Transcoder,
};
use langrepo::sheet::Sheet;
use langrepo::types::{MediaSource, NamedMedia, WordEntry};
use std::path::Path;

fn registry_table() -> RegistryTable {
    let rows: Vec<Vec<String>> = vec![
        vec!["code", "name", "", "lat", "lng", "", "", "override"],
        vec!["ABC", "Example", "", "-20.2", "131.5", "", "", ""],
        vec!["D2", "Codeless Lang", "", "-30.0", "140.0", "", "", ""],
    ]
    .into_iter()
    .map(|r| r.into_iter().map(String::from).collect())
    .collect();
    RegistryTable::from_sheet(&Sheet::from_rows("registry", rows))
}

fn write_geojson(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("gambay-languages.geojson");
    std::fs::write(
        &path,
        r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [131.5, -20.2]},
                    "properties": {"name": "Example", "code": "ABC"}
                },
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [140.0, -30.0]},
                    "properties": {"name": "Codeless Lang"}
                }
            ]
        }"#,
    )
    .unwrap();
    path
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn full_build_produces_repository_and_master_indices() {
    let data = tempfile::tempdir().unwrap();
    let dist = tempfile::tempdir().unwrap();

    // Geography: one coded feature, one resolved via the registry.
    let registry = registry_table();
    let features = load_features(&write_geojson(data.path())).unwrap();
    let reconciled = reconcile(&registry, features);
    let mut store = reconciled.store;
    assert_eq!(store.len(), 2);
    assert_eq!(reconciled.additions.len(), 1);
    assert_eq!(reconciled.additions[0].name, "Codeless Lang");

    // Fill the ABC record the way a parsed word-list sheet would.
    let audio_source = data.path().join("ngapa.wav");
    std::fs::write(&audio_source, b"audio").unwrap();
    let name_source = data.path().join("example.wav");
    std::fs::write(&name_source, b"audio").unwrap();
    {
        let props = &mut store.get_mut("ABC").unwrap().properties;
        props.language = Some(NamedMedia {
            name: "Example".to_string(),
            media: MediaSource::audio_ref(name_source),
        });
        props.words = Some(vec![WordEntry {
            english: "water".to_string(),
            indigenous: "ngapa".to_string(),
            english_alternate: None,
            media: MediaSource::audio_ref(audio_source),
            language: None,
        }]);
    }

    let mut issues = IssueLog::new();
    issues.extend(reconciled.issues);

    let transcoder = Transcoder::new("true", false);
    let builder = RepositoryBuilder::new(dist.path(), &transcoder);
    let index = builder.build(&mut store, &mut issues).unwrap();
    write_master_indices(dist.path(), &store, &index, &issues, &reconciled.additions).unwrap();

    assert_eq!(issues.error_count(), 0, "{:?}", issues.as_slice());

    // Per-language index with rewritten media paths.
    let record = read_json(&dist.path().join("repository/ABC/index.json"));
    assert_eq!(record["properties"]["code"], "ABC");
    let audio: Vec<&str> = record["properties"]["words"][0]["audio"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(
        audio,
        vec![
            "/repository/ABC/ngapa.webm",
            "/repository/ABC/ngapa.mp3",
            "/repository/ABC/ngapa.wav",
        ]
    );
    assert!(dist.path().join("repository/ABC/ngapa.wav").exists());

    // languages.json lists both records, words collapsed to a flag.
    let languages = read_json(&dist.path().join("repository/languages.json"));
    let list = languages["languages"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["properties"]["code"], "ABC");
    assert_eq!(list[0]["properties"]["words"], true);
    assert_eq!(list[1]["properties"]["code"], "D2");
    assert_eq!(list[1]["properties"]["words"], false);

    // Word directory and shard.
    let words = read_json(&dist.path().join("repository/words.json"));
    assert_eq!(words["words"][0]["name"], "water");
    let shard = read_json(&dist.path().join("repository").join(shard_name("water")));
    assert_eq!(shard[0]["language"]["code"], "ABC");
    assert_eq!(shard[0]["language"]["name"], "Example");

    // Audit artifacts.
    let errors = read_json(&dist.path().join("repository/errors.json"));
    assert!(errors["errors"].as_array().unwrap().is_empty());
    let additions = read_json(&dist.path().join("repository/gambay-additions.json"));
    assert_eq!(additions["additions"][0]["property"], "code");
    assert_eq!(additions["additions"][0]["value"], "D2");
}

#[test]
fn rebuild_with_existing_outputs_runs_no_transcodes() {
    let data = tempfile::tempdir().unwrap();
    let dist = tempfile::tempdir().unwrap();

    let audio_source = data.path().join("ngapa.wav");
    std::fs::write(&audio_source, b"audio").unwrap();

    let registry = registry_table();
    let features = load_features(&write_geojson(data.path())).unwrap();
    let mut store = reconcile(&registry, features).store;
    store.get_mut("ABC").unwrap().properties.words = Some(vec![WordEntry {
        english: "water".to_string(),
        indigenous: "ngapa".to_string(),
        english_alternate: None,
        media: MediaSource::audio_ref(audio_source),
        language: None,
    }]);

    // Pre-build every output the word needs.
    let repo = record_dir(dist.path(), "ABC");
    std::fs::create_dir_all(&repo).unwrap();
    for name in ["ngapa.webm", "ngapa.mp3", "ngapa.wav"] {
        std::fs::write(repo.join(name), b"built").unwrap();
    }

    // A tool that always fails: any transcode attempt would be an issue.
    let transcoder = Transcoder::new("false", false);
    let builder = RepositoryBuilder::new(dist.path(), &transcoder);
    let mut issues = IssueLog::new();
    builder.build(&mut store, &mut issues).unwrap();

    assert_eq!(issues.error_count(), 0, "{:?}", issues.as_slice());
    assert_eq!(std::fs::read(repo.join("ngapa.mp3")).unwrap(), b"built");
}
