//! Building the on-disk repository tree
//!
//! For every language record the builder creates `<dist>/repository/<CODE>/`,
//! renders each referenced media file into web formats, rewrites the record's
//! media references to dist-root-relative output paths, and writes the
//! per-language `index.json`. Built words are also fed into the global
//! [`WordIndex`] for the master writer.

pub mod master;
pub mod transcode;
pub mod words;

pub use master::write_master_indices;
pub use transcode::Transcoder;
pub use words::{shard_name, WordIndex};

use crate::issue::{Issue, IssueLog};
use crate::types::{MediaSource, RecordStore, WordLanguageRef};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Name of the per-language output tree under the dist root.
pub const REPOSITORY_DIR: &str = "repository";

/// Audio originals are only copied alongside their transcodes when the
/// source is a wave file.
const WAVE_MARKER: &str = "wav";

/// Output formats per media kind. The original file is copied next to them.
const AUDIO_FORMATS: &[&str] = &["webm", "mp3"];
const VIDEO_FORMATS: &[&str] = &["webm", "mp4"];

/// Fatal repository build errors. Per-item media problems are issues, not
/// errors; only filesystem failures on the output tree abort the run.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to write '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to serialize record index: {0}")]
    Json(#[from] serde_json::Error),
}

impl RepositoryError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Builds the per-language output tree.
#[derive(Debug)]
pub struct RepositoryBuilder<'a> {
    dist_dir: &'a Path,
    transcoder: &'a Transcoder,
}

impl<'a> RepositoryBuilder<'a> {
    pub fn new(dist_dir: &'a Path, transcoder: &'a Transcoder) -> Self {
        Self {
            dist_dir,
            transcoder,
        }
    }

    /// Build every record in the store. Records are rewritten in place:
    /// source references become output path lists.
    pub fn build(
        &self,
        store: &mut RecordStore,
        issues: &mut IssueLog,
    ) -> Result<WordIndex, RepositoryError> {
        let mut index = WordIndex::new();

        for (code, record) in store.iter_mut() {
            let repo_dir = self.dist_dir.join(REPOSITORY_DIR).join(code);
            fs::create_dir_all(&repo_dir).map_err(|e| RepositoryError::io(&repo_dir, e))?;
            info!("Building repository for {}", code);

            let language_name = record.properties.name.clone();
            let props = &mut record.properties;

            if let Some(language) = props.language.as_mut() {
                let label = format!("language '{}'", language.name);
                self.build_media(&mut language.media, &repo_dir, &label, issues);
            }
            if let Some(speaker) = props.speaker.as_mut() {
                let label = format!("speaker '{}'", speaker.name);
                self.build_media(&mut speaker.media, &repo_dir, &label, issues);
            }
            if let Some(words) = props.words.as_mut() {
                for word in words.iter_mut() {
                    let label = format!("word '{}' of {}", word.english, code);
                    self.build_media(&mut word.media, &repo_dir, &label, issues);

                    let mut indexed = word.clone();
                    indexed.language = Some(WordLanguageRef {
                        code: code.clone(),
                        name: language_name.clone(),
                    });
                    index.push(indexed);
                }
            }

            let index_path = repo_dir.join("index.json");
            let json = serde_json::to_string_pretty(&*record)?;
            fs::write(&index_path, json).map_err(|e| RepositoryError::io(&index_path, e))?;
        }

        Ok(index)
    }

    /// Render one item's media. Exactly one of the source references is
    /// honored, video first. Every processed item must carry media; an
    /// empty item is an error.
    fn build_media(
        &self,
        media: &mut MediaSource,
        repo_dir: &Path,
        label: &str,
        issues: &mut IssueLog,
    ) {
        if let Some(source) = media.video_file.take() {
            if !source.exists() {
                issues.push(Issue::error(
                    "Video file missing",
                    format!("'{}' referenced by {} does not exist", source.display(), label),
                ));
                media.video = Some(Vec::new());
                return;
            }
            media.video = Some(self.render(&source, repo_dir, VIDEO_FORMATS, true, issues));
        } else if let Some(source) = media.audio_file.take() {
            if !source.exists() {
                issues.push(Issue::error(
                    "Audio file missing",
                    format!("'{}' referenced by {} does not exist", source.display(), label),
                ));
                media.audio = Some(Vec::new());
                return;
            }
            let copy_original = source
                .file_name()
                .map(|n| n.to_string_lossy().contains(WAVE_MARKER))
                .unwrap_or(false);
            media.audio = Some(self.render(&source, repo_dir, AUDIO_FORMATS, copy_original, issues));
        } else if media.is_empty() {
            issues.push(Issue::error(
                "Audio or Video file missing",
                format!("No audio or video file for {}", label),
            ));
        }
    }

    /// Transcode `source` into each format, optionally copying the original
    /// alongside. Output paths are recorded even when a transcode fails, so
    /// a later repaired run serves the same manifest.
    fn render(
        &self,
        source: &Path,
        repo_dir: &Path,
        formats: &[&str],
        copy_original: bool,
        issues: &mut IssueLog,
    ) -> Vec<String> {
        let mut outputs = Vec::new();
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        for format in formats {
            let target = repo_dir.join(format!("{}.{}", stem, format));
            if let Err(issue) = self.transcoder.transcode(source, &target) {
                issues.push(issue);
            }
            outputs.push(self.dist_relative(&target));
        }

        if copy_original {
            if let Some(file_name) = source.file_name() {
                let target = repo_dir.join(file_name);
                if !target.exists() || self.transcoder.force() {
                    if let Err(e) = fs::copy(source, &target) {
                        issues.push(Issue::error(
                            "Media copy failed",
                            format!(
                                "could not copy '{}' to '{}': {}",
                                source.display(),
                                target.display(),
                                e
                            ),
                        ));
                    }
                }
                outputs.push(self.dist_relative(&target));
            }
        }

        outputs
    }

    /// Path as served: relative to the dist root, with a leading slash.
    fn dist_relative(&self, path: &Path) -> String {
        let rel: &Path = path.strip_prefix(self.dist_dir).unwrap_or(path);
        format!("/{}", rel.display())
    }
}

/// Repository directory for one code under a dist root.
pub fn record_dir(dist_dir: &Path, code: &str) -> PathBuf {
    dist_dir.join(REPOSITORY_DIR).join(code)
}
