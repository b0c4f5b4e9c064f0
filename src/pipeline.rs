//! End-to-end build pipeline
//!
//! Stage order: load both geography sources, reconcile them into the record
//! store, extract word-list sheets into the store, build the per-language
//! repository tree, then write the master indices. Only the two geography
//! loads are fatal; everything after degrades per record via the issue log.

use crate::config::Config;
use crate::extract;
use crate::geography::{self, GambayAddition, RegistryTable};
use crate::issue::IssueLog;
use crate::repository::{write_master_indices, RepositoryBuilder, Transcoder};
use crate::types::RecordStore;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Outcome counts for one run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub languages: usize,
    pub words: usize,
    pub errors: usize,
    pub warnings: usize,
}

/// One full build, from geography sources to master indices.
pub struct Pipeline {
    config: Config,
    store: RecordStore,
    issues: IssueLog,
    additions: Vec<GambayAddition>,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: RecordStore::new(),
            issues: IssueLog::new(),
            additions: Vec::new(),
        }
    }

    pub fn run(mut self) -> Result<RunSummary> {
        let registry = self.load_geography()?;

        extract::extract_all(
            &self.config.data_dir,
            &mut self.store,
            &registry,
            &mut self.issues,
        );

        let transcoder = Transcoder::new(
            self.config.transcode.tool.clone(),
            self.config.transcode.force_rebuild,
        );
        let builder = RepositoryBuilder::new(&self.config.dist_dir, &transcoder);
        let index = builder.build(&mut self.store, &mut self.issues)?;

        write_master_indices(
            &self.config.dist_dir,
            &self.store,
            &index,
            &self.issues,
            &self.additions,
        )?;

        let summary = RunSummary {
            languages: self.store.len(),
            words: index.len(),
            errors: self.issues.error_count(),
            warnings: self.issues.warning_count(),
        };
        if summary.errors > 0 {
            warn!(
                "Build finished with {} errors and {} warnings ({} languages, {} words)",
                summary.errors, summary.warnings, summary.languages, summary.words
            );
        } else {
            info!(
                "Build finished: {} languages, {} words, {} warnings",
                summary.languages, summary.words, summary.warnings
            );
        }
        Ok(summary)
    }

    /// Dry run: reconcile and extract without touching the dist tree, then
    /// report the accumulated issues.
    pub fn check(mut self) -> Result<IssueLog> {
        let registry = self.load_geography()?;
        extract::extract_all(
            &self.config.data_dir,
            &mut self.store,
            &registry,
            &mut self.issues,
        );
        info!(
            "Checked {} languages: {} errors, {} warnings",
            self.store.len(),
            self.issues.error_count(),
            self.issues.warning_count()
        );
        Ok(self.issues)
    }

    fn load_geography(&mut self) -> Result<RegistryTable> {
        let registry = RegistryTable::load(&self.config.registry_path())
            .context("loading registry workbook")?;
        let features = geography::load_features(&self.config.geojson_path())
            .context("loading community geojson")?;

        let reconciled = geography::reconcile(&registry, features);
        self.store = reconciled.store;
        self.additions = reconciled.additions;
        self.issues.extend(reconciled.issues);
        Ok(registry)
    }
}
