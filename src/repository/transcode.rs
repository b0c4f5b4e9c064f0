//! Media transcoding via an external tool
//!
//! One shell-out per output format. Transcodes are idempotent: an existing
//! target is left alone unless a rebuild is forced, so re-runs only pay for
//! new or changed inputs.

use crate::issue::Issue;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Default external transcoder.
pub const DEFAULT_TOOL: &str = "ffmpeg";

/// Wraps the external transcoder binary.
#[derive(Debug, Clone)]
pub struct Transcoder {
    tool: String,
    force: bool,
}

impl Transcoder {
    pub fn new(tool: impl Into<String>, force: bool) -> Self {
        Self {
            tool: tool.into(),
            force,
        }
    }

    /// Whether existing outputs are rebuilt anyway.
    pub fn force(&self) -> bool {
        self.force
    }

    /// Transcode `source` into `target`, skipping work the target already
    /// exists for. Returns an issue instead of an error: a failed transcode
    /// excludes one output file, not the run.
    pub fn transcode(&self, source: &Path, target: &Path) -> Result<(), Issue> {
        if target.exists() && !self.force {
            debug!("Target exists, skipping: {}", target.display());
            return Ok(());
        }

        info!("Transcoding {} -> {}", source.display(), target.display());
        let status = Command::new(&self.tool)
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("panic")
            .arg("-y")
            .arg("-i")
            .arg(source)
            .arg(target)
            .status();

        match status {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(Issue::error(
                "Transcode failed",
                format!(
                    "{} exited with {} transcoding '{}' to '{}'",
                    self.tool,
                    status,
                    source.display(),
                    target.display()
                ),
            )),
            Err(e) => Err(Issue::error(
                "Transcode failed",
                format!(
                    "could not run {} for '{}': {}",
                    self.tool,
                    source.display(),
                    e
                ),
            )),
        }
    }
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL, false)
    }
}
