//! Append-only audit log for recoverable problems
//!
//! Errors exclude the offending record, folder, or media item from the
//! output; warnings are informational. Neither aborts the run. The full log
//! is dumped to `errors.json` by the master index writer.

use serde::{Deserialize, Serialize};

/// Severity of a recorded issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Error,
    Warning,
}

/// A single recorded problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue category, e.g. "Multiple spreadsheets"
    #[serde(rename = "type")]
    pub kind: String,
    pub level: IssueLevel,
    pub msg: String,
}

impl Issue {
    pub fn error(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            level: IssueLevel::Error,
            msg: msg.into(),
        }
    }

    pub fn warning(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            level: IssueLevel::Warning,
            msg: msg.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == IssueLevel::Error
    }
}

/// Append-only collection of issues for the whole run
#[derive(Debug, Clone, Default)]
pub struct IssueLog {
    issues: Vec<Issue>,
}

impl IssueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.len() - self.error_count()
    }

    pub fn as_slice(&self) -> &[Issue] {
        &self.issues
    }
}
