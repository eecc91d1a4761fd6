//! Results of a lint run.

use serde::{Deserialize, Serialize};

use crate::facts::SkippedSite;
use crate::rule::{Diagnostic, Severity};
use crate::suppress::SuppressedFinding;

/// A diagnostic attached to the source file it was reported in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub file: String,
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

impl Finding {
    /// Sort key: file, then source position.
    pub fn position_key(&self) -> (&str, usize, usize, usize) {
        let span = &self.diagnostic.span;
        (&self.file, span.start_line, span.start_col, span.start_byte)
    }
}

/// Results of running the rule over a set of facts files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintResult {
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub suppressed: Vec<SuppressedFinding>,
    /// Site records dropped as malformed
    #[serde(default)]
    pub skipped: Vec<SkippedSite>,
    /// Facts files that could not be read or parsed
    #[serde(default)]
    pub failed_files: Vec<String>,
    /// Number of facts files scanned
    pub scanned: usize,
    /// Number of construction sites handed to the evaluator
    pub sites_evaluated: usize,
}

impl LintResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: LintResult) {
        self.findings.extend(other.findings);
        self.suppressed.extend(other.suppressed);
        self.skipped.extend(other.skipped);
        self.failed_files.extend(other.failed_files);
        self.scanned += other.scanned;
        self.sites_evaluated += other.sites_evaluated;
    }

    /// Order findings by file and source position.
    pub fn sort(&mut self) {
        self.findings.sort_by(|a, b| a.position_key().cmp(&b.position_key()));
        self.suppressed
            .sort_by(|a, b| a.finding.position_key().cmp(&b.finding.position_key()));
        self.skipped
            .sort_by(|a, b| (&a.file, a.index).cmp(&(&b.file, b.index)));
        self.failed_files.sort();
    }

    /// Check if there are any error-severity findings.
    pub fn has_errors(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.diagnostic.severity == Severity::Error)
    }

    /// The run passes when no active error remains.
    pub fn passed(&self) -> bool {
        !self.has_errors()
    }
}
