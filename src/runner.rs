//! Runner that drives the rule over a set of facts files.
//!
//! Every object-creation and default-value site of every source unit is
//! handed to the evaluator exactly once. Units and the sites inside them are
//! evaluated in parallel; the combined result is sorted by source position
//! so output does not depend on scheduling.

use rayon::prelude::*;
use std::path::PathBuf;

use crate::facts::{self, SourceUnit};
use crate::result::{Finding, LintResult};
use crate::rule;
use crate::suppress::{filter_suppressed, load_suppressions};

/// Runs the rule against facts files.
pub struct Runner {
    use_suppressions: bool,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self {
            use_suppressions: true,
        }
    }

    /// Set whether inline suppression comments are honoured.
    pub fn use_suppressions(mut self, enabled: bool) -> Self {
        self.use_suppressions = enabled;
        self
    }

    /// Load every facts file and evaluate its sites.
    ///
    /// Files that cannot be read or parsed are reported in
    /// `failed_files` and do not stop the scan.
    pub fn run(&self, files: &[PathBuf]) -> LintResult {
        let mut result = files
            .par_iter()
            .map(|path| match facts::load_unit(path) {
                Ok(unit) => self.check_unit(unit),
                Err(e) => {
                    eprintln!("Warning: skipping facts file: {}", e);
                    LintResult {
                        failed_files: vec![path.to_string_lossy().to_string()],
                        ..Default::default()
                    }
                }
            })
            .reduce(LintResult::new, |mut acc, other| {
                acc.merge(other);
                acc
            });

        result.sort();
        result
    }

    /// Evaluate all sites of one source unit.
    pub fn check_unit(&self, unit: SourceUnit) -> LintResult {
        let findings: Vec<Finding> = unit
            .sites
            .par_iter()
            .filter_map(|site| rule::evaluate_with(&unit.types, site))
            .map(|diagnostic| Finding {
                file: unit.file.clone(),
                diagnostic,
            })
            .collect();

        let (findings, suppressed) = if self.use_suppressions && !findings.is_empty() {
            let suppressions = load_suppressions(&unit.file, &unit.source_path);
            filter_suppressed(findings, &suppressions)
        } else {
            (findings, Vec::new())
        };

        LintResult {
            findings,
            suppressed,
            skipped: unit.skipped,
            failed_files: Vec::new(),
            scanned: 1,
            sites_evaluated: unit.sites.len(),
        }
    }
}
