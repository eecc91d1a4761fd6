//! Inline suppression of diagnostics via comments in the analyzed source.
//!
//! Supports suppression comments like:
//! - `// afevt:ignore <rule> - <reason>`
//! - `// afevt:ignore-next-line <rule> - <reason>`
//! - `// afevt:ignore-file <rule> - <reason>`
//!
//! `<rule>` is the rule id (case-insensitive) or `*`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::result::Finding;

/// Lines at the top of a file where `ignore-file` is still honoured.
const FILE_HEADER_LINES: usize = 10;

/// How a suppression applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionType {
    /// Applies to the same line
    Line,
    /// Applies to the next line
    NextLine,
    /// Applies to the entire file
    File,
}

/// An inline suppression directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suppression {
    /// Rule to suppress or "*" for all
    pub rule: String,
    pub reason: String,
    pub file: String,
    /// Line number (0 for file-level)
    pub line: usize,
    pub suppression_type: SuppressionType,
}

/// A finding that was suppressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressedFinding {
    pub finding: Finding,
    pub suppression: Suppression,
}

lazy_static::lazy_static! {
    static ref SUPPRESSION_PATTERNS: Vec<Regex> = vec![
        // Line comment: // afevt:...
        Regex::new(r"//\s*afevt:(ignore(?:-file|-next-line)?)\s+(\S+)\s*(?:-\s*(.*))?").unwrap(),
        // Block comment: /* afevt:... */
        Regex::new(r"/\*\s*afevt:(ignore(?:-file|-next-line)?)\s+(\S+?)\s*(?:-\s*(.*?))?\s*\*/").unwrap(),
    ];
}

/// Parse suppression directives from file content.
///
/// `file` is the name findings are reported under, not necessarily a path on disk.
pub fn parse_suppressions(file: &str, content: &str) -> Vec<Suppression> {
    let mut suppressions = Vec::new();
    let mut in_header = true;

    for (line_num, line) in content.lines().enumerate() {
        let line_number = line_num + 1;
        let trimmed = line.trim();

        if in_header && !is_comment_or_empty(trimmed) {
            in_header = false;
        }

        for pattern in SUPPRESSION_PATTERNS.iter() {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            let directive = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let rule = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let reason = caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();

            let suppression_type = match directive {
                "ignore-file" => {
                    if !in_header && line_number > FILE_HEADER_LINES {
                        continue;
                    }
                    SuppressionType::File
                }
                "ignore-next-line" => SuppressionType::NextLine,
                "ignore" => {
                    // Alone on its line it covers the next line, after code it covers its own.
                    let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
                    if line[..start].trim().is_empty() {
                        SuppressionType::NextLine
                    } else {
                        SuppressionType::Line
                    }
                }
                _ => continue,
            };

            suppressions.push(Suppression {
                rule: rule.to_string(),
                reason,
                file: file.to_string(),
                line: if suppression_type == SuppressionType::File {
                    0
                } else {
                    line_number
                },
                suppression_type,
            });
            break; // Only one suppression per line
        }
    }

    suppressions
}

fn is_comment_or_empty(line: &str) -> bool {
    line.is_empty() || line.starts_with("//") || line.starts_with("/*") || line.starts_with('*')
}

/// Check if a finding matches a suppression.
pub fn matches_suppression(finding: &Finding, suppression: &Suppression) -> bool {
    if finding.file != suppression.file {
        return false;
    }

    if suppression.rule != "*" && !finding.diagnostic.rule_id.eq_ignore_ascii_case(&suppression.rule) {
        return false;
    }

    let line = finding.diagnostic.span.start_line;
    match suppression.suppression_type {
        SuppressionType::File => true,
        SuppressionType::Line => line == suppression.line,
        SuppressionType::NextLine => line == suppression.line + 1,
    }
}

/// Separate findings into active and suppressed.
pub fn filter_suppressed(
    findings: Vec<Finding>,
    suppressions: &[Suppression],
) -> (Vec<Finding>, Vec<SuppressedFinding>) {
    let mut active = Vec::new();
    let mut suppressed = Vec::new();

    for finding in findings {
        match suppressions.iter().find(|s| matches_suppression(&finding, s)) {
            Some(suppression) => {
                debug_log!(
                    "suppressed {} at {}:{} ({:?})",
                    finding.diagnostic.rule_id,
                    finding.file,
                    finding.diagnostic.span,
                    suppression.suppression_type
                );
                suppressed.push(SuppressedFinding {
                    finding,
                    suppression: suppression.clone(),
                });
            }
            None => active.push(finding),
        }
    }

    (active, suppressed)
}

/// Read suppressions for one source unit.
///
/// A missing or unreadable source file simply has no suppressions.
pub fn load_suppressions(file: &str, source_path: &Path) -> Vec<Suppression> {
    match std::fs::read_to_string(source_path) {
        Ok(content) => parse_suppressions(file, &content),
        Err(e) => {
            debug_log!("no suppressions for {} ({}): {}", file, source_path.display(), e);
            Vec::new()
        }
    }
}
