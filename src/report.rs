//! Output formatting for afevt results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration
//!
//! Each format has a `render_*` function returning the text and a `write_*`
//! wrapper printing it to stdout.

use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

use crate::result::{Finding, LintResult};
use crate::rule::{RuleDescriptor, Severity, AFEVT};
use crate::suppress::{SuppressedFinding, SuppressionType};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pretty,
    Json,
    Sarif,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Format::Pretty),
            "json" => Ok(Format::Json),
            "sarif" => Ok(Format::Sarif),
            _ => Err(format!(
                "invalid format {:?}, must be 'pretty', 'json', or 'sarif'",
                s
            )),
        }
    }
}

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    pub passed: bool,
    pub files_scanned: usize,
    pub sites_evaluated: usize,
    pub diagnostics: Vec<JsonDiagnostic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<JsonSuppressedDiagnostic>,
    pub suppressed_count: usize,
    pub skipped_sites: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_files: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub rule: String,
    pub severity: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct JsonSuppressedDiagnostic {
    pub diagnostic: JsonDiagnostic,
    pub suppression: JsonSuppression,
}

#[derive(Serialize, Deserialize)]
pub struct JsonSuppression {
    pub rule: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    pub line: usize,
    #[serde(rename = "type")]
    pub suppression_type: String,
}

/// Build the JSON report structure.
pub fn json_report(path: &str, config_path: Option<&str>, result: &LintResult) -> JsonReport {
    let suppressed = result
        .suppressed
        .iter()
        .map(|sf| JsonSuppressedDiagnostic {
            diagnostic: finding_to_json(&sf.finding),
            suppression: JsonSuppression {
                rule: sf.suppression.rule.clone(),
                reason: sf.suppression.reason.clone(),
                line: sf.suppression.line,
                suppression_type: suppression_type_name(sf.suppression.suppression_type)
                    .to_string(),
            },
        })
        .collect();

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        config: config_path.map(str::to_string),
        passed: result.passed(),
        files_scanned: result.scanned,
        sites_evaluated: result.sites_evaluated,
        diagnostics: result.findings.iter().map(finding_to_json).collect(),
        suppressed,
        suppressed_count: result.suppressed.len(),
        skipped_sites: result.skipped.len(),
        failed_files: result.failed_files.clone(),
    }
}

pub fn render_json(path: &str, config_path: Option<&str>, result: &LintResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&json_report(path, config_path, result))?)
}

/// Write results in JSON format.
pub fn write_json(path: &str, config_path: Option<&str>, result: &LintResult) -> anyhow::Result<()> {
    println!("{}", render_json(path, config_path, result)?);
    Ok(())
}

fn finding_to_json(f: &Finding) -> JsonDiagnostic {
    let span = &f.diagnostic.span;
    JsonDiagnostic {
        rule: f.diagnostic.rule_id.clone(),
        severity: f.diagnostic.severity.to_string(),
        file: f.file.clone(),
        line: span.start_line,
        column: span.start_col,
        end_line: span.end_line,
        end_column: span.end_col,
        message: f.diagnostic.message.clone(),
    }
}

fn suppression_type_name(t: SuppressionType) -> &'static str {
    match t {
        SuppressionType::Line => "line",
        SuppressionType::NextLine => "next-line",
        SuppressionType::File => "file",
    }
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "afevt";

#[derive(Serialize, Deserialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
    #[serde(rename = "fullDescription")]
    pub full_description: SarifMessage,
    #[serde(rename = "messageStrings")]
    pub message_strings: SarifMessageStrings,
    #[serde(rename = "defaultConfiguration")]
    pub default_config: SarifRuleConfig,
    pub properties: SarifRuleProperties,
}

#[derive(Serialize, Deserialize)]
pub struct SarifMessageStrings {
    pub default: SarifMessage,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRuleConfig {
    pub enabled: bool,
    pub level: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRuleProperties {
    pub category: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifact,
    pub region: SarifRegion,
}

#[derive(Serialize, Deserialize)]
pub struct SarifArtifact {
    pub uri: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRegion {
    #[serde(rename = "startLine")]
    pub start_line: usize,
    #[serde(rename = "startColumn")]
    pub start_column: usize,
    #[serde(rename = "endLine")]
    pub end_line: usize,
    #[serde(rename = "endColumn")]
    pub end_column: usize,
    /// Spans are byte ranges, so offsets go out as bytes, not characters.
    #[serde(rename = "byteOffset")]
    pub byte_offset: usize,
    #[serde(rename = "byteLength")]
    pub byte_length: usize,
}

fn map_severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
    }
}

fn sarif_rule(descriptor: &RuleDescriptor) -> SarifRule {
    SarifRule {
        id: descriptor.id.to_string(),
        name: pascal_case(descriptor.title),
        short_description: SarifMessage {
            text: descriptor.title.to_string(),
        },
        full_description: SarifMessage {
            text: descriptor.description.to_string(),
        },
        message_strings: SarifMessageStrings {
            default: SarifMessage {
                text: descriptor.message_format.to_string(),
            },
        },
        default_config: SarifRuleConfig {
            enabled: descriptor.enabled_by_default,
            level: map_severity_to_level(descriptor.severity).to_string(),
        },
        properties: SarifRuleProperties {
            category: descriptor.category.to_string(),
        },
    }
}

/// "Avoid default constructor" -> "AvoidDefaultConstructor".
fn pascal_case(title: &str) -> String {
    title
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Make `file_path` relative to `base_path` with forward slashes.
fn make_relative_path(file_path: &str, base_path: &Path) -> String {
    if base_path.as_os_str().is_empty() {
        return file_path.replace('\\', "/");
    }

    Path::new(file_path)
        .strip_prefix(base_path)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file_path.replace('\\', "/"))
}

/// Build the SARIF report structure.
pub fn sarif_report(base_path: &Path, result: &LintResult) -> SarifReport {
    let results = result
        .findings
        .iter()
        .map(|f| {
            let span = &f.diagnostic.span;
            SarifResult {
                rule_id: f.diagnostic.rule_id.clone(),
                level: map_severity_to_level(f.diagnostic.severity).to_string(),
                message: SarifMessage {
                    text: f.diagnostic.message.clone(),
                },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifact {
                            uri: make_relative_path(&f.file, base_path),
                        },
                        region: SarifRegion {
                            start_line: span.start_line,
                            start_column: span.start_col,
                            end_line: span.end_line,
                            end_column: span.end_col,
                            byte_offset: span.start_byte,
                            byte_length: span.end_byte.saturating_sub(span.start_byte),
                        },
                    },
                }],
            }
        })
        .collect();

    SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules: vec![sarif_rule(&AFEVT)],
                },
            },
            results,
        }],
    }
}

pub fn render_sarif(base_path: &Path, result: &LintResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&sarif_report(base_path, result))?)
}

/// Write results in SARIF format.
pub fn write_sarif(base_path: &Path, result: &LintResult) -> anyhow::Result<()> {
    println!("{}", render_sarif(base_path, result)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Render results in pretty (human-readable) format.
pub fn render_pretty(
    path: &str,
    config_path: Option<&str>,
    result: &LintResult,
    show_suppressed: bool,
) -> String {
    let mut out = String::new();

    // Header
    let _ = writeln!(out);
    let _ = writeln!(out, "  {} v{}", "afevt".cyan().bold(), env!("CARGO_PKG_VERSION"));
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}{}", "Scanning: ".dimmed(), path);
    let _ = writeln!(
        out,
        "  {}{}",
        "Config:   ".dimmed(),
        config_path.unwrap_or("(defaults)")
    );
    let _ = writeln!(out);

    write_result_summary(&mut out, result);
    let _ = writeln!(out);

    if !result.findings.is_empty() {
        write_findings(&mut out, &result.findings);
    }

    if !result.suppressed.is_empty() {
        write_suppressed_summary(&mut out, &result.suppressed, show_suppressed);
        let _ = writeln!(out);
    }

    if !result.skipped.is_empty() || !result.failed_files.is_empty() {
        write_input_problems(&mut out, result);
        let _ = writeln!(out);
    }

    write_final_status(&mut out, result);
    out
}

/// Write results in pretty (human-readable) format.
pub fn write_pretty(path: &str, config_path: Option<&str>, result: &LintResult, show_suppressed: bool) {
    print!("{}", render_pretty(path, config_path, result, show_suppressed));
}

fn write_result_summary(out: &mut String, result: &LintResult) {
    let status = if result.passed() {
        "✓ PASS".green()
    } else {
        "✗ FAIL".red()
    };
    let _ = write!(
        out,
        "  {}  {} files, {} sites, {} diagnostics",
        status,
        result.scanned,
        result.sites_evaluated,
        result.findings.len()
    );
    if !result.suppressed.is_empty() {
        let _ = write!(
            out,
            "  {}",
            format!("({} suppressed)", result.suppressed.len()).dimmed()
        );
    }
    let _ = writeln!(out);
}

fn write_findings(out: &mut String, findings: &[Finding]) {
    let _ = writeln!(out, "  {} ({}):", "Diagnostics".bold(), findings.len());
    let _ = writeln!(out);

    for f in findings {
        let _ = writeln!(
            out,
            "    {}   {:<8}{}{}",
            severity_tag(f.diagnostic.severity),
            f.diagnostic.rule_id.dimmed(),
            f.file.blue(),
            format!(":{}", f.diagnostic.span).dimmed()
        );
        let _ = writeln!(out, "            {}", f.diagnostic.message);
        let _ = writeln!(out);
    }
}

fn severity_tag(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "ERROR".red(),
    }
}

fn write_suppressed_summary(out: &mut String, suppressed: &[SuppressedFinding], show_details: bool) {
    let _ = writeln!(out, "  {} ({}):", "Suppressed".dimmed(), suppressed.len());

    if !show_details {
        let _ = writeln!(out, "    {}", "(use --show-suppressed to see details)".dimmed());
        return;
    }

    let _ = writeln!(out);
    for sf in suppressed {
        let f = &sf.finding;
        let s = &sf.suppression;

        let location = if s.suppression_type == SuppressionType::File {
            ":* (file)".to_string()
        } else {
            format!(":{}", f.diagnostic.span)
        };
        let _ = writeln!(
            out,
            "    {:<8}{}{}",
            f.diagnostic.rule_id.dimmed(),
            f.file.blue(),
            location.dimmed()
        );

        if !s.reason.is_empty() {
            let _ = writeln!(out, "            {}", format!("reason: {:?}", s.reason).dimmed());
        }
    }
}

fn write_input_problems(out: &mut String, result: &LintResult) {
    let _ = writeln!(out, "  {}:", "Input problems".yellow());
    for file in &result.failed_files {
        let _ = writeln!(out, "    unreadable facts file {}", file);
    }
    for skipped in &result.skipped {
        let _ = writeln!(
            out,
            "    {} site #{} skipped: {}",
            skipped.file, skipped.index, skipped.reason
        );
    }
}

fn write_final_status(out: &mut String, result: &LintResult) {
    if result.passed() {
        let _ = writeln!(out, "  {}", "PASSED".green());
    } else {
        let _ = writeln!(out, "  {}", "FAILED".red());
    }
    let _ = writeln!(out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::SkippedSite;
    use crate::rule::{Diagnostic, Span};
    use crate::suppress::Suppression;

    fn sample_result() -> LintResult {
        LintResult {
            findings: vec![Finding {
                file: "/repo/src/Program.cs".to_string(),
                diagnostic: Diagnostic::new(&AFEVT, Span::new(300, 316, 15, 25, 15, 41), "ValueTypeA"),
            }],
            suppressed: vec![SuppressedFinding {
                finding: Finding {
                    file: "/repo/src/Program.cs".to_string(),
                    diagnostic: Diagnostic::new(&AFEVT, Span::new(400, 416, 20, 9, 20, 25), "ValueTypeA"),
                },
                suppression: Suppression {
                    rule: "Afevt".to_string(),
                    reason: "interop".to_string(),
                    file: "/repo/src/Program.cs".to_string(),
                    line: 19,
                    suppression_type: SuppressionType::NextLine,
                },
            }],
            skipped: vec![SkippedSite {
                file: "/repo/src/Program.cs".to_string(),
                index: 3,
                reason: "site has no kind".to_string(),
            }],
            failed_files: vec![],
            scanned: 1,
            sites_evaluated: 5,
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<Format>(), Ok(Format::Json));
        assert_eq!("sarif".parse::<Format>(), Ok(Format::Sarif));
        assert!("xml".parse::<Format>().is_err());
    }

    #[test]
    fn test_json_report() {
        let report = json_report("/repo", Some("afevt.yaml"), &sample_result());
        assert!(!report.passed);
        assert_eq!(report.diagnostics.len(), 1);
        let d = &report.diagnostics[0];
        assert_eq!(d.rule, "Afevt");
        assert_eq!(d.severity, "error");
        assert_eq!((d.line, d.column, d.end_line, d.end_column), (15, 25, 15, 41));
        assert_eq!(report.suppressed_count, 1);
        assert_eq!(report.suppressed[0].suppression.suppression_type, "next-line");
        assert_eq!(report.skipped_sites, 1);

        let text = render_json("/repo", None, &sample_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value.get("config").is_none());
        assert!(value.get("failed_files").is_none());
    }

    #[test]
    fn test_sarif_report() {
        let report = sarif_report(Path::new("/repo"), &sample_result());
        assert_eq!(report.version, "2.1.0");
        let run = &report.runs[0];
        assert_eq!(run.tool.driver.rules.len(), 1);
        assert_eq!(run.tool.driver.rules[0].id, "Afevt");
        assert_eq!(run.tool.driver.rules[0].default_config.level, "error");
        assert_eq!(run.results.len(), 1);

        let location = &run.results[0].locations[0].physical_location;
        assert_eq!(location.artifact_location.uri, "src/Program.cs");
        assert_eq!(location.region.start_line, 15);
        assert_eq!(location.region.start_column, 25);
        assert_eq!(location.region.byte_offset, 300);
        assert_eq!(location.region.byte_length, 16);
    }

    #[test]
    fn test_render_pretty() {
        colored::control::set_override(false);
        let text = render_pretty("/repo", None, &sample_result(), true);
        assert!(text.contains("FAIL"));
        assert!(text.contains("/repo/src/Program.cs:15:25"));
        assert!(text.contains("ValueTypeA has others constructors"));
        assert!(text.contains("reason: \"interop\""));
        assert!(text.contains("site #3 skipped"));
        assert!(text.contains("(defaults)"));
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("Avoid default constructor"), "AvoidDefaultConstructor");
        assert_eq!(pascal_case(""), "");
    }

    #[test]
    fn test_make_relative_path() {
        assert_eq!(make_relative_path("/repo/a/B.cs", Path::new("/repo")), "a/B.cs");
        assert_eq!(make_relative_path("other/B.cs", Path::new("/repo")), "other/B.cs");
        assert_eq!(make_relative_path("a\\B.cs", Path::new("")), "a/B.cs");
    }
}
