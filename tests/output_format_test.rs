//! Tests for the JSON and SARIF output formats.

use std::path::PathBuf;

use afevt::report;
use afevt::Runner;

fn scenarios_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("scenarios")
}

fn run_all() -> afevt::LintResult {
    let root = scenarios_path();
    let files = afevt::cli::collect_files(&root, &afevt::Config::default())
        .expect("should collect fixtures");
    Runner::new().run(&files)
}

#[test]
fn test_json_output_structure() {
    let result = run_all();
    let text = report::render_json("testdata/scenarios", None, &result).expect("should render");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");

    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(value["passed"], false);
    assert_eq!(value["files_scanned"], 10);
    assert_eq!(value["sites_evaluated"], 14);
    assert_eq!(value["suppressed_count"], 1);
    assert_eq!(value["skipped_sites"], 1);

    let diagnostics = value["diagnostics"].as_array().expect("diagnostics array");
    assert_eq!(diagnostics.len(), 6);

    let first = &diagnostics[0];
    for key in ["rule", "severity", "file", "line", "column", "end_line", "end_column", "message"] {
        assert!(first.get(key).is_some(), "missing key {}", key);
    }
    assert_eq!(first["rule"], "Afevt");
    assert_eq!(first["severity"], "error");
    assert_eq!(first["file"], "DefaultValue.cs");

    let suppressed = value["suppressed"].as_array().expect("suppressed array");
    assert_eq!(suppressed[0]["suppression"]["type"], "next-line");
}

#[test]
fn test_json_output_for_clean_run() {
    let result = Runner::new().run(&[scenarios_path().join("EmptyStruct.cs.facts.json")]);
    let text = report::render_json("EmptyStruct.cs.facts.json", Some("afevt.yaml"), &result)
        .expect("should render");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");

    assert_eq!(value["passed"], true);
    assert_eq!(value["config"], "afevt.yaml");
    assert_eq!(value["diagnostics"].as_array().map(|a| a.len()), Some(0));
    assert!(value.get("suppressed").is_none());
}

#[test]
fn test_sarif_output_structure() {
    let result = run_all();
    let text = report::render_sarif(&scenarios_path(), &result).expect("should render");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");

    assert_eq!(value["version"], "2.1.0");
    assert!(value["$schema"].as_str().unwrap().contains("sarif-schema-2.1.0"));

    let run = &value["runs"][0];
    assert_eq!(run["tool"]["driver"]["name"], "afevt");

    let rule = &run["tool"]["driver"]["rules"][0];
    assert_eq!(rule["id"], "Afevt");
    assert_eq!(rule["name"], "AvoidDefaultConstructor");
    assert_eq!(rule["defaultConfiguration"]["level"], "error");
    assert_eq!(rule["properties"]["category"], "Struct");

    let results = run["results"].as_array().expect("results array");
    assert_eq!(results.len(), 6);

    let struct_result = results
        .iter()
        .find(|r| {
            r["locations"][0]["physicalLocation"]["artifactLocation"]["uri"] == "StructWithCtor.cs"
        })
        .expect("StructWithCtor result");
    assert_eq!(struct_result["ruleId"], "Afevt");
    assert_eq!(struct_result["level"], "error");

    let region = &struct_result["locations"][0]["physicalLocation"]["region"];
    assert_eq!(region["startLine"], 15);
    assert_eq!(region["startColumn"], 25);
    assert_eq!(region["endColumn"], 41);
    assert_eq!(region["byteOffset"], 309);
    assert_eq!(region["byteLength"], 16);
    assert!(region.get("charOffset").is_none());
}
