//! Configuration file for afevt.
//!
//! The configuration only controls which facts files are scanned and whether
//! inline suppressions are honoured. The rule itself is not configurable.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["afevt.yaml", ".afevt.yaml", "afevt.yml"];

/// Starter configuration written by `afevt init`.
pub const TEMPLATE: &str = include_str!("templates/afevt.yaml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    /// Glob patterns for facts files to skip (e.g. "**/generated/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Glob patterns selecting facts files when scanning a directory
    #[serde(default)]
    pub facts_globs: Vec<String>,
    /// Whether to honour inline suppression comments (default: true)
    #[serde(default)]
    pub suppressions: Option<bool>,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Returns whether suppression comments are honoured (defaults to true).
    pub fn use_suppressions(&self) -> bool {
        self.suppressions.unwrap_or(true)
    }

    /// Glob patterns for facts files, falling back to the `.facts.*` suffixes.
    pub fn facts_patterns(&self) -> Vec<String> {
        if self.facts_globs.is_empty() {
            crate::facts::FACTS_SUFFIXES
                .iter()
                .map(|s| format!("**/*{}", s))
                .collect()
        } else {
            self.facts_globs.clone()
        }
    }

    /// Compile the `facts_globs` patterns.
    pub fn facts_matcher(&self) -> anyhow::Result<GlobSet> {
        build_globset(&self.facts_patterns())
    }

    /// Compile the `excluded_paths` patterns.
    pub fn excluded_matcher(&self) -> anyhow::Result<GlobSet> {
        build_globset(&self.excluded_paths)
    }
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid glob pattern {:?}: {}", pattern, e))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Find a config file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Load the config at `path`, or discover one in `dir`, or use defaults.
///
/// Returns the config and the path it came from, if any.
pub fn load(path: Option<&Path>, dir: &Path) -> anyhow::Result<(Config, Option<PathBuf>)> {
    let path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => discover(dir),
    };

    match path {
        Some(p) => {
            debug_log!("using config {}", p.display());
            let config = Config::parse_file(&p)
                .map_err(|e| anyhow::anyhow!("parsing config {}: {}", p.display(), e))?;
            validate(&config)?;
            Ok((config, Some(p)))
        }
        None => {
            debug_log!("no config found in {}, using defaults", dir.display());
            Ok((Config::default(), None))
        }
    }
}

/// Validate a config for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if !config.version.is_empty() && config.version != "1" && config.version != "1.0" {
        anyhow::bail!("unsupported config version {:?}, expected \"1.0\"", config.version);
    }

    for pattern in &config.excluded_paths {
        Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    for pattern in &config.facts_globs {
        Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid facts_globs pattern {:?}: {}", pattern, e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
version: "1.0"
name: "Billing"
excluded_paths:
  - "**/generated/**"
suppressions: false
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "Billing");
        assert!(!config.use_suppressions());
        let excluded = config.excluded_matcher().unwrap();
        assert!(excluded.is_match("src/generated/Model.cs.facts.json"));
        assert!(!excluded.is_match("src/Model.cs.facts.json"));
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.use_suppressions());
        assert!(!config.excluded_matcher().unwrap().is_match("anything"));

        let matcher = config.facts_matcher().unwrap();
        assert!(matcher.is_match("src/Program.cs.facts.json"));
        assert!(matcher.is_match("Program.facts.yml"));
        assert!(!matcher.is_match("src/Program.cs"));
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let bad_glob = Config {
            excluded_paths: vec!["[".to_string()],
            ..Default::default()
        };
        assert!(validate(&bad_glob).is_err());

        let bad_version = Config {
            version: "2.0".to_string(),
            ..Default::default()
        };
        assert!(validate(&bad_version).is_err());
    }

    #[test]
    fn test_template_is_valid() {
        let config: Config = serde_yaml::from_str(TEMPLATE).unwrap();
        assert!(validate(&config).is_ok());
        assert!(config.use_suppressions());
    }

    #[test]
    fn test_load_discovers_or_defaults() {
        let temp = TempDir::new().unwrap();

        let (config, path) = load(None, temp.path()).unwrap();
        assert!(path.is_none());
        assert!(config.excluded_paths.is_empty());

        std::fs::write(temp.path().join(".afevt.yaml"), "name: found\n").unwrap();
        let (config, path) = load(None, temp.path()).unwrap();
        assert_eq!(config.name, "found");
        assert_eq!(path, Some(temp.path().join(".afevt.yaml")));
    }
}
