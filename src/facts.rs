//! Facts files: the host input boundary.
//!
//! afevt does not parse source code. An external frontend walks each
//! compiled source unit and writes one facts document listing every
//! object-creation and default-value expression it found, together with the
//! resolved types those expressions reference. This module reads those
//! documents (JSON or YAML) and turns them into [`ConstructionSite`]s plus a
//! [`TypeTable`] resolver.
//!
//! Site records are converted one at a time. A malformed record is skipped
//! and reported as a [`SkippedSite`]; it never aborts the rest of the file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::rule::{
    ConstructionSite, DefaultValueSite, ObjectCreationSite, ResolvedType, SiteKind, Span,
    TypeKind, TypeRef, TypeResolver,
};

/// File name suffixes recognised as facts documents.
pub const FACTS_SUFFIXES: &[&str] = &[".facts.json", ".facts.yaml", ".facts.yml"];

/// Why a single site record could not be turned into a [`ConstructionSite`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactsError {
    #[error("site has no kind")]
    MissingKind,
    #[error("unknown site kind {0:?}")]
    UnknownKind(String),
    #[error("{0} site has no type reference")]
    MissingTypeRef(SiteKind),
    #[error("{0} site has no span")]
    MissingSpan(SiteKind),
    #[error("{kind} site has a malformed span ({span:?})")]
    InvalidSpan { kind: SiteKind, span: Span },
    #[error("default_value site cannot carry constructor arguments")]
    ArgumentsOnDefaultValue,
    #[error("malformed site record: {0}")]
    Malformed(String),
}

/// One facts document as written by the frontend.
///
/// Records are kept as untyped values until [`FactsDocument::into_unit`]
/// converts them one by one, so a badly typed record only loses itself.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FactsDocument {
    /// Source file the facts were extracted from.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub sites: Vec<serde_json::Value>,
    #[serde(default)]
    pub types: Vec<serde_json::Value>,
}

/// A construction site record before validation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSite {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub type_ref: Option<String>,
    /// Absent: no argument list. Present: number of arguments in the list.
    #[serde(default)]
    pub arguments: Option<usize>,
    #[serde(default)]
    pub initializer: bool,
    #[serde(default)]
    pub span: Option<Span>,
}

impl RawSite {
    /// Validate the record and build the site it describes.
    pub fn to_site(&self) -> Result<ConstructionSite, FactsError> {
        let kind_name = self.kind.as_deref().ok_or(FactsError::MissingKind)?;
        let kind = SiteKind::parse(kind_name)
            .ok_or_else(|| FactsError::UnknownKind(kind_name.to_string()))?;

        let type_ref = match self.type_ref.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => TypeRef::new(t),
            _ => return Err(FactsError::MissingTypeRef(kind)),
        };

        let span = self.span.clone().ok_or(FactsError::MissingSpan(kind))?;
        if !span.is_well_formed() {
            return Err(FactsError::InvalidSpan { kind, span });
        }

        match kind {
            SiteKind::ObjectCreation => Ok(ConstructionSite::ObjectCreation(ObjectCreationSite {
                span,
                type_ref,
                arguments: self.arguments,
                has_initializer: self.initializer,
            })),
            SiteKind::DefaultValue => {
                if self.arguments.is_some() {
                    return Err(FactsError::ArgumentsOnDefaultValue);
                }
                Ok(ConstructionSite::DefaultValue(DefaultValueSite { span, type_ref }))
            }
        }
    }
}

/// A resolved type record.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TypeFact {
    /// The type reference spelling this entry resolves.
    pub type_ref: String,
    /// "struct", "class", or anything else.
    pub kind: String,
    #[serde(default)]
    pub namespace: String,
    /// Display name. Defaults to the last segment of `type_ref`.
    #[serde(default)]
    pub name: String,
    /// Declared constructors, including the implicit one.
    #[serde(default)]
    pub constructors: usize,
}

impl TypeFact {
    pub fn to_resolved(&self) -> ResolvedType {
        let name = if self.name.is_empty() {
            TypeRef::new(self.type_ref.as_str()).simple_name().to_string()
        } else {
            self.name.clone()
        };
        ResolvedType::new(
            TypeKind::parse(&self.kind),
            self.namespace.clone(),
            name,
            self.constructors,
        )
    }
}

/// Resolver backed by the `types` table of one facts document.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: HashMap<TypeRef, ResolvedType>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_ref: TypeRef, resolved: ResolvedType) {
        self.types.insert(type_ref, resolved);
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<TypeFact> for TypeTable {
    fn from_iter<I: IntoIterator<Item = TypeFact>>(iter: I) -> Self {
        let mut table = TypeTable::new();
        for fact in iter {
            table.insert(TypeRef::new(fact.type_ref.as_str()), fact.to_resolved());
        }
        table
    }
}

impl TypeResolver for TypeTable {
    fn resolve(&self, type_ref: &TypeRef) -> Option<ResolvedType> {
        self.types.get(type_ref).cloned()
    }
}

/// A site record that was dropped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSite {
    pub file: String,
    /// Position of the record in the document's `sites` list.
    pub index: usize,
    pub reason: String,
}

/// A validated source unit, ready for evaluation.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Source file as reported in diagnostics.
    pub file: String,
    /// Where the source file is expected on disk.
    pub source_path: PathBuf,
    pub sites: Vec<ConstructionSite>,
    pub types: TypeTable,
    pub skipped: Vec<SkippedSite>,
}

impl FactsDocument {
    /// Parse a facts document, choosing JSON or YAML by extension.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
        Self::parse_str(&content, is_json(path))
            .map_err(|e| anyhow::anyhow!("parsing {}: {}", path.display(), e))
    }

    /// Parse a facts document from a string.
    pub fn parse_str(content: &str, json: bool) -> anyhow::Result<Self> {
        let doc = if json {
            serde_json::from_str(content)?
        } else {
            serde_yaml::from_str(content)?
        };
        Ok(doc)
    }

    /// Validate every site record and build the type table.
    ///
    /// `facts_path` is used to locate the source file when `file` is
    /// relative or missing.
    pub fn into_unit(self, facts_path: &Path) -> SourceUnit {
        let file = self
            .file
            .clone()
            .unwrap_or_else(|| default_source_name(facts_path));
        let source_path = resolve_source_path(facts_path, &file);

        let mut sites = Vec::with_capacity(self.sites.len());
        let mut skipped = Vec::new();
        for (index, value) in self.sites.into_iter().enumerate() {
            let site = serde_json::from_value::<RawSite>(value)
                .map_err(|e| FactsError::Malformed(e.to_string()))
                .and_then(|raw| raw.to_site());
            match site {
                Ok(site) => sites.push(site),
                Err(e) => {
                    debug_log!("skipping site #{} in {}: {}", index, file, e);
                    skipped.push(SkippedSite {
                        file: file.clone(),
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let types: TypeTable = self
            .types
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<TypeFact>(value) {
                Ok(fact) => Some(fact),
                Err(e) => {
                    debug_log!("skipping type #{} in {}: {}", index, file, e);
                    None
                }
            })
            .collect();

        SourceUnit {
            file,
            source_path,
            sites,
            types,
            skipped,
        }
    }
}

/// Load and validate one facts file.
pub fn load_unit<P: AsRef<Path>>(path: P) -> anyhow::Result<SourceUnit> {
    let path = path.as_ref();
    let doc = FactsDocument::parse_file(path)?;
    let unit = doc.into_unit(path);
    debug_log!(
        "loaded {}: {} sites, {} types, {} skipped",
        path.display(),
        unit.sites.len(),
        unit.types.len(),
        unit.skipped.len()
    );
    Ok(unit)
}

/// Whether `path` names a facts document.
pub fn is_facts_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    FACTS_SUFFIXES.iter().any(|s| name.ends_with(s))
}

fn is_json(path: &Path) -> bool {
    path.extension().map(|e| e == "json").unwrap_or(false)
}

/// `Program.cs.facts.json` -> `Program.cs`.
fn default_source_name(facts_path: &Path) -> String {
    let name = facts_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    for suffix in FACTS_SUFFIXES {
        if let Some(stem) = name.strip_suffix(suffix) {
            return stem.to_string();
        }
    }

    facts_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or(name)
}

fn resolve_source_path(facts_path: &Path, file: &str) -> PathBuf {
    let file_path = Path::new(file);
    if file_path.is_absolute() {
        return file_path.to_path_buf();
    }
    match facts_path.parent() {
        Some(dir) => dir.join(file_path),
        None => file_path.to_path_buf(),
    }
}
