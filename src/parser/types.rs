use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Separator used when qualifying names with their enclosing scopes.
pub const SCOPE_SEPARATOR: &str = "::";

/// Declaration categories the extractors care about
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeKind {
    Namespace,
    Record,
    Field,
    /// Anything else; visited as a plain container
    #[default]
    Other,
}

impl From<&str> for NodeKind {
    fn from(kind: &str) -> Self {
        match kind {
            "NamespaceDecl" => NodeKind::Namespace,
            "RecordDecl" | "CXXRecordDecl" => NodeKind::Record,
            "FieldDecl" => NodeKind::Field,
            _ => NodeKind::Other,
        }
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let kind = String::deserialize(deserializer)?;
        Ok(NodeKind::from(kind.as_str()))
    }
}

// One node of clang's `-ast-dump=json` output. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AstNode {
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub name: Option<String>,
    /// `struct`, `class` or `union`
    #[serde(default)]
    pub tag_used: Option<String>,
    #[serde(default)]
    pub is_struct: Option<bool>,
    #[serde(default)]
    pub complete_definition: Option<bool>,
    #[serde(default)]
    pub is_complete_definition: Option<bool>,
    #[serde(default)]
    pub is_bitfield: Option<bool>,
    #[serde(default)]
    pub inner: Option<Vec<AstNode>>,
}

impl AstNode {
    pub fn children(&self) -> &[AstNode] {
        self.inner.as_deref().unwrap_or(&[])
    }

    /// Name, treating an empty string like a missing one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn is_struct(&self) -> bool {
        self.tag_used.as_deref() == Some("struct") || self.is_struct == Some(true)
    }

    pub fn is_complete_definition(&self) -> bool {
        self.complete_definition == Some(true) || self.is_complete_definition == Some(true)
    }

    pub fn is_bitfield(&self) -> bool {
        self.is_bitfield == Some(true)
    }
}

/// Open namespaces and records, outermost first, each tagged with the
/// nesting depth that opened it.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    entries: Vec<(usize, String)>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, depth: usize, name: impl Into<String>) {
        self.entries.push((depth, name.into()));
    }

    /// Open a scope one level inside the innermost. For walkers that close
    /// with `pop` rather than `close_at`.
    pub fn open(&mut self, name: impl Into<String>) {
        let depth = self.entries.last().map_or(0, |(open, _)| open + 1);
        self.push(depth, name);
    }

    pub fn pop(&mut self) -> Option<(usize, String)> {
        self.entries.pop()
    }

    /// Drop every scope opened at `depth` or deeper.
    pub fn close_at(&mut self, depth: usize) {
        while matches!(self.entries.last(), Some((open, _)) if *open >= depth) {
            self.entries.pop();
        }
    }

    pub fn innermost(&self) -> Option<&str> {
        self.entries.last().map(|(_, name)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `name` prefixed with every open scope.
    pub fn qualify(&self, name: &str) -> String {
        let mut parts: Vec<&str> = self.entries.iter().map(|(_, n)| n.as_str()).collect();
        parts.push(name);
        parts.join(SCOPE_SEPARATOR)
    }

    /// Open scopes joined, or `None` at global scope.
    pub fn path(&self) -> Option<String> {
        if self.entries.is_empty() {
            None
        } else {
            Some(
                self.entries
                    .iter()
                    .map(|(_, n)| n.as_str())
                    .collect::<Vec<_>>()
                    .join(SCOPE_SEPARATOR),
            )
        }
    }
}

/// Fully-qualified struct name to field names in declaration order.
///
/// Keys are only ever inserted once; a later definition with the same name
/// is ignored. Field names are unique within a struct, first one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructMap {
    entries: IndexMap<String, Vec<String>>,
}

impl StructMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a struct unless one with this name is already known.
    /// Returns whether the entry was added.
    pub fn insert_if_absent<I, S>(&mut self, name: &str, fields: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.entries.contains_key(name) {
            return false;
        }
        let mut unique: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !unique.contains(&field) {
                unique.push(field);
            }
        }
        self.entries.insert(name.to_string(), unique);
        true
    }

    /// Append a field to an existing struct, ignoring repeats.
    /// Returns false when the struct is unknown or already has the field.
    pub fn append_field(&mut self, owner: &str, field: &str) -> bool {
        match self.entries.get_mut(owner) {
            Some(fields) if !fields.iter().any(|f| f == field) => {
                fields.push(field.to_string());
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn fields(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, fields)| (name.as_str(), fields.as_slice()))
    }

    /// Entries ordered by struct name.
    pub fn sorted(&self) -> Vec<(&str, &[String])> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// A construct that was skipped rather than recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    Bitfield {
        owner: Option<String>,
        field: String,
    },
    OrphanField {
        field: String,
    },
    AnonymousRecord {
        scope: Option<String>,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Bitfield {
                owner: Some(owner),
                field,
            } => write!(f, "skip bitfield {}{}{}", owner, SCOPE_SEPARATOR, field),
            Warning::Bitfield { owner: None, field } => write!(f, "skip bitfield {}", field),
            Warning::OrphanField { field } => write!(f, "skip field without owner {}", field),
            Warning::AnonymousRecord { scope: Some(scope) } => {
                write!(f, "skip anonymous struct in {}", scope)
            }
            Warning::AnonymousRecord { scope: None } => {
                write!(f, "skip anonymous struct in global scope")
            }
        }
    }
}

/// Which extractor produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    Structured,
    Text,
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMode::Structured => write!(f, "json"),
            ExtractionMode::Text => write!(f, "text"),
        }
    }
}

/// Result of one extraction run
#[derive(Debug, Clone)]
pub struct Extraction {
    pub mode: ExtractionMode,
    pub structs: StructMap,
    pub warnings: Vec<Warning>,
}

impl Extraction {
    pub fn new(mode: ExtractionMode) -> Self {
        Self {
            mode,
            structs: StructMap::new(),
            warnings: Vec::new(),
        }
    }
}
