use crate::parser::types::*;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Tree-branch character whose count encodes nesting depth.
pub const CONNECTOR: char = '|';

const IMPLICIT_MARKER: &str = "implicit";
const BITFIELD_MARKER: &str = "bitfield";

static NAMESPACE_KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bNamespaceDecl\b.*\bnamespace\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap()
});
static NAMESPACE_TAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bNamespaceDecl\b.*\b([A-Za-z_][A-Za-z0-9_]*)\b\s*$").unwrap());
static RECORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(CXXRecordDecl|RecordDecl)\b.*\bstruct\b\s+([A-Za-z_][A-Za-z0-9_]*)\b").unwrap()
});
static FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bFieldDecl\b[^']*?\b([A-Za-z_][A-Za-z0-9_]*)\b\s*'").unwrap());

/// Nesting depth of a dump line: connectors before the first letter.
pub fn line_depth(line: &str) -> usize {
    line.chars()
        .take_while(|c| !c.is_alphabetic())
        .filter(|&c| c == CONNECTOR)
        .count()
}

/// What a single dump line declares, if anything we track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineDecl<'a> {
    Namespace(&'a str),
    Struct(&'a str),
    Field { name: &'a str, bitfield: bool },
    Ignored,
}

pub fn classify_line(line: &str) -> LineDecl<'_> {
    let namespace = NAMESPACE_KEYWORD_RE
        .captures(line)
        .or_else(|| NAMESPACE_TAIL_RE.captures(line));
    if let Some(caps) = namespace {
        if let Some(name) = caps.get(1) {
            return LineDecl::Namespace(name.as_str());
        }
    }

    // Substring check: also rejects user names containing "implicit"
    if !line.contains(IMPLICIT_MARKER) {
        if let Some(name) = RECORD_RE.captures(line).and_then(|c| c.get(2)) {
            return LineDecl::Struct(name.as_str());
        }
    }

    if let Some(name) = FIELD_RE.captures(line).and_then(|c| c.get(1)) {
        return LineDecl::Field {
            name: name.as_str(),
            bitfield: line.contains(BITFIELD_MARKER),
        };
    }

    LineDecl::Ignored
}

/// Rebuild the struct map from clang's indented `-ast-dump` text in a single
/// forward pass, using connector depth in place of real tree structure.
pub fn collect_structs_text(dump: &str, out: &mut Extraction) {
    let mut namespaces = ScopeStack::new();
    let mut records = ScopeStack::new();

    for line in dump.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let depth = line_depth(line);
        namespaces.close_at(depth);
        records.close_at(depth);

        match classify_line(line) {
            LineDecl::Namespace(name) => namespaces.push(depth, name),
            LineDecl::Struct(name) => {
                let full_name = namespaces.qualify(name);
                if out.structs.insert_if_absent(&full_name, Vec::<String>::new()) {
                    debug!(name = %full_name, depth, "recorded struct");
                }
                records.push(depth, full_name);
            }
            LineDecl::Field { name, bitfield: true } => {
                out.warnings.push(Warning::Bitfield {
                    owner: records.innermost().map(str::to_string),
                    field: name.to_string(),
                });
            }
            LineDecl::Field { name, .. } => match records.innermost() {
                Some(owner) => {
                    if out.structs.append_field(owner, name) {
                        debug!(owner, field = name, "recorded field");
                    }
                }
                None => out.warnings.push(Warning::OrphanField {
                    field: name.to_string(),
                }),
            },
            LineDecl::Ignored => {}
        }
    }
}
