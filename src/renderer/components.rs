use crate::renderer::traits::*;
use std::path::{Component, Path};

const GUARD_FILLER: char = '_';

/// Include guard for a generated header: the file name upper-cased, every
/// non-alphanumeric character replaced, plus a trailing filler.
pub fn include_guard(output: &Path) -> String {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().to_uppercase())
        .unwrap_or_default();
    let mut guard: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { GUARD_FILLER })
        .collect();
    guard.push(GUARD_FILLER);
    guard
}

/// Posix-style path from `from_dir` to `target`.
///
/// Both paths should be absolute and free of `..`. Paths with no common
/// root (different drive prefixes) yield `target` unchanged.
pub fn relative_include(target: &Path, from_dir: &Path) -> String {
    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = from_dir.components().collect();

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let shares_root = matches!(
        (target_parts.first(), base_parts.first()),
        (Some(a), Some(b)) if a == b
    );
    if !shares_root && target.is_absolute() {
        return to_posix(target);
    }

    let mut parts: Vec<String> = Vec::new();
    for part in &base_parts[common..] {
        if !matches!(part, Component::CurDir) {
            parts.push("..".to_string());
        }
    }
    for part in &target_parts[common..] {
        if let Component::Normal(name) = part {
            parts.push(name.to_string_lossy().into_owned());
        }
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

fn to_posix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// `SHM_DEFINE_FIELD(name);`
pub struct FieldDescriptor<'a> {
    pub name: &'a str,
}

impl Render for FieldDescriptor<'_> {
    fn render(&self, context: &RenderContext) -> String {
        format!("{}SHM_DEFINE_FIELD({});\n", context.indent(), self.name)
    }
}

/// `StructMeta` specialization listing a struct's fields in declaration order
pub struct StructMetaBlock<'a> {
    pub name: &'a str,
    pub fields: &'a [String],
}

impl Render for StructMetaBlock<'_> {
    fn render(&self, context: &RenderContext) -> String {
        let indent = context.indent();
        let member_indent = context.with_depth(context.depth + 1).indent();
        let field_indent = context.with_depth(context.depth + 2).indent();

        let mut output = String::new();
        output.push_str(&format!("{}template <>\n", indent));
        output.push_str(&format!("{}struct StructMeta<{}> {{\n", indent, self.name));
        output.push_str(&format!("{}using Fields = TypeList<\n", member_indent));
        for (i, field) in self.fields.iter().enumerate() {
            let suffix = if i + 1 < self.fields.len() { "," } else { "" };
            output.push_str(&format!(
                "{}SHM_FIELD({}, {}){}\n",
                field_indent, self.name, field, suffix
            ));
        }
        output.push_str(&format!("{}>;\n", member_indent));
        output.push_str(&format!("{}}};\n", indent));
        output
    }
}
