use crate::parser::types::*;
use tracing::debug;

/// Walk a clang JSON node tree depth-first, recording every named, complete
/// `struct` definition into `out`.
///
/// `scope` holds the enclosing namespace and record names; it is restored to
/// its original contents before this returns.
pub fn collect_structs(node: &AstNode, scope: &mut ScopeStack, out: &mut Extraction) {
    match node.kind {
        NodeKind::Namespace => {
            // Anonymous namespaces add no name segment
            let opened = open_scope(node, scope);
            visit_children(node, scope, out);
            close_scope(opened, scope);
        }
        NodeKind::Record => {
            if node.is_struct() && node.is_complete_definition() {
                record_struct(node, scope, out);
            }
            let opened = open_scope(node, scope);
            visit_children(node, scope, out);
            close_scope(opened, scope);
        }
        NodeKind::Field | NodeKind::Other => visit_children(node, scope, out),
    }
}

fn visit_children(node: &AstNode, scope: &mut ScopeStack, out: &mut Extraction) {
    for child in node.children() {
        collect_structs(child, scope, out);
    }
}

fn open_scope(node: &AstNode, scope: &mut ScopeStack) -> bool {
    match node.name() {
        Some(name) => {
            scope.open(name);
            true
        }
        None => false,
    }
}

fn close_scope(opened: bool, scope: &mut ScopeStack) {
    if opened {
        scope.pop();
    }
}

fn record_struct(node: &AstNode, scope: &ScopeStack, out: &mut Extraction) {
    let Some(name) = node.name() else {
        out.warnings.push(Warning::AnonymousRecord {
            scope: scope.path(),
        });
        return;
    };

    let full_name = scope.qualify(name);
    let mut fields = Vec::new();
    for child in node.children().iter().filter(|c| c.kind == NodeKind::Field) {
        if child.is_bitfield() {
            out.warnings.push(Warning::Bitfield {
                owner: Some(full_name.clone()),
                field: child.name().unwrap_or_default().to_string(),
            });
            continue;
        }
        // Unnamed fields are padding or anonymous members
        if let Some(field) = child.name() {
            fields.push(field);
        }
    }

    if out.structs.insert_if_absent(&full_name, fields) {
        debug!(name = %full_name, "recorded struct");
    } else {
        debug!(name = %full_name, "struct already recorded, keeping first definition");
    }
}
