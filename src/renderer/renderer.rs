use crate::config::RenderOptions;
use crate::parser::StructMap;
use crate::renderer::components::*;
use crate::renderer::traits::*;
use std::collections::BTreeSet;
use std::path::Path;

pub const GENERATED_NOTICE: &str = "// Generated by shm-meta. Do not edit.";

/// Renders a finished struct map as a metadata header
pub struct HeaderRenderer {
    context: RenderContext,
}

impl HeaderRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            context: RenderContext::new(options),
        }
    }

    /// Render the header written to `output` for structs declared in `input`.
    ///
    /// Output depends only on the map's contents, not its insertion order:
    /// field descriptors and struct blocks are sorted, fields inside a block
    /// keep declaration order.
    pub fn render(&self, structs: &StructMap, input: &Path, output: &Path) -> String {
        let output_dir = output.parent().unwrap_or_else(|| Path::new(""));
        let include = relative_include(input, output_dir);
        self.render_with_include(structs, &include, &include_guard(output))
    }

    pub fn render_with_include(&self, structs: &StructMap, include: &str, guard: &str) -> String {
        let options = &self.context.options;
        let mut output = String::new();

        output.push_str(&format!("#ifndef {}\n", guard));
        output.push_str(&format!("#define {}\n\n", guard));
        output.push_str(GENERATED_NOTICE);
        output.push('\n');
        output.push_str(&format!("#include \"{}\"\n", options.support_header));
        output.push_str(&format!("#include \"{}\"\n\n", include));
        output.push_str(&format!("namespace {} {{\n\n", options.namespace));

        let unique_fields: BTreeSet<&str> = structs
            .iter()
            .flat_map(|(_, fields)| fields.iter().map(String::as_str))
            .collect();
        for name in unique_fields {
            output.push_str(&FieldDescriptor { name }.render(&self.context));
        }

        for (name, fields) in structs.sorted() {
            output.push('\n');
            output.push_str(&StructMetaBlock { name, fields }.render(&self.context));
        }

        output.push_str(&format!("\n}}  // namespace {}\n\n", options.namespace));
        output.push_str("#endif\n");
        output
    }
}

impl Default for HeaderRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}
