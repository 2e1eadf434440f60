pub mod text;
pub mod tree;
pub mod types;

pub use text::*;
pub use tree::*;
pub use types::*;

use crate::error::{MetaError, MetaResult};
use serde::Deserialize;

/// Turns one raw AST dump into a struct map plus warnings
pub trait StructExtractor {
    fn mode(&self) -> ExtractionMode;
    fn extract(&self, dump: &str) -> MetaResult<Extraction>;
}

/// Reads clang's `-ast-dump=json` output
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExtractor;

impl JsonExtractor {
    /// Expression trees in inline bodies nest far past serde_json's default
    /// limit, so decoding grows the stack on demand instead.
    pub fn decode(dump: &str) -> MetaResult<AstNode> {
        let mut json = serde_json::Deserializer::from_str(dump);
        json.disable_recursion_limit();
        let root = AstNode::deserialize(serde_stacker::Deserializer::new(&mut json))
            .map_err(MetaError::MalformedStructuredOutput)?;
        json.end().map_err(MetaError::MalformedStructuredOutput)?;
        Ok(root)
    }
}

impl StructExtractor for JsonExtractor {
    fn mode(&self) -> ExtractionMode {
        ExtractionMode::Structured
    }

    fn extract(&self, dump: &str) -> MetaResult<Extraction> {
        let root = Self::decode(dump)?;
        let mut out = Extraction::new(self.mode());
        collect_structs(&root, &mut ScopeStack::new(), &mut out);
        Ok(out)
    }
}

/// Reads clang's plain `-ast-dump` tree text
#[derive(Debug, Default, Clone, Copy)]
pub struct TextExtractor;

impl StructExtractor for TextExtractor {
    fn mode(&self) -> ExtractionMode {
        ExtractionMode::Text
    }

    fn extract(&self, dump: &str) -> MetaResult<Extraction> {
        let mut out = Extraction::new(self.mode());
        collect_structs_text(dump, &mut out);
        Ok(out)
    }
}
