use crate::parser::Warning;
use std::path::PathBuf;
use thiserror::Error;

/// Marker clang prints when it predates `-ast-dump=json`.
pub const JSON_UNSUPPORTED_MARKER: &str = "unknown argument: '-ast-dump=json'";

/// Errors that can end a generation run
#[derive(Error, Debug)]
pub enum MetaError {
    /// The AST-producing compiler exited abnormally
    #[error("clang failed (status {status:?}): {stderr}")]
    ExternalTool { status: Option<i32>, stderr: String },

    /// The compiler does not know the JSON dump flag
    #[error("clang does not support -ast-dump=json")]
    StructuredModeUnsupported,

    /// JSON dump did not decode as a node tree
    #[error("failed to parse clang ast json: {0}")]
    MalformedStructuredOutput(#[source] serde_json::Error),

    /// Nothing to generate; carries the warnings that may explain why
    #[error("no structs found in input header")]
    EmptyResult { warnings: Vec<Warning> },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MetaError {
    /// Whether the structured extractor should give way to the text one.
    pub fn allows_fallback(&self) -> bool {
        matches!(
            self,
            MetaError::StructuredModeUnsupported | MetaError::MalformedStructuredOutput(_)
        )
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            MetaError::ExternalTool {
                status: Some(code), ..
            } if (1..=255).contains(code) => *code as u8,
            MetaError::EmptyResult { .. } => 2,
            _ => 1,
        }
    }

    /// Warnings collected before the run failed.
    pub fn warnings(&self) -> &[Warning] {
        match self {
            MetaError::EmptyResult { warnings } => warnings,
            _ => &[],
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MetaError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for generator operations
pub type MetaResult<T> = Result<T, MetaError>;
