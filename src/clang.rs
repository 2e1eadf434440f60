use crate::error::{MetaError, MetaResult, JSON_UNSUPPORTED_MARKER};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Something that can dump a header's AST
#[cfg_attr(test, mockall::automock)]
pub trait AstSource {
    /// Structured `-ast-dump=json` output
    fn dump_json(&self, input: &Path) -> MetaResult<String>;
    /// Indented `-ast-dump` output
    fn dump_text(&self, input: &Path) -> MetaResult<String>;
}

/// Runs a clang binary in syntax-only mode
#[derive(Debug, Clone)]
pub struct ClangRunner {
    clang: String,
    args: Vec<String>,
}

impl ClangRunner {
    pub fn new(clang: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            clang: clang.into(),
            args,
        }
    }

    /// Full argument list for one dump.
    pub fn command_args(&self, dump_flag: &str, input: &Path) -> Vec<String> {
        let mut args: Vec<String> = ["-x", "c++", "-fsyntax-only", "-Xclang", dump_flag]
            .iter()
            .map(|s| s.to_string())
            .collect();
        args.extend(self.args.iter().cloned());
        args.push(input.display().to_string());
        args
    }

    fn run(&self, dump_flag: &str, input: &Path) -> MetaResult<std::process::Output> {
        let args = self.command_args(dump_flag, input);
        debug!(clang = %self.clang, ?args, "running clang");
        Command::new(&self.clang)
            .args(&args)
            .output()
            .map_err(|source| MetaError::ExternalTool {
                status: None,
                stderr: format!("failed to start {}: {}", self.clang, source),
            })
    }
}

impl AstSource for ClangRunner {
    fn dump_json(&self, input: &Path) -> MetaResult<String> {
        let output = self.run("-ast-dump=json", input)?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            if stderr.contains(JSON_UNSUPPORTED_MARKER) {
                return Err(MetaError::StructuredModeUnsupported);
            }
            return Err(MetaError::ExternalTool {
                status: output.status.code(),
                stderr,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn dump_text(&self, input: &Path) -> MetaResult<String> {
        let output = self.run("-ast-dump", input)?;
        if !output.status.success() {
            return Err(MetaError::ExternalTool {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
