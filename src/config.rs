use std::path::PathBuf;

pub const DEFAULT_CLANG: &str = "clang";
pub const DEFAULT_SUPPORT_HEADER: &str = "shm_migrate.h";
pub const DEFAULT_NAMESPACE: &str = "shm_migrate";

/// Which AST dump the generator reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AstMode {
    /// Structured JSON first, indented text when JSON is unavailable
    #[default]
    Auto,
    Json,
    Text,
}

/// Knobs for the generated header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Header providing `StructMeta`, `TypeList` and the field macros
    pub support_header: String,
    /// Namespace the metadata specializations are emitted into
    pub namespace: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            support_header: DEFAULT_SUPPORT_HEADER.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Everything one generation run needs
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Compiler binary used to dump the AST
    pub clang: String,
    /// Extra arguments passed to clang before the input path
    pub clang_args: Vec<String>,
    pub mode: AstMode,
    /// Pre-dumped AST read instead of running clang
    pub ast_file: Option<PathBuf>,
    pub render: RenderOptions,
}

impl GeneratorConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            clang: DEFAULT_CLANG.to_string(),
            clang_args: Vec::new(),
            mode: AstMode::default(),
            ast_file: None,
            render: RenderOptions::default(),
        }
    }

    pub fn with_clang(mut self, clang: impl Into<String>) -> Self {
        self.clang = clang.into();
        self
    }

    pub fn with_clang_args(mut self, args: Vec<String>) -> Self {
        self.clang_args = args;
        self
    }

    pub fn with_mode(mut self, mode: AstMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_ast_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ast_file = Some(path.into());
        self
    }

    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Clang arguments with the input's directory on the include path.
    pub fn effective_clang_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.clang_args.len() + 1);
        if let Some(dir) = self.input.parent().filter(|d| !d.as_os_str().is_empty()) {
            args.push(format!("-I{}", dir.display()));
        }
        args.extend(self.clang_args.iter().cloned());
        args
    }
}
