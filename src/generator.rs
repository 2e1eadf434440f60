use crate::clang::{AstSource, ClangRunner};
use crate::config::{AstMode, GeneratorConfig};
use crate::error::{MetaError, MetaResult};
use crate::parser::*;
use crate::renderer::HeaderRenderer;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct Generated {
    pub output: PathBuf,
    pub mode: ExtractionMode,
    pub struct_count: usize,
    /// Skipped constructs, for the caller to report now that output exists
    pub warnings: Vec<Warning>,
}

/// Generate the metadata header described by `config`, dumping the AST with
/// the configured clang binary.
pub fn generate(config: &GeneratorConfig) -> MetaResult<Generated> {
    let runner = ClangRunner::new(config.clang.clone(), config.effective_clang_args());
    generate_with(config, &runner)
}

/// Like [`generate`], with the AST coming from `source`.
pub fn generate_with(config: &GeneratorConfig, source: &dyn AstSource) -> MetaResult<Generated> {
    let input = resolve_input(&config.input)?;
    let extraction = extract(config, &input, source)?;
    if extraction.structs.is_empty() {
        return Err(MetaError::EmptyResult {
            warnings: extraction.warnings,
        });
    }

    let output = prepare_output(&config.output)?;
    let header = HeaderRenderer::new(config.render.clone()).render(
        &extraction.structs,
        &input,
        &output,
    );
    fs::write(&output, header).map_err(|e| MetaError::io(&output, e))?;
    info!(
        output = %output.display(),
        structs = extraction.structs.len(),
        mode = %extraction.mode,
        "wrote metadata header"
    );

    Ok(Generated {
        output,
        mode: extraction.mode,
        struct_count: extraction.structs.len(),
        warnings: extraction.warnings,
    })
}

/// Extract the struct map, from a pre-dumped AST file when configured.
pub fn extract(
    config: &GeneratorConfig,
    input: &Path,
    source: &dyn AstSource,
) -> MetaResult<Extraction> {
    match &config.ast_file {
        Some(path) => {
            let dump = fs::read_to_string(path).map_err(|e| MetaError::io(path, e))?;
            extract_dump(&dump, config.mode)
        }
        None => extract_from_source(source, input, config.mode),
    }
}

/// Extract from dump text already in memory. `Auto` picks JSON when the
/// dump looks like a JSON object.
pub fn extract_dump(dump: &str, mode: AstMode) -> MetaResult<Extraction> {
    let structured = match mode {
        AstMode::Json => true,
        AstMode::Text => false,
        AstMode::Auto => dump.trim_start().starts_with('{'),
    };
    if structured {
        JsonExtractor.extract(dump)
    } else {
        TextExtractor.extract(dump)
    }
}

pub fn extract_from_source(
    source: &dyn AstSource,
    input: &Path,
    mode: AstMode,
) -> MetaResult<Extraction> {
    match mode {
        AstMode::Json => JsonExtractor.extract(&source.dump_json(input)?),
        AstMode::Text => TextExtractor.extract(&source.dump_text(input)?),
        AstMode::Auto => {
            let structured = source
                .dump_json(input)
                .and_then(|dump| JsonExtractor.extract(&dump));
            match structured {
                Err(err) if err.allows_fallback() => {
                    warn!(error = %err, "structured AST unavailable, falling back to text dump");
                    TextExtractor.extract(&source.dump_text(input)?)
                }
                other => other,
            }
        }
    }
}

fn resolve_input(input: &Path) -> MetaResult<PathBuf> {
    if input.exists() {
        fs::canonicalize(input).map_err(|e| MetaError::io(input, e))
    } else {
        std::path::absolute(input).map_err(|e| MetaError::io(input, e))
    }
}

/// Absolute output path with its parent directory created.
fn prepare_output(output: &Path) -> MetaResult<PathBuf> {
    let file_name = output.file_name().ok_or_else(|| {
        MetaError::io(
            output,
            io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"),
        )
    })?;
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| MetaError::io(&parent, e))?;
    let parent = fs::canonicalize(&parent).map_err(|e| MetaError::io(&parent, e))?;
    Ok(parent.join(file_name))
}
