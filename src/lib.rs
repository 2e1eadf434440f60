//! # shm-meta
//!
//! Reads the clang AST of a C++ header and generates a companion header with
//! `StructMeta` specializations (struct name to ordered field list) for the
//! `shm_migrate` reflection helpers.

pub mod clang;
pub mod config;
pub mod error;
pub mod generator;
pub mod parser;
pub mod renderer;

#[cfg(test)]
mod tests;

pub use clang::{AstSource, ClangRunner};
pub use config::{AstMode, GeneratorConfig, RenderOptions};
pub use error::{MetaError, MetaResult};
pub use generator::{generate, generate_with, Generated};
pub use parser::{Extraction, ExtractionMode, StructMap, Warning};
pub use renderer::HeaderRenderer;
