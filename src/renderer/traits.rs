use crate::config::RenderOptions;

/// Configuration context for rendering operations
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub depth: usize,
    pub options: RenderOptions,
}

impl RenderContext {
    pub fn new(options: RenderOptions) -> Self {
        Self { depth: 0, options }
    }

    pub fn with_depth(&self, depth: usize) -> Self {
        Self {
            depth,
            options: self.options.clone(),
        }
    }

    pub fn indent(&self) -> String {
        "    ".repeat(self.depth)
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// Core rendering trait for generated header fragments
pub trait Render {
    fn render(&self, context: &RenderContext) -> String;
}
