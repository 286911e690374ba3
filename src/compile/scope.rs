use crate::compile::Tree;

/// A distinct set of [`Tree`] instances.
///
/// Each block body compiles to its own [`Scope`], so the then and else
/// branches of a section are separate from the text surrounding it.
#[derive(Debug, Clone)]
pub struct Scope {
    pub data: Vec<Tree>,
}

impl Scope {
    /// Create a new [`Scope`].
    #[inline]
    pub fn new() -> Self {
        Self { data: vec![] }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}
