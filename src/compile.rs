//! Compilation of template source into executable form.
//!
//! The [`Parser`] scans source text for tags, recursing into block bodies,
//! and produces a [`Template`] holding a tree of instructions. Combined
//! with context data, the template can be rendered to output text.

mod parser;
mod scope;
mod template;
mod tree;

pub use parser::Parser;
pub use scope::Scope;
pub use template::Template;
pub use tree::{Include, Inverted, Output, Param, Section, Tree};

use morel::Syntax;

/// Marker that opens a tag.
pub(crate) const OPEN: &str = "{{";
/// Marker that closes a tag.
pub(crate) const CLOSE: &str = "}}";
/// Complete tag that separates a block body from its else branch.
pub(crate) const ELSE: &str = "{{^}}";
/// Beginning of a tag that closes a block.
pub(crate) const CLOSE_BLOCK: &str = "{{/";

/// Markers that the scanner searches for in source text.
///
/// Closing markers are not searched for: everything after `{{` is read
/// one character at a time, because a `}}` inside a string literal does
/// not close the tag.
pub(crate) enum Marker {
    /// Beginning of a tag - `{{`.
    Open = 0,
}

impl From<Marker> for usize {
    fn from(marker: Marker) -> Self {
        marker as usize
    }
}

/// Return the [`Syntax`] used to locate markers in source text.
pub(crate) fn syntax() -> Syntax {
    Syntax::new(vec![(Marker::Open.into(), OPEN.into())])
}
