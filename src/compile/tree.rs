use crate::{compile::Scope, path::Path, region::Region};

use std::{
    fmt::{Display, Formatter},
    sync::Arc,
};

/// The set of instructions a template compiles to.
#[derive(Debug, Clone)]
pub enum Tree {
    /// Literal text, emitted unchanged.
    Raw(Region),
    /// Render the value of an expression.
    Output(Output),
    /// A section, conditionally or repeatedly rendered.
    Section(Section),
    /// An inverted section, rendered when its value is empty.
    Inverted(Inverted),
    /// Render another template from the supplied partials.
    Include(Include),
}

/// A call to render the value of an expression.
#[derive(Debug, Clone)]
pub struct Output {
    /// Location of the value.
    pub path: Arc<Path>,
    /// Parameters passed when the value is a helper.
    pub params: Vec<Param>,
    /// When true, the output is HTML-escaped.
    pub escaped: bool,
    /// Location of the tag.
    pub region: Region,
}

/// A block whose body renders zero or more times, decided by the value
/// of its path.
#[derive(Debug, Clone)]
pub struct Section {
    /// Location of the value.
    pub path: Arc<Path>,
    /// Parameters passed when the value is a helper.
    pub params: Vec<Param>,
    /// Body rendered when the value is non-empty.
    pub then_branch: Scope,
    /// Body rendered when the value is empty.
    pub else_branch: Option<Scope>,
    /// Location of the opening tag.
    pub region: Region,
}

/// A block whose body renders exactly when the value of its path is
/// empty.
#[derive(Debug, Clone)]
pub struct Inverted {
    /// Location of the value.
    pub path: Arc<Path>,
    /// Body rendered when the value is empty.
    pub then_branch: Scope,
    /// Body rendered when the value is non-empty.
    pub else_branch: Option<Scope>,
    /// Location of the opening tag.
    pub region: Region,
}

/// A call to render a named template from the supplied partials.
#[derive(Debug, Clone)]
pub struct Include {
    /// Name of the partial.
    pub name: String,
    /// Location of the value rendered as the partial's context.
    ///
    /// The current context is used when no argument is given.
    pub arg: Option<Arc<Path>>,
    /// Location of the tag.
    pub region: Region,
}

/// A parameter within a tag.
#[derive(Debug, Clone)]
pub enum Param {
    /// A quoted string, used exactly as written.
    Literal(String),
    /// A path resolved against the context when the tag renders.
    Lookup(Arc<Path>),
}

impl Display for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Param::Literal(text) => write!(f, "{text:?}"),
            Param::Lookup(path) => write!(f, "`{path}`"),
        }
    }
}
