use crate::compile::Template;

use std::{collections::HashMap, sync::Arc};

/// A named sub-template supplied to a render.
#[derive(Debug, Clone)]
pub enum Partial {
    /// Raw template source, compiled through the engine cache on first
    /// use.
    Source(String),
    /// An already-compiled template.
    Compiled(Arc<Template>),
}

/// Caller-supplied storage mapping partial names to sub-templates.
///
/// A render owns no partials of its own: the map is passed per call, and
/// referencing a name that is not present is a render error.
#[derive(Debug, Default)]
pub struct Partials {
    data: HashMap<String, Partial>,
}

impl Partials {
    /// Create a new [`Partials`].
    ///
    /// # Examples
    ///
    /// ```
    /// use mote::Partials;
    ///
    /// let partials = Partials::new();
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Insert raw template source under the given name.
    #[inline]
    pub fn insert<S, T>(&mut self, name: S, source: T)
    where
        S: Into<String>,
        T: Into<String>,
    {
        self.data.insert(name.into(), Partial::Source(source.into()));
    }

    /// Insert raw template source under the given name.
    ///
    /// Returns the `Partials`, so additional methods may be chained.
    ///
    /// # Examples
    ///
    /// ```
    /// use mote::Partials;
    ///
    /// let partials = Partials::new().with("greeting", "hi, {{name}}");
    /// ```
    #[inline]
    pub fn with<S, T>(mut self, name: S, source: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        self.insert(name, source);

        self
    }

    /// Insert a compiled template under the given name.
    #[inline]
    pub fn insert_compiled<S>(&mut self, name: S, template: Arc<Template>)
    where
        S: Into<String>,
    {
        self.data.insert(name.into(), Partial::Compiled(template));
    }

    /// Insert a compiled template under the given name.
    ///
    /// Returns the `Partials`, so additional methods may be chained.
    #[inline]
    pub fn with_compiled<S>(mut self, name: S, template: Arc<Template>) -> Self
    where
        S: Into<String>,
    {
        self.insert_compiled(name, template);

        self
    }

    /// Return the [`Partial`] stored under the given name, if any.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Partial> {
        self.data.get(name)
    }
}
