use crate::{
    compile::{syntax, Parser, Template},
    globals::Globals,
    log::{error_serialize, Error},
    partials::Partials,
    path::PathStore,
    render::Renderer,
};

use morel::Finder;
use serde::Serialize;
use serde_json::to_value;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

/// Compiles and renders templates, and owns the compilation caches.
///
/// Compiled templates are cached by their source text, or by an explicit
/// name, and parsed path expressions are memoized, so repeated uses of
/// the same template or path skip re-parsing. Entries are immutable once
/// inserted and live until [`clear`][`Engine::clear`] is called.
pub struct Engine {
    /// Compiled [`Finder`] used to locate tag openings in source text.
    finder: Finder,
    /// Compiled templates, keyed by source text or explicit name.
    templates: RwLock<HashMap<String, Arc<Template>>>,
    /// Memoization table for path expressions.
    paths: PathStore,
}

impl Engine {
    /// Create a new [`Engine`].
    ///
    /// # Examples
    ///
    /// ```
    /// use mote::Engine;
    ///
    /// let engine = Engine::new();
    /// ```
    pub fn new() -> Self {
        Self {
            finder: Finder::new(syntax()),
            templates: RwLock::new(HashMap::new()),
            paths: PathStore::new(),
        }
    }

    /// Compile a [`Template`], or return the cached one for this source.
    ///
    /// Two calls with equal source return the same instance.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when compilation fails, which means the
    /// source contains invalid syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use mote::Engine;
    ///
    /// let engine = Engine::new();
    /// let template = engine.compile("hello, {{name}}!");
    /// assert!(template.is_ok());
    /// ```
    pub fn compile(&self, source: &str) -> Result<Arc<Template>, Error> {
        self.fetch(source, source, None)
    }

    /// Compile a [`Template`] cached under an explicit name instead of
    /// its source text.
    ///
    /// When the name is already cached the source is not consulted, so
    /// callers fetching identical content from different places may share
    /// one cache slot.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when compilation fails, which means the
    /// source contains invalid syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use mote::Engine;
    ///
    /// let engine = Engine::new();
    /// let template = engine.compile_named("greeting", "hello, {{name}}!");
    /// assert!(template.is_ok());
    /// ```
    pub fn compile_named(&self, name: &str, source: &str) -> Result<Arc<Template>, Error> {
        self.fetch(name, source, Some(name)).map_err(|error| {
            if error.get_name().is_none() {
                error.with_name(name)
            } else {
                error
            }
        })
    }

    /// Compile the source and return the instruction listing of the
    /// resulting [`Template`] as text, for tooling and debugging.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when compilation fails, which means the
    /// source contains invalid syntax.
    pub fn compile_to_text(&self, source: &str) -> Result<String, Error> {
        Ok(self.compile(source)?.to_string())
    }

    /// Render a [`Template`] with the given context data.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the data cannot be serialized, or
    /// rendering fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use mote::Engine;
    /// use serde_json::json;
    ///
    /// let engine = Engine::new();
    /// let template = engine.compile("hello, {{name}}!").unwrap();
    /// let result = engine.render(&template, json!({"name": "taylor"}));
    ///
    /// assert_eq!(result.unwrap(), "hello, taylor!");
    /// ```
    pub fn render<T>(&self, template: &Template, data: T) -> Result<String, Error>
    where
        T: Serialize,
    {
        self.render_with(template, data, &Globals::new(), &Partials::new())
    }

    /// Render a [`Template`] with the given context data, fallback
    /// storage, and partials.
    ///
    /// [`Globals`] are consulted when a single-segment path resolves to
    /// nothing in the data, and [`Partials`] supply the sub-templates
    /// that `{{>name}}` tags refer to.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the data cannot be serialized, a
    /// referenced partial is missing, or a helper fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use mote::{Engine, Globals, Partials};
    /// use serde_json::json;
    ///
    /// let engine = Engine::new();
    /// let template = engine.compile("{{>greeting}}").unwrap();
    /// let partials = Partials::new().with("greeting", "hi, {{name}}");
    /// let result = engine.render_with(
    ///     &template,
    ///     json!({"name": "taylor"}),
    ///     &Globals::new(),
    ///     &partials,
    /// );
    ///
    /// assert_eq!(result.unwrap(), "hi, taylor");
    /// ```
    pub fn render_with<T>(
        &self,
        template: &Template,
        data: T,
        globals: &Globals,
        partials: &Partials,
    ) -> Result<String, Error>
    where
        T: Serialize,
    {
        let data = to_value(data).map_err(|_| error_serialize())?;

        Renderer::new(self, template, globals, partials)
            .render(data)
            .map_err(|error| match &template.name {
                Some(name) if error.get_name().is_none() => error.with_name(name),
                _ => error,
            })
    }

    /// Remove every cached template and path.
    pub fn clear(&self) {
        self.templates
            .write()
            .expect("template cache lock should not be poisoned")
            .clear();
        self.paths.clear();
    }

    /// Return the path memoization table.
    pub(crate) fn paths(&self) -> &PathStore {
        &self.paths
    }

    /// Return the cached [`Template`] under the given key, compiling and
    /// storing it when absent.
    fn fetch(&self, key: &str, source: &str, name: Option<&str>) -> Result<Arc<Template>, Error> {
        if let Some(hit) = self
            .templates
            .read()
            .expect("template cache lock should not be poisoned")
            .get(key)
        {
            return Ok(hit.clone());
        }

        let template = Parser::new(source, &self.finder, &self.paths).compile(name)?;
        let mut cache = self
            .templates
            .write()
            .expect("template cache lock should not be poisoned");
        let entry = cache
            .entry(key.to_owned())
            .or_insert_with(|| Arc::new(template));

        Ok(entry.clone())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
