//! Contains the [`Helper`] trait, and types useful for creating and using
//! helpers.
//!
//! A `Helper` is a user-defined callable that a template can invoke by
//! name. Any struct that implements the [`Helper`] trait, or function
//! matching the [`apply`][`Helper::apply`] method, can be stored in
//! [`Globals`][`crate::Globals`] and passed to a render.
//!
//! When a tag's path resolves to a helper, the helper runs with the
//! current context value and the tag's evaluated parameters. Quoted
//! parameters arrive as literal strings, unquoted parameters are resolved
//! as paths against the active scope. The returned [`Slot`] decides what
//! is written: plain data passes through the output filter, while
//! [`Slot::Safe`] text bypasses escaping.
//!
//! A helper invoked by a section tag additionally receives the compiled
//! block bodies. The helper decides whether, and how many times, to
//! render them:
//!
//! ```
//! use mote::{
//!     helper::{serde::json, Call, Error, Slot},
//!     Globals, Partials,
//! };
//!
//! fn twice(call: &Call<'_>) -> Result<Slot, Error> {
//!     let body = call
//!         .body()
//!         .ok_or_else(|| Error::build("helper `twice` requires a block"))?;
//!     let first = body.render(call.value())?;
//!     let second = body.render(call.value())?;
//!
//!     Ok(Slot::Safe(format!("{first}{second}")))
//! }
//!
//! let engine = mote::default();
//! let template = engine.compile("{{#twice}}{{name}}!{{/twice}}").unwrap();
//! let globals = Globals::new().with_helper("twice", twice);
//! let result = engine
//!     .render_with(&template, json!({"name": "ann"}), &globals, &Partials::new())
//!     .unwrap();
//!
//! assert_eq!(result, "ann!ann!");
//! ```
//!
//! An expression helper receives no bodies, and its output is filtered
//! with the tag's escape flag:
//!
//! ```
//! use mote::{
//!     helper::{
//!         serde::{json, Value},
//!         Call, Error, Slot,
//!     },
//!     Globals, Partials,
//! };
//!
//! fn to_lowercase(call: &Call<'_>) -> Result<Slot, Error> {
//!     match call.arguments().first() {
//!         Some(Value::String(string)) => Ok(Slot::Value(json!(string.to_lowercase()))),
//!         _ => Err(Error::build("helper `to_lowercase` requires string input")
//!             .with_help("use quotes to pass a literal string")),
//!     }
//! }
//!
//! let engine = mote::default();
//! let template = engine.compile("{{to_lowercase name}}").unwrap();
//! let globals = Globals::new().with_helper("to_lowercase", to_lowercase);
//! let result = engine
//!     .render_with(&template, json!({"name": "TAYLOR"}), &globals, &Partials::new())
//!     .unwrap();
//!
//! assert_eq!(result, "taylor");
//! ```
//!
//! A helper [`Error`] without a visualization of its own is shown with a
//! pointer to the tag that invoked the helper.

pub mod serde {
    //! Contains types from `serde_json`.
    pub use serde_json::*;
}
pub mod visual {
    //! Contains the `Visual` trait and types that implement `Visual`.
    pub use crate::log::{Pointer, Visual};
}

pub use crate::{globals::Slot, log::Error, region::Region};

use crate::{
    compile::Scope,
    context::{Context, Parents},
    pipe::Pipe,
    render::Renderer,
};

use serde_json::Value;

/// Describes a type that a template can invoke by name.
pub trait Helper: Sync + Send {
    /// Execute the helper and return a new [`Slot`] as output.
    fn apply(&self, call: &Call<'_>) -> Result<Slot, Error>;
}

/// Allows assignment of any function matching the signature of `apply`
/// as a [`Helper`], instead of requiring a struct be created.
impl<F> Helper for F
where
    F: Fn(&Call<'_>) -> Result<Slot, Error> + Sync + Send,
{
    fn apply(&self, call: &Call<'_>) -> Result<Slot, Error> {
        self(call)
    }
}

/// Everything a [`Helper`] receives when it is invoked.
pub struct Call<'call> {
    pub(crate) renderer: &'call Renderer<'call>,
    pub(crate) context: &'call Context<'call>,
    pub(crate) chain: Option<&'call Parents<'call, 'call>>,
    pub(crate) arguments: Vec<Value>,
    pub(crate) body: Option<Body<'call>>,
    pub(crate) inverse: Option<Body<'call>>,
}

impl<'call> Call<'call> {
    /// Return the context value at the tag that invoked the helper.
    ///
    /// Null when the tag rendered with no data.
    pub fn value(&self) -> &Value {
        self.context.data().unwrap_or(&Value::Null)
    }

    /// Return the evaluated parameters of the tag.
    ///
    /// Quoted parameters are literal strings; the rest are resolved
    /// lookups, null when nothing was found.
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Return the path expression that produced the current context.
    ///
    /// Empty at the root of a render.
    pub fn origin(&self) -> &str {
        self.context.origin()
    }

    /// Resolve a path expression against the context and scope chain at
    /// the tag that invoked the helper.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the text is not a valid path.
    pub fn get(&self, path: &str) -> Result<Option<Value>, Error> {
        let parsed = self.renderer.engine.paths().parse(path)?;

        Ok(self.context.resolve(&parsed, self.chain).into_data())
    }

    /// Return the compiled block body, if the tag has one.
    pub fn body(&self) -> Option<&Body<'call>> {
        self.body.as_ref()
    }

    /// Return the compiled else branch, if the tag has one.
    pub fn inverse(&self) -> Option<&Body<'call>> {
        self.inverse.as_ref()
    }
}

/// A compiled block body that a [`Helper`] may render any number of
/// times.
pub struct Body<'call> {
    pub(crate) renderer: &'call Renderer<'call>,
    pub(crate) scope: &'call Scope,
    pub(crate) chain: Option<&'call Parents<'call, 'call>>,
}

impl Body<'_> {
    /// Render the body with the given value as its context data and
    /// return the output.
    ///
    /// The scope chain at the invoking tag is extended with the enclosing
    /// context, so paths inside the body may ascend with `..`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when rendering the body fails.
    pub fn render(&self, data: &Value) -> Result<String, Error> {
        let context = Context::new(Some(data.clone()), self.renderer.globals);
        let mut buffer = String::new();
        let mut pipe = Pipe::new(&mut buffer);
        self.renderer
            .render_scope(self.scope, &context, self.chain, &mut pipe)?;

        Ok(buffer)
    }
}
