//! Mote - a minimal, logic-free template engine.
//!
//! Templates interleave literal text with tags. An expression tag such
//! as `{{name}}` renders a value from the context data, HTML-escaped; a
//! section tag pair such as `{{#items}} ... {{/items}}` renders its body
//! zero or more times depending on the value it names.
//!
//! ```
//! use mote::Engine;
//! use serde_json::json;
//!
//! let engine = Engine::new();
//! let template = engine.compile("Hello, {{name}}!").unwrap();
//! let result = engine.render(&template, json!({"name": "Ann"}));
//!
//! assert_eq!(result.unwrap(), "Hello, Ann!");
//! ```
//!
//! ## Tags
//!
//! - `{{path}}` - render the value at the path, escaped.
//! - `{{{path}}}` or `{{&path}}` - render the value unescaped.
//! - `{{#path}} ... {{^}} ... {{/path}}` - section: render the body per
//!   the value (once for `true` or a plain value, per element for an
//!   array), with an optional else branch after `{{^}}` for when the
//!   value is empty.
//! - `{{^path}} ... {{/path}}` - inverted section: render the body only
//!   when the value is empty.
//! - `{{>path}}` - render a partial from the supplied [`Partials`].
//! - `{{! ... }}` - comment, emits nothing.
//!
//! Paths dig with `/`, ascend to enclosing scopes with `..`, and treat
//! `.` and `this` as the current value. A value is empty when it is
//! missing, null, `false`, or an array with no elements.
//!
//! ## Fallback values and helpers
//!
//! A render may be given [`Globals`]: named values, pre-escaped text,
//! and [`Helper`] callables that a template can reach when a name is not
//! present in the context data. See the [`helper`] module.

mod compile;
mod context;
mod engine;
mod escape;
mod globals;
mod log;
mod partials;
mod path;
mod pipe;
mod region;
mod render;

pub mod helper;

pub use compile::Template;
pub use engine::Engine;
pub use globals::{Globals, Slot};
pub use helper::{Body, Call, Helper};
pub use log::Error;
pub use partials::{Partial, Partials};
pub use region::Region;

/// Create a new [`Engine`].
///
/// # Examples
///
/// ```
/// let engine = mote::default();
/// assert!(engine.compile("hello, {{name}}!").is_ok());
/// ```
pub fn default() -> Engine {
    Engine::new()
}
