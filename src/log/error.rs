use super::{Pointer, Visual, RED, RESET};
use crate::region::Region;
use std::fmt::{Debug, Display, Formatter, Result};

/// Describes an error, and allows adding contextual help text and a
/// visualization.
///
/// # Examples
///
/// Creating an [`Error`] that includes a [`Visual`] of type [`Pointer`]:
///
/// ```
/// use mote::helper::{Error, Region};
///
/// Error::build("mismatched close tag")
///     .with_pointer("{{#list}}item{{/item}}", Region::new(13..22))
///     .with_name("template.html")
///     .with_help("expected `{{/list}}`");
/// ```
///
/// When printed with `println!("{:#}", error)` the [`Error`] produces this
/// output:
///
/// ```text
/// error: mismatched close tag
///   --> template.html:1:14
///    |
///  1 | {{#list}}item{{/item}}
///    |              ^^^^^^^^^
///    |
///   = help: expected `{{/list}}`
/// ```
pub struct Error {
    /// Describes the cause of the [`Error`].
    reason: String,
    /// A visualization to help illustrate the [`Error`].
    visual: Option<Box<dyn Visual>>,
    /// Additional information to display with the [`Error`].
    help: Option<String>,
    /// The name of the template that the [`Error`] comes from.
    name: Option<String>,
}

impl Error {
    /// Create a new [`Error`] with the given reason text.
    ///
    /// The remaining fields may be populated with the `with_*` methods
    /// defined on `Error`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mote::helper::Error;
    ///
    /// Error::build("missing partial")
    ///     .with_help("add the partial with `Partials::insert`");
    /// ```
    pub fn build<T>(reason: T) -> Self
    where
        T: Into<String>,
    {
        Error {
            reason: reason.into(),
            name: None,
            visual: None,
            help: None,
        }
    }

    /// Set the name text, which is the name of the template that the
    /// [`Error`] is related to.
    pub fn with_name<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.name = Some(text.into());

        self
    }

    /// Set the [`Visual`], which is a visualization that helps illustrate
    /// the cause of the [`Error`].
    pub fn with_visual(mut self, visual: impl Visual + 'static) -> Self {
        self.visual = Some(Box::new(visual));

        self
    }

    /// Set the visualization to a new [`Pointer`] over the given source
    /// text and [`Region`].
    ///
    /// This is a shortcut for creating the `Pointer` yourself and passing
    /// it to `with_visual`.
    pub fn with_pointer<T>(mut self, source: &str, region: T) -> Self
    where
        T: Into<Region>,
    {
        self.visual = Some(Box::new(Pointer::new(source, region.into())));

        self
    }

    /// Set the help text, which is contextual information to accompany
    /// the reason text.
    pub fn with_help<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.help = Some(text.into());

        self
    }

    /// Return the name of the template that the [`Error`] is related to.
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Return true if a [`Visual`] is set on this [`Error`].
    pub(crate) fn has_visual(&self) -> bool {
        self.visual.is_some()
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if !f.alternate() {
            writeln!(f, "{self:#}")?;
        }
        f.debug_struct("Error")
            .field("reason", &self.reason)
            .field("name", &self.name)
            .field("visual", &self.visual)
            .field("help", &self.help)
            .finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{RED}error{RESET}: {}", self.reason)?;

        match &self.visual {
            Some(visual) if f.alternate() => {
                visual.display(f, self.name.as_deref(), self.help.as_deref())
            }
            _ => Ok(()),
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.reason == other.reason && self.help == other.help && self.name == other.name
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_display_reason() {
        let error = Error::build("missing partial");

        assert!(format!("{error}").contains("missing partial"));
    }

    #[test]
    fn test_display_visual() {
        let error = Error::build("mismatched close tag")
            .with_pointer("{{#a}}x{{/b}}", 7..13)
            .with_name("index.html")
            .with_help("expected `{{/a}}`");
        let text = format!("{error:#}");

        assert!(text.contains("index.html:1:8"));
        assert!(text.contains("^^^^^^"));
        assert!(text.contains("help: expected `{{/a}}`"));
    }
}
