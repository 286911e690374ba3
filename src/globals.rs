use crate::{
    helper::Helper,
    log::{error_serialize, Error},
};

use serde::Serialize;
use serde_json::{to_value, Value};
use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
    sync::Arc,
};

/// A value held in [`Globals`], or returned by a [`Helper`].
#[derive(Clone)]
pub enum Slot {
    /// Plain data, escaped on output like any other value.
    Value(Value),
    /// Pre-escaped text, written through the output filter unchanged.
    Safe(String),
    /// A callable invoked when a template references its name.
    Helper(Arc<dyn Helper>),
}

impl Debug for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Slot::Safe(text) => f.debug_tuple("Safe").field(text).finish(),
            Slot::Helper(_) => f.write_str("Helper(..)"),
        }
    }
}

impl From<Value> for Slot {
    fn from(value: Value) -> Self {
        Slot::Value(value)
    }
}

/// Fallback storage consulted when a single-segment path resolves to
/// nothing in the context data.
///
/// This is how helpers and shared values are exposed to a template
/// without mixing them into the primary data.
#[derive(Debug, Default)]
pub struct Globals {
    data: HashMap<String, Slot>,
}

impl Globals {
    /// Create a new [`Globals`].
    ///
    /// # Examples
    ///
    /// ```
    /// use mote::Globals;
    ///
    /// let globals = Globals::new();
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Insert the value into the [`Globals`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the serialization fails.
    pub fn insert<S, T>(&mut self, key: S, value: T) -> Result<(), Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        let serialized = to_value(value).map_err(|_| error_serialize())?;
        self.data.insert(key.into(), Slot::Value(serialized));

        Ok(())
    }

    /// Insert the value into the [`Globals`].
    ///
    /// # Panics
    ///
    /// Panics if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use mote::Globals;
    ///
    /// let mut globals = Globals::new();
    /// globals.insert_must("name", "taylor");
    /// ```
    #[inline]
    pub fn insert_must<S, T>(&mut self, key: S, value: T)
    where
        S: Into<String>,
        T: Serialize,
    {
        self.data
            .insert(key.into(), Slot::Value(to_value(value).unwrap()));
    }

    /// Insert the value into the [`Globals`].
    ///
    /// Returns the `Globals`, so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the serialization fails.
    #[inline]
    pub fn with<S, T>(mut self, key: S, value: T) -> Result<Self, Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert(key, value)?;

        Ok(self)
    }

    /// Insert the value into the [`Globals`].
    ///
    /// Returns the `Globals`, so additional methods may be chained.
    ///
    /// # Panics
    ///
    /// Panics if the serialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use mote::Globals;
    ///
    /// let globals = Globals::new().with_must("name", "taylor");
    /// ```
    #[inline]
    pub fn with_must<S, T>(mut self, key: S, value: T) -> Self
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert_must(key, value);

        self
    }

    /// Insert pre-escaped text into the [`Globals`].
    ///
    /// The output filter writes the text through unchanged, so it may
    /// carry markup.
    #[inline]
    pub fn insert_safe<S, T>(&mut self, key: S, text: T)
    where
        S: Into<String>,
        T: Into<String>,
    {
        self.data.insert(key.into(), Slot::Safe(text.into()));
    }

    /// Insert pre-escaped text into the [`Globals`].
    ///
    /// Returns the `Globals`, so additional methods may be chained.
    ///
    /// # Examples
    ///
    /// ```
    /// use mote::Globals;
    ///
    /// let globals = Globals::new().with_safe("rule", "<hr>");
    /// ```
    #[inline]
    pub fn with_safe<S, T>(mut self, key: S, text: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        self.insert_safe(key, text);

        self
    }

    /// Insert a [`Helper`] into the [`Globals`].
    pub fn insert_helper<S, T>(&mut self, key: S, helper: T)
    where
        S: Into<String>,
        T: Helper + 'static,
    {
        self.data.insert(key.into(), Slot::Helper(Arc::new(helper)));
    }

    /// Insert a [`Helper`] into the [`Globals`].
    ///
    /// Returns the `Globals`, so additional methods may be chained.
    #[inline]
    pub fn with_helper<S, T>(mut self, key: S, helper: T) -> Self
    where
        S: Into<String>,
        T: Helper + 'static,
    {
        self.insert_helper(key, helper);

        self
    }

    /// Return the [`Slot`] stored under the given key, if any.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Slot> {
        self.data.get(key)
    }
}
