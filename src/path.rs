use crate::log::{Error, INVALID_PATH};

use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
    sync::{Arc, RwLock},
};

/// A parsed path expression.
///
/// Segments are separated by `/`. Each leading `..` ascends one level up
/// the scope chain, `.` and `this` are no-ops, and every other segment
/// digs one property deeper into the current value.
///
/// `"../../alan/name"` parses to a depth of 2 and the segments
/// `["alan", "name"]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Number of scopes to ascend before digging.
    pub depth: usize,
    /// Property names applied in order from the starting point.
    pub segments: Vec<String>,
}

impl Path {
    /// Parse the given text as a [`Path`].
    ///
    /// The empty path has a depth of 0 and no segments, and resolves to
    /// the current context.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a `..` segment appears after digging has
    /// started.
    pub fn parse(text: &str) -> Result<Self, Error> {
        if text.is_empty() {
            return Ok(Self {
                depth: 0,
                segments: vec![],
            });
        }

        let mut depth = 0;
        let mut segments: Vec<String> = vec![];
        for part in text.split('/') {
            match part {
                ".." => {
                    if !segments.is_empty() {
                        return Err(Error::build(INVALID_PATH).with_help(format!(
                            "`..` must come before all other segments in `{text}`, \
                            a path cannot ascend after it digs"
                        )));
                    }
                    depth += 1;
                }
                "." | "this" => {}
                _ => segments.push(part.to_owned()),
            }
        }

        Ok(Self { depth, segments })
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for _ in 0..self.depth {
            write!(f, "../")?;
        }
        if self.depth > 0 && self.segments.is_empty() {
            return Ok(());
        }

        write!(f, "{}", self.segments.join("/"))
    }
}

/// Memoizes parsed [`Path`] instances by their literal text, so repeated
/// appearances of a path skip re-parsing.
///
/// Entries are immutable once inserted and are never evicted.
#[derive(Debug)]
pub struct PathStore {
    cache: RwLock<HashMap<String, Arc<Path>>>,
}

impl PathStore {
    /// Create a new [`PathStore`].
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Return a parsed [`Path`] for the given text, parsing and storing
    /// it when the text has not been seen before.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the text is not a valid path. Failed
    /// parses are not stored.
    pub fn parse(&self, text: &str) -> Result<Arc<Path>, Error> {
        if let Some(hit) = self
            .cache
            .read()
            .expect("path cache lock should not be poisoned")
            .get(text)
        {
            return Ok(hit.clone());
        }

        let path = Arc::new(Path::parse(text)?);
        let mut cache = self
            .cache
            .write()
            .expect("path cache lock should not be poisoned");
        let entry = cache
            .entry(text.to_owned())
            .or_insert_with(|| path.clone());

        Ok(entry.clone())
    }

    /// Remove all stored paths.
    pub fn clear(&self) {
        self.cache
            .write()
            .expect("path cache lock should not be poisoned")
            .clear();
    }
}

impl Default for PathStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Path, PathStore};

    #[test]
    fn test_parse_plain() {
        let path = Path::parse("alan/name").unwrap();

        assert_eq!(path.depth, 0);
        assert_eq!(path.segments, vec!["alan", "name"]);
    }

    #[test]
    fn test_parse_ascend() {
        let path = Path::parse("../../alan/name").unwrap();

        assert_eq!(path.depth, 2);
        assert_eq!(path.segments, vec!["alan", "name"]);
    }

    #[test]
    fn test_parse_no_op_segments() {
        let path = Path::parse("./this/name").unwrap();

        assert_eq!(path.depth, 0);
        assert_eq!(path.segments, vec!["name"]);
    }

    #[test]
    fn test_parse_empty() {
        let path = Path::parse("").unwrap();

        assert_eq!(path.depth, 0);
        assert!(path.segments.is_empty());
    }

    #[test]
    fn test_parse_ascend_after_dig() {
        assert!(Path::parse("alan/../name").is_err());
    }

    #[test]
    fn test_parse_ascend_after_no_op() {
        // `.` does not begin digging, so an ascend is still legal.
        let path = Path::parse("./../name").unwrap();

        assert_eq!(path.depth, 1);
        assert_eq!(path.segments, vec!["name"]);
    }

    #[test]
    fn test_display() {
        let path = Path::parse("../one/two").unwrap();

        assert_eq!(path.to_string(), "../one/two");
    }

    #[test]
    fn test_store_memoizes() {
        let store = PathStore::new();
        let first = store.parse("alan/name").unwrap();
        let second = store.parse("alan/name").unwrap();

        assert!(std::sync::Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_store_clear() {
        let store = PathStore::new();
        let first = store.parse("alan/name").unwrap();
        store.clear();
        let second = store.parse("alan/name").unwrap();

        assert!(!std::sync::Arc::ptr_eq(&first, &second));
    }
}
