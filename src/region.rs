use std::{
    cmp::{max, min},
    ops::{Index, Range},
};

/// An area within source text.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Region {
    /// First byte of the area, inclusive.
    pub begin: usize,
    /// Last byte of the area, exclusive.
    pub end: usize,
}

impl Region {
    /// Create a new [`Region`] spanning the given range.
    pub fn new(position: Range<usize>) -> Self {
        Self {
            begin: position.start,
            end: position.end,
        }
    }

    /// Merge two [`Region`] instances into one spanning both.
    pub fn combine(self, other: Self) -> Self {
        Self {
            begin: min(self.begin, other.begin),
            end: max(self.end, other.end),
        }
    }

    /// Return the literal text that this [`Region`] spans.
    ///
    /// # Panics
    ///
    /// Panics when the `Region` is out of bounds or splits a character
    /// in the given source text.
    pub fn literal<'source>(&self, source: &'source str) -> &'source str {
        source
            .get(self.begin..self.end)
            .expect("window over source should always exist")
    }
}

impl Index<Region> for str {
    type Output = str;

    fn index(&self, region: Region) -> &Self::Output {
        &self[region.begin..region.end]
    }
}

impl From<Range<usize>> for Region {
    fn from(value: Range<usize>) -> Self {
        Self {
            begin: value.start,
            end: value.end,
        }
    }
}

impl From<Region> for Range<usize> {
    fn from(value: Region) -> Self {
        value.begin..value.end
    }
}
