//! Source ranges and parse diagnostics shared by the lexer, expression tree,
//! and parser/engine crates.
//!
//! Mirrors the role `leo-span` plays for the Leo compiler: a small,
//! dependency-light crate that every other phase of the pipeline can see
//! without pulling in the rest of the engine.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A half-open character interval `[begin, end)` into the original
/// expression string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Range {
    pub begin: usize,
    pub end: usize,
}

impl Range {
    /// Builds a range `[begin, end)`.
    ///
    /// # Panics
    ///
    /// Panics if `begin > end` — every caller in this workspace constructs
    /// ranges from token/character offsets, where that can't happen.
    pub fn new(begin: usize, end: usize) -> Self {
        assert!(begin <= end, "range begin {begin} after end {end}");
        Self { begin, end }
    }

    /// A single-character range starting at `pos`.
    pub fn one(pos: usize) -> Self {
        Self::new(pos, pos + 1)
    }

    /// The smallest range covering both `self` and `other`.
    pub fn to(self, other: Range) -> Range {
        Range::new(self.begin.min(other.begin), self.end.max(other.end))
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.begin, self.end)
    }
}

/// A parse-time diagnostic: a message plus the one or two source ranges that
/// explain it.
///
/// `primary` is the feature principally blamed; `secondary`, when present, is
/// a related feature (typically an operand, when `primary` names an
/// operator). An "empty" `ParseError` (no primary range) is the sentinel used
/// by [`validate_types`]-style passes to mean "no error recorded yet" — every
/// empty `ParseError` compares equal to every other, since equality is
/// component-wise and both `primary` fields are `None`.
///
/// [`validate_types`]: the type-resolution contract in `rowfilter-expr`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParseError {
    message: String,
    primary: Option<Range>,
    secondary: Option<Range>,
}

impl ParseError {
    /// The empty diagnostic: no message, no ranges.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A diagnostic with a message and a single blamed range.
    pub fn new(message: impl Into<String>, primary: Range) -> Self {
        Self {
            message: message.into(),
            primary: Some(primary),
            secondary: None,
        }
    }

    /// A diagnostic with a message, a primary range, and a related
    /// secondary range.
    pub fn with_secondary(message: impl Into<String>, primary: Range, secondary: Range) -> Self {
        Self {
            message: message.into(),
            primary: Some(primary),
            secondary: Some(secondary),
        }
    }

    /// `true` for the sentinel returned by [`ParseError::empty`].
    pub fn is_empty(&self) -> bool {
        self.primary.is_none()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn primary(&self) -> Option<Range> {
        self.primary
    }

    pub fn secondary(&self) -> Option<Range> {
        self.secondary
    }

    /// Renders a `-->`/underline diagnostic against the expression text the
    /// ranges were taken from, in the style Leo's `ast::errors::Error::format`
    /// uses for compiler diagnostics.
    pub fn render(&self, source: &str) -> String {
        const INDENT: &str = "    ";

        let Some(primary) = self.primary else {
            return self.message.clone();
        };

        let begin = primary.begin.min(source.len());
        let end = primary.end.min(source.len());
        let underline: String = (0..source.len())
            .map(|i| if i >= begin && i < end.max(begin + 1) { '^' } else { ' ' })
            .collect();

        format!(
            "{INDENT}--> {begin}:{end}\n{INDENT} |\n{INDENT} | {source}\n{INDENT} | {underline}\n{INDENT} |\n{INDENT} = {msg}",
            msg = self.message,
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primary {
            Some(r) => write!(f, "{} at {}", self.message, r),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}
