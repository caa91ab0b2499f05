//! The external collaborator contracts the expression tree is evaluated
//! against: a header lookup and a row of fields. Neither trait says anything
//! about how headers or rows are produced — that's `rowfilter-cli`'s job.

/// Resolves an identifier (an original header name or a synthesised alias)
/// to a zero-based column index.
pub trait Headers {
    fn index_of(&self, name: &str) -> Option<usize>;
}

/// One field of a parsed row.
pub trait Field {
    /// The dequoted raw bytes of the field.
    fn as_string(&self) -> &[u8];

    /// Parses the field as a number, `strtod`-style (leading whitespace and
    /// `0x` hex accepted; no trailing non-whitespace). Implementations are
    /// expected to memoise this.
    fn as_number(&self) -> Option<f64>;
}

/// A parsed data row. Column indices passed to `field` are always valid for
/// rows this trait is implemented over — callers verify field count against
/// the header list before evaluating any expression.
pub trait Row {
    fn field(&self, index: usize) -> &dyn Field;
}
