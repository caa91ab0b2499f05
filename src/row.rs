//! The `Row`/`Field` implementation evaluated CSV records are exposed
//! through: raw dequoted bytes plus a memoised numeric parse.
//!
//! A field that was quoted in the source CSV is never treated as numeric,
//! regardless of its dequoted content (spec.md §6) — `"42"` stays the string
//! `42`, not the number `42`, the same distinction
//! `examples/original_source/src/app/field.cc`'s `Field::asNumber` draws on
//! the raw, still-quoted text (`*rawVal_ == '"'`).

use crate::csv::RawField;
use crate::numeric::parse_strtod;
use once_cell::unsync::OnceCell;
use rowfilter_expr::{Field, Row as RowContract};

pub struct CsvField {
    text: String,
    quoted: bool,
    number: OnceCell<Option<f64>>,
}

impl CsvField {
    pub fn new(text: String, quoted: bool) -> Self {
        Self { text, quoted, number: OnceCell::new() }
    }

    pub fn raw(&self) -> &str {
        &self.text
    }
}

impl Field for CsvField {
    fn as_string(&self) -> &[u8] {
        self.text.as_bytes()
    }

    fn as_number(&self) -> Option<f64> {
        if self.quoted {
            return None;
        }
        *self.number.get_or_init(|| parse_strtod(&self.text))
    }
}

pub struct CsvRow {
    fields: Vec<CsvField>,
}

impl CsvRow {
    pub fn new(values: Vec<RawField>) -> Self {
        Self { fields: values.into_iter().map(|f| CsvField::new(f.text, f.quoted)).collect() }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn raw(&self, index: usize) -> &str {
        self.fields[index].raw()
    }
}

impl RowContract for CsvRow {
    fn field(&self, index: usize) -> &dyn Field {
        &self.fields[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memoises_the_numeric_parse() {
        let field = CsvField::new("42".into(), false);
        assert_eq!(field.as_number(), Some(42.0));
        assert_eq!(field.as_number(), Some(42.0));
    }

    #[test]
    fn quoted_field_is_never_numeric() {
        let field = CsvField::new("42".into(), true);
        assert_eq!(field.as_number(), None);
        assert_eq!(field.as_string(), b"42");
    }
}
