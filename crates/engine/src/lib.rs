//! The parser/engine: runs the lexer, the shunting-yard parse loop, and the
//! post-parse type-resolution pass, and exposes `evaluate` against rows.
//!
//! Grounded on `leo-parser`'s own parser/context split (tokens consumed
//! eagerly, a context object driving the grammar) and on
//! `leo-passes::type_checker`'s downward-hint type-checking visitor.

mod parser;

use rowfilter_diagnostics::ParseError;
use rowfilter_expr::{Expression, Headers, Node, Row};
use rowfilter_lexer::Lexer;
use rowfilter_value::{NodeType, Value};

/// A parsed, type-resolved filter expression, ready to be evaluated against
/// any number of rows.
///
/// Construction can fail at three stages — lexing, parsing, or type
/// resolution — and `Engine` doesn't distinguish between them to callers:
/// `ok()`/`error()` report whichever failed first.
pub struct Engine {
    ok: bool,
    error: ParseError,
    root: Option<Expression>,
}

impl Engine {
    /// Lexes and parses `expression` against `headers`, then runs type
    /// resolution on the resulting tree. Construction never panics; failures
    /// are reported through `ok`/`error`.
    pub fn new(expression: &str, headers: &dyn Headers) -> Self {
        tracing::debug!(expression, "constructing filter expression");

        let mut lexer = Lexer::new(expression);
        if !lexer.ok() {
            let error = lexer.error();
            tracing::debug!(message = error.message(), "lexer failed");
            return Self { ok: false, error, root: None };
        }

        let mut root = match parser::parse(&mut lexer, headers) {
            Ok(root) => root,
            Err(error) => {
                tracing::debug!(message = error.message(), "parse failed");
                return Self { ok: false, error, root: None };
            }
        };

        let mut err = ParseError::empty();
        if root.validate_types(&mut err) == NodeType::Error {
            tracing::debug!(message = err.message(), "type resolution failed");
            return Self { ok: false, error: err, root: None };
        }

        Self { ok: true, error: ParseError::empty(), root: Some(root) }
    }

    pub fn ok(&self) -> bool {
        self.ok
    }

    pub fn error(&self) -> ParseError {
        self.error.clone()
    }

    /// Evaluates the expression against `row` with an `Unknown` hint at the
    /// root, matching §4.6's construction contract.
    ///
    /// # Panics
    /// Panics if construction failed — check `ok()` first.
    pub fn evaluate(&self, row: &dyn Row) -> Value {
        self.root.as_ref().expect("evaluate called on a filter expression that failed to construct").evaluate(row, NodeType::Unknown)
    }

    /// Debug-only structural dump of the tree. Format is otherwise
    /// implementation-defined, but the leaf and binary-operator renderings
    /// are asserted on by tests, so don't casually change them.
    ///
    /// # Panics
    /// Panics if construction failed.
    pub fn tree_string(&self) -> String {
        self.root.as_ref().expect("tree_string called on a filter expression that failed to construct").tree_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowfilter_expr::Field;
    use std::collections::HashMap;

    struct TestHeaders(HashMap<String, usize>);
    impl Headers for TestHeaders {
        fn index_of(&self, name: &str) -> Option<usize> {
            self.0.get(name).copied()
        }
    }

    fn headers(names: &[&str]) -> TestHeaders {
        TestHeaders(names.iter().enumerate().map(|(i, n)| (n.to_string(), i)).collect())
    }

    struct TestField(String);
    impl Field for TestField {
        fn as_string(&self) -> &[u8] {
            self.0.as_bytes()
        }
        fn as_number(&self) -> Option<f64> {
            strtod_like(&self.0)
        }
    }

    fn strtod_like(s: &str) -> Option<f64> {
        let trimmed = s.trim_start();
        if trimmed.starts_with('"') {
            return None;
        }
        let mut end = trimmed.len();
        while end > 0 && trimmed.as_bytes()[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        trimmed[..end].parse::<f64>().ok()
    }

    struct TestRow(Vec<TestField>);
    impl Row for TestRow {
        fn field(&self, index: usize) -> &dyn Field {
            &self.0[index]
        }
    }

    fn row(values: &[&str]) -> TestRow {
        TestRow(values.iter().map(|v| TestField(v.to_string())).collect())
    }

    #[test]
    fn scenario_1_plain_identifier() {
        let h = headers(&["token"]);
        let e = Engine::new("token", &h);
        assert!(e.ok(), "{:?}", e.error());
        assert_eq!(e.tree_string(), "token~0:unknown");
        assert_eq!(e.evaluate(&row(&["value"])).as_string(), b"value");
    }

    #[test]
    fn scenario_2_arithmetic_tree() {
        let h = headers(&["a"]);
        let e = Engine::new("1-2+3", &h);
        assert!(e.ok(), "{:?}", e.error());
        assert_eq!(e.tree_string(), "(+ (- 1:number 2:number):number 3:number):number");
        assert_eq!(e.evaluate(&row(&["x"])).as_number(), 2.0);
    }

    #[test]
    fn scenario_3_plus_with_column_and_fallback() {
        let h = headers(&["a"]);
        let e = Engine::new("a + 10", &h);
        assert!(e.ok(), "{:?}", e.error());
        assert_eq!(e.evaluate(&row(&["20"])).as_number(), 30.0);
        let err_value = e.evaluate(&row(&["abc"]));
        assert_eq!(err_value.as_error(), "Left hand side of operator at 2: expected number, got string");
    }

    #[test]
    fn scenario_4_plus_type_mismatch() {
        let h = headers(&["a"]);
        let e = Engine::new("\"a\" + 1", &h);
        assert!(!e.ok());
        let err = e.error();
        assert_eq!(err.message(), "The + operator expects its arguments to be the same type, got a string and a number");
        assert_eq!(err.primary(), Some(rowfilter_diagnostics::Range::new(4, 5)));
        assert_eq!(err.secondary(), Some(rowfilter_diagnostics::Range::new(0, 7)));
    }

    #[test]
    fn scenario_5_short_circuit_and() {
        let h = headers(&["a"]);
        let e = Engine::new("8 < 2 && a < 4", &h);
        assert!(e.ok(), "{:?}", e.error());
        let v = e.evaluate(&row(&["notused"]));
        assert_eq!(v.as_boolean(), false);
    }

    #[test]
    fn scenario_6_unmatched_bracket() {
        let h = headers(&["a"]);
        let e = Engine::new("(1 + 2", &h);
        assert!(!e.ok());
        let err = e.error();
        assert_eq!(err.message(), "Unmatched bracket");
        assert_eq!(err.primary(), Some(rowfilter_diagnostics::Range::new(0, 1)));
    }

    #[test]
    fn unknown_identifier_is_a_parse_error() {
        let h = headers(&["a"]);
        let e = Engine::new("b", &h);
        assert!(!e.ok());
        assert_eq!(e.error().message(), "Identifier \"b\" not found in headers");
    }

    #[test]
    fn end_is_idempotent_through_repeated_parse_failures_path() {
        let h = headers(&["a"]);
        let e = Engine::new("", &h);
        assert!(!e.ok());
        assert_eq!(e.error().message(), "Unexpected end of expression");
    }

    #[test]
    fn division_by_zero_is_not_an_error() {
        let h = headers(&["a"]);
        let e = Engine::new("1 / 0", &h);
        assert!(e.ok(), "{:?}", e.error());
        assert!(e.evaluate(&row(&["x"])).as_number().is_infinite());
    }
}
