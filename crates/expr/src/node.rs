use crate::{Binary, ColumnRef, Literal, Row, UnaryMinus};
use rowfilter_diagnostics::{ParseError, Range};
use rowfilter_value::{NodeType, Value};

/// The four operations every expression-tree node supports.
///
/// `Expression` (below) is the tagged sum of the five concrete node kinds;
/// each kind's own `impl` carries the type rules from the component design,
/// and `Expression`'s own impl is a plain dispatch over the variant.
pub trait Node {
    /// Post-order type resolution with a cooperative downward hint via
    /// `set_type`. Returns the subtree's resolved type, or `NodeType::Error`
    /// on failure (with `err` filled in — last writer wins).
    fn validate_types(&mut self, err: &mut ParseError) -> NodeType;

    /// Asserts a type hint from a parent node. Returns `false` and fills
    /// `err` if the hint is incompatible with what's already known about
    /// this subtree.
    fn set_type(&mut self, hint: NodeType, err: &mut ParseError) -> bool;

    /// Evaluates this node against a row, using `hint` to disambiguate
    /// context-dependent nodes (column references, still-unknown `+`).
    fn evaluate(&self, row: &dyn Row, hint: NodeType) -> Value;

    /// The source range this node was parsed from.
    fn position(&self) -> Range;

    /// `true` if, evaluated against `row`, this node can be read as a
    /// number: number literals, unary minus, arithmetic-non-plus, number-typed
    /// `+`, and column references whose current field parses as a number.
    fn can_be_number(&self, row: &dyn Row) -> bool;

    /// Structural debug rendering, used only by tests.
    fn tree_string(&self) -> String;
}

/// The expression tree: a tagged sum of the five concrete node kinds,
/// following a parent-owns-children tree (no shared ownership needed).
#[derive(Debug)]
pub enum Expression {
    Literal(Literal),
    ColumnRef(ColumnRef),
    UnaryMinus(UnaryMinus),
    Binary(Binary),
}

impl Node for Expression {
    fn validate_types(&mut self, err: &mut ParseError) -> NodeType {
        match self {
            Expression::Literal(n) => n.validate_types(err),
            Expression::ColumnRef(n) => n.validate_types(err),
            Expression::UnaryMinus(n) => n.validate_types(err),
            Expression::Binary(n) => n.validate_types(err),
        }
    }

    fn set_type(&mut self, hint: NodeType, err: &mut ParseError) -> bool {
        match self {
            Expression::Literal(n) => n.set_type(hint, err),
            Expression::ColumnRef(n) => n.set_type(hint, err),
            Expression::UnaryMinus(n) => n.set_type(hint, err),
            Expression::Binary(n) => n.set_type(hint, err),
        }
    }

    fn evaluate(&self, row: &dyn Row, hint: NodeType) -> Value {
        match self {
            Expression::Literal(n) => n.evaluate(row, hint),
            Expression::ColumnRef(n) => n.evaluate(row, hint),
            Expression::UnaryMinus(n) => n.evaluate(row, hint),
            Expression::Binary(n) => n.evaluate(row, hint),
        }
    }

    fn position(&self) -> Range {
        match self {
            Expression::Literal(n) => n.position(),
            Expression::ColumnRef(n) => n.position(),
            Expression::UnaryMinus(n) => n.position(),
            Expression::Binary(n) => n.position(),
        }
    }

    fn can_be_number(&self, row: &dyn Row) -> bool {
        match self {
            Expression::Literal(n) => n.can_be_number(row),
            Expression::ColumnRef(n) => n.can_be_number(row),
            Expression::UnaryMinus(n) => n.can_be_number(row),
            Expression::Binary(n) => n.can_be_number(row),
        }
    }

    fn tree_string(&self) -> String {
        match self {
            Expression::Literal(n) => n.tree_string(),
            Expression::ColumnRef(n) => n.tree_string(),
            Expression::UnaryMinus(n) => n.tree_string(),
            Expression::Binary(n) => n.tree_string(),
        }
    }
}

/// The shared "operand is the wrong type" message used by every node's
/// `set_type` when the requested hint can't be satisfied.
pub(crate) fn wrong_type_error(expected: NodeType, got: NodeType, range: Range) -> ParseError {
    ParseError::new(format!("Operand is the wrong type - expected a {expected}, but got a {got}"), range)
}

/// Renders a number the way the tree dump expects: no trailing `.0` on
/// whole numbers, otherwise the default float rendering.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
