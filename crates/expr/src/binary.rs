use crate::node::Node;
use crate::{Expression, Row};
use rowfilter_diagnostics::{ParseError, Range};
use rowfilter_value::{NodeType, Value};
use std::cmp::Ordering;
use std::fmt;

/// The twelve binary operators, grouped into the four families that §4.4
/// describes: arithmetic-non-plus, logical, comparison, and plus (which
/// gets a family of its own because its result type depends on its
/// operands).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Minus,
    Times,
    Divide,
    And,
    Or,
    Lt,
    Lte,
    Eq,
    Neq,
    Gt,
    Gte,
    Plus,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Divide => "/",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Plus => "+",
        }
    }

    fn is_arithmetic_non_plus(self) -> bool {
        matches!(self, BinaryOp::Minus | BinaryOp::Times | BinaryOp::Divide)
    }

    fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    fn is_comparison(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Eq | BinaryOp::Neq | BinaryOp::Gt | BinaryOp::Gte)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A binary operator node. One struct covers all four operator families;
/// `calculated_type` is only ever meaningful for `Plus` (it caches the
/// agreed-upon operand type once type resolution has settled it, and stays
/// `Unknown` when resolution defers the decision to each row).
#[derive(Debug)]
pub struct Binary {
    op: BinaryOp,
    op_range: Range,
    lhs: Box<Expression>,
    rhs: Box<Expression>,
    calculated_type: NodeType,
}

impl Binary {
    pub fn new(op: BinaryOp, op_range: Range, lhs: Box<Expression>, rhs: Box<Expression>) -> Self {
        Self { op, op_range, lhs, rhs, calculated_type: NodeType::Unknown }
    }

    fn validate_arithmetic_non_plus(&mut self, err: &mut ParseError) -> NodeType {
        for operand in [&mut self.lhs, &mut self.rhs] {
            let t = operand.validate_types(err);
            if t == NodeType::Error {
                return NodeType::Error;
            }
            if t == NodeType::Unknown {
                if !operand.set_type(NodeType::Number, err) {
                    return NodeType::Error;
                }
            } else if t != NodeType::Number {
                *err = ParseError::new(format!("Cannot coerce expression into a {t}"), operand.position());
                return NodeType::Error;
            }
        }
        NodeType::Number
    }

    fn validate_logical(&mut self, err: &mut ParseError) -> NodeType {
        for operand in [&mut self.lhs, &mut self.rhs] {
            let t = operand.validate_types(err);
            if t == NodeType::Error {
                return NodeType::Error;
            }
            if t != NodeType::Bool {
                *err = ParseError::with_secondary(
                    format!("The arguments to '{}' must be boolean, not {t}", self.op),
                    self.op_range,
                    operand.position(),
                );
                return NodeType::Error;
            }
        }
        NodeType::Bool
    }

    /// Shared by comparison and plus: both operands must be `String`,
    /// `Number`, or `Unknown` — `invalid_operand` reports the first operand
    /// that is anything else (notably `Bool`, which nested comparisons can
    /// produce, e.g. `a < b == c < d`), checked before operand agreement so a
    /// boolean operand is never allowed to reach evaluation as if it were a
    /// string or number. An `Unknown` operand takes the other side's
    /// concrete type; two concrete, unequal operands are an error. Returns
    /// the agreed-upon type, which is `Unknown` only if both operands are.
    fn validate_operand_agreement(
        &mut self,
        err: &mut ParseError,
        invalid_operand: impl Fn(NodeType, Range) -> ParseError,
        mismatch: impl FnOnce(NodeType, NodeType) -> ParseError,
    ) -> NodeType {
        let lhs_t = self.lhs.validate_types(err);
        if lhs_t == NodeType::Error {
            return NodeType::Error;
        }
        let rhs_t = self.rhs.validate_types(err);
        if rhs_t == NodeType::Error {
            return NodeType::Error;
        }

        let is_string_or_number_or_unknown = |t: NodeType| matches!(t, NodeType::Unknown | NodeType::String | NodeType::Number);
        if !is_string_or_number_or_unknown(lhs_t) {
            *err = invalid_operand(lhs_t, self.lhs.position());
            return NodeType::Error;
        }
        if !is_string_or_number_or_unknown(rhs_t) {
            *err = invalid_operand(rhs_t, self.rhs.position());
            return NodeType::Error;
        }

        match (lhs_t, rhs_t) {
            (NodeType::Unknown, NodeType::Unknown) => NodeType::Unknown,
            (NodeType::Unknown, concrete) => {
                if !self.lhs.set_type(concrete, err) {
                    return NodeType::Error;
                }
                concrete
            }
            (concrete, NodeType::Unknown) => {
                if !self.rhs.set_type(concrete, err) {
                    return NodeType::Error;
                }
                concrete
            }
            (l, r) if l != r => {
                *err = mismatch(l, r);
                return NodeType::Error;
            }
            (l, _) => l,
        }
    }

    fn validate_comparison(&mut self, err: &mut ParseError) -> NodeType {
        let op = self.op;
        let op_range = self.op_range;
        let agreed = self.validate_operand_agreement(
            err,
            |t, pos| ParseError::with_secondary(format!("The arguments to '{op}' must be strings or numbers, not {t}"), op_range, pos),
            |l, r| ParseError::new(format!("'{op}' expects arguments of the same type (got a {l} and a {r})"), op_range),
        );
        if agreed == NodeType::Error {
            NodeType::Error
        } else {
            NodeType::Bool
        }
    }

    fn validate_plus(&mut self, err: &mut ParseError) -> NodeType {
        let op_range = self.op_range;
        let lhs_pos = self.lhs.position();
        let rhs_pos = self.rhs.position();
        let agreed = self.validate_operand_agreement(
            err,
            |t, pos| ParseError::with_secondary(format!("The + operator expects its arguments to be strings or numbers, not {t}"), op_range, pos),
            |l, r| {
                ParseError::with_secondary(
                    format!("The + operator expects its arguments to be the same type, got a {l} and a {r}"),
                    op_range,
                    lhs_pos.to(rhs_pos),
                )
            },
        );
        self.calculated_type = agreed;
        agreed
    }

    fn evaluate_numeric(&self, row: &dyn Row) -> Value {
        let lhs = self.lhs.evaluate(row, NodeType::Number);
        if lhs.is_error() {
            return lhs;
        }
        let rhs = self.rhs.evaluate(row, NodeType::Number);
        if rhs.is_error() {
            return rhs;
        }
        if lhs.node_type() != NodeType::Number {
            return Value::error(format!(
                "Left hand side of operator at {}: expected number, got {}",
                self.op_range.begin,
                lhs.node_type()
            ));
        }
        if rhs.node_type() != NodeType::Number {
            return Value::error(format!(
                "Right hand side of operator at {}: expected number, got {}",
                self.op_range.begin,
                rhs.node_type()
            ));
        }
        let (l, r) = (lhs.as_number(), rhs.as_number());
        let result = match self.op {
            BinaryOp::Minus => l - r,
            BinaryOp::Times => l * r,
            BinaryOp::Divide => l / r,
            BinaryOp::Plus => l + r,
            _ => unreachable!("evaluate_numeric is only called for +, -, *, /"),
        };
        Value::number(result)
    }

    /// Like `Literal`, a string-typed operand can still come back from
    /// `evaluate` holding a `Number` (a `Plus`/comparison sibling that
    /// resolved its own type independently, e.g. a `Number` literal asked
    /// to evaluate under a `String` hint it ignores). Mirrors the explicit
    /// `l->type() != Variant::STRING` guard in
    /// `examples/original_source/src/app/filterExpression/binaryOperator.cc`'s
    /// `evalComparisonString`/`evalPlusString`: a graceful error, not a tag
    /// mismatch panic on `as_string`.
    fn expect_string(value: Value, side: &str, op_range: Range) -> Result<Value, Value> {
        if value.node_type() == NodeType::String {
            Ok(value)
        } else {
            Err(Value::error(format!("{side} hand side of operator at {}: expected string, got {}", op_range.begin, value.node_type())))
        }
    }

    fn evaluate_string_concat(&self, row: &dyn Row) -> Value {
        let lhs = self.lhs.evaluate(row, NodeType::String);
        if lhs.is_error() {
            return lhs;
        }
        let rhs = self.rhs.evaluate(row, NodeType::String);
        if rhs.is_error() {
            return rhs;
        }
        let lhs = match Self::expect_string(lhs, "Left", self.op_range) {
            Ok(v) => v,
            Err(e) => return e,
        };
        let rhs = match Self::expect_string(rhs, "Right", self.op_range) {
            Ok(v) => v,
            Err(e) => return e,
        };
        let mut bytes = lhs.as_string().to_vec();
        bytes.extend_from_slice(rhs.as_string());
        Value::string(bytes)
    }

    fn evaluate_comparison(&self, row: &dyn Row) -> Value {
        let both_numeric = self.lhs.can_be_number(row) && self.rhs.can_be_number(row);
        let hint = if both_numeric { NodeType::Number } else { NodeType::String };

        let lhs = self.lhs.evaluate(row, hint);
        if lhs.is_error() {
            return lhs;
        }
        let rhs = self.rhs.evaluate(row, hint);
        if rhs.is_error() {
            return rhs;
        }

        let ord = if both_numeric {
            lhs.as_number().partial_cmp(&rhs.as_number())
        } else {
            let lhs = match Self::expect_string(lhs, "Left", self.op_range) {
                Ok(v) => v,
                Err(e) => return e,
            };
            let rhs = match Self::expect_string(rhs, "Right", self.op_range) {
                Ok(v) => v,
                Err(e) => return e,
            };
            Some(lhs.as_string().cmp(rhs.as_string()))
        };

        let result = match ord {
            Some(ord) => match self.op {
                BinaryOp::Lt => ord == Ordering::Less,
                BinaryOp::Lte => ord != Ordering::Greater,
                BinaryOp::Gt => ord == Ordering::Greater,
                BinaryOp::Gte => ord != Ordering::Less,
                BinaryOp::Eq => ord == Ordering::Equal,
                BinaryOp::Neq => ord != Ordering::Equal,
                _ => unreachable!("evaluate_comparison is only called for comparison operators"),
            },
            // NaN: IEEE-754 semantics, every ordered comparison is false, != is true.
            None => matches!(self.op, BinaryOp::Neq),
        };
        Value::boolean(result)
    }

    fn evaluate_logical(&self, row: &dyn Row) -> Value {
        let lhs = self.lhs.evaluate(row, NodeType::Bool);
        if lhs.is_error() {
            return lhs;
        }
        if lhs.node_type() != NodeType::Bool {
            return Value::error(format!("The arguments to '{}' must be boolean, not {}", self.op, lhs.node_type()));
        }
        let lhs_b = lhs.as_boolean();
        let short_circuits = if self.op == BinaryOp::And { !lhs_b } else { lhs_b };
        if short_circuits {
            return lhs;
        }

        let rhs = self.rhs.evaluate(row, NodeType::Bool);
        if rhs.is_error() {
            return rhs;
        }
        if rhs.node_type() != NodeType::Bool {
            return Value::error(format!("The arguments to '{}' must be boolean, not {}", self.op, rhs.node_type()));
        }
        rhs
    }

    fn evaluate_plus(&self, row: &dyn Row, hint: NodeType) -> Value {
        let effective = match self.calculated_type {
            NodeType::Unknown => match hint {
                NodeType::Number => NodeType::Number,
                NodeType::String => NodeType::String,
                _ => {
                    if self.lhs.can_be_number(row) && self.rhs.can_be_number(row) {
                        NodeType::Number
                    } else {
                        NodeType::String
                    }
                }
            },
            other => other,
        };
        match effective {
            NodeType::Number => self.evaluate_numeric(row),
            _ => self.evaluate_string_concat(row),
        }
    }
}

impl Node for Binary {
    fn validate_types(&mut self, err: &mut ParseError) -> NodeType {
        if self.op.is_arithmetic_non_plus() {
            self.validate_arithmetic_non_plus(err)
        } else if self.op.is_logical() {
            self.validate_logical(err)
        } else if self.op.is_comparison() {
            self.validate_comparison(err)
        } else {
            self.validate_plus(err)
        }
    }

    fn set_type(&mut self, hint: NodeType, err: &mut ParseError) -> bool {
        if self.op == BinaryOp::Plus {
            if self.calculated_type == NodeType::Unknown {
                let lhs_ok = self.lhs.set_type(hint, err);
                let rhs_ok = self.rhs.set_type(hint, err);
                if lhs_ok && rhs_ok {
                    self.calculated_type = hint;
                    true
                } else {
                    false
                }
            } else if self.calculated_type == hint {
                true
            } else {
                *err = ParseError::new(
                    format!("Operand is the wrong type - expected a {hint}, but got a {}", self.calculated_type),
                    self.op_range,
                );
                false
            }
        } else {
            let fixed = if self.op.is_arithmetic_non_plus() { NodeType::Number } else { NodeType::Bool };
            if hint == fixed {
                true
            } else {
                *err = ParseError::new(format!("Operand is the wrong type - expected a {hint}, but got a {fixed}"), self.op_range);
                false
            }
        }
    }

    fn evaluate(&self, row: &dyn Row, hint: NodeType) -> Value {
        if self.op.is_arithmetic_non_plus() {
            self.evaluate_numeric(row)
        } else if self.op.is_logical() {
            self.evaluate_logical(row)
        } else if self.op.is_comparison() {
            self.evaluate_comparison(row)
        } else {
            self.evaluate_plus(row, hint)
        }
    }

    fn position(&self) -> Range {
        self.lhs.position().to(self.rhs.position())
    }

    fn can_be_number(&self, row: &dyn Row) -> bool {
        if self.op.is_arithmetic_non_plus() {
            true
        } else if self.op == BinaryOp::Plus {
            match self.calculated_type {
                NodeType::Number => true,
                NodeType::Unknown => self.lhs.can_be_number(row) && self.rhs.can_be_number(row),
                _ => false,
            }
        } else {
            false
        }
    }

    fn tree_string(&self) -> String {
        let result_type = match self.validate_types_display() {
            Some(t) => t,
            None => self.calculated_type,
        };
        format!("({} {} {}):{}", self.op, self.lhs.tree_string(), self.rhs.tree_string(), result_type)
    }
}

impl Binary {
    /// `tree_string` is only ever called after a successful `validate_types`
    /// pass, so the node's own resolved type is recoverable from its family
    /// without re-running resolution: fixed for every family but `Plus`,
    /// whose `calculated_type` already holds it.
    fn validate_types_display(&self) -> Option<NodeType> {
        if self.op.is_arithmetic_non_plus() {
            Some(NodeType::Number)
        } else if self.op.is_logical() || self.op.is_comparison() {
            Some(NodeType::Bool)
        } else {
            None
        }
    }
}
