use crate::node::Node;
use crate::{Expression, Row};
use rowfilter_diagnostics::{ParseError, Range};
use rowfilter_value::{NodeType, Value};

/// Unary `-`. Always resolves to `Number`; its operand is coerced to
/// `Number` if it arrives `Unknown`.
#[derive(Debug)]
pub struct UnaryMinus {
    op_range: Range,
    operand: Box<Expression>,
}

impl UnaryMinus {
    pub fn new(op_range: Range, operand: Box<Expression>) -> Self {
        Self { op_range, operand }
    }
}

impl Node for UnaryMinus {
    fn validate_types(&mut self, err: &mut ParseError) -> NodeType {
        let operand_type = self.operand.validate_types(err);
        if operand_type == NodeType::Error {
            return NodeType::Error;
        }

        let resolved = if operand_type == NodeType::Unknown {
            if !self.operand.set_type(NodeType::Number, err) {
                return NodeType::Error;
            }
            NodeType::Number
        } else {
            operand_type
        };

        if resolved != NodeType::Number {
            *err = ParseError::with_secondary(
                format!("Unary minus expects a number, not a {resolved}"),
                self.op_range,
                self.operand.position(),
            );
            return NodeType::Error;
        }
        NodeType::Number
    }

    fn set_type(&mut self, hint: NodeType, err: &mut ParseError) -> bool {
        if hint == NodeType::Number {
            true
        } else {
            *err = ParseError::new(
                format!("Operand is the wrong type - expected a {hint}, but got a number"),
                self.op_range,
            );
            false
        }
    }

    fn evaluate(&self, row: &dyn Row, _hint: NodeType) -> Value {
        let operand = self.operand.evaluate(row, NodeType::Number);
        match operand {
            Value::Number(n) => Value::number(-n),
            Value::Error(_) => operand,
            other => Value::error(format!(
                "The unary operator at {} expects arguments of type number (got {})",
                self.op_range.begin,
                other.node_type()
            )),
        }
    }

    fn position(&self) -> Range {
        self.op_range.to(self.operand.position())
    }

    fn can_be_number(&self, _row: &dyn Row) -> bool {
        true
    }

    fn tree_string(&self) -> String {
        format!("(u- {}):{}", self.operand.tree_string(), NodeType::Number)
    }
}
