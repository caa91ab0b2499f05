use crate::node::{format_number, wrong_type_error, Node};
use crate::Row;
use rowfilter_diagnostics::{ParseError, Range};
use rowfilter_value::{NodeType, Value};

/// A number or string literal. Its type is fixed at construction time and
/// never changes.
#[derive(Debug)]
pub struct Literal {
    range: Range,
    node_type: NodeType,
    value: Value,
}

impl Literal {
    pub fn number(range: Range, value: f64) -> Self {
        Self { range, node_type: NodeType::Number, value: Value::number(value) }
    }

    pub fn string(range: Range, value: Vec<u8>) -> Self {
        Self { range, node_type: NodeType::String, value: Value::string(value) }
    }
}

impl Node for Literal {
    fn validate_types(&mut self, _err: &mut ParseError) -> NodeType {
        self.node_type
    }

    fn set_type(&mut self, hint: NodeType, err: &mut ParseError) -> bool {
        if hint == self.node_type {
            true
        } else {
            *err = wrong_type_error(hint, self.node_type, self.range);
            false
        }
    }

    fn evaluate(&self, _row: &dyn Row, _hint: NodeType) -> Value {
        self.value.clone()
    }

    fn position(&self) -> Range {
        self.range
    }

    fn can_be_number(&self, _row: &dyn Row) -> bool {
        self.node_type == NodeType::Number
    }

    fn tree_string(&self) -> String {
        match &self.value {
            Value::Number(n) => format!("{}:{}", format_number(*n), self.node_type),
            Value::String(s) => format!("{}:{}", String::from_utf8_lossy(s), self.node_type),
            _ => unreachable!("literal values are only ever Number or String"),
        }
    }
}
