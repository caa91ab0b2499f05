use crate::node::{wrong_type_error, Node};
use crate::Row;
use rowfilter_diagnostics::{ParseError, Range};
use rowfilter_value::{NodeType, Value};

/// A reference to a column, resolved against the headers map at parse time.
/// Its `NodeType` starts `Unknown` and is pinned the first time a parent
/// calls `set_type`; a later call with a different type is an error.
#[derive(Debug)]
pub struct ColumnRef {
    range: Range,
    name: String,
    index: usize,
    node_type: NodeType,
}

impl ColumnRef {
    pub fn new(range: Range, name: String, index: usize) -> Self {
        Self { range, name, index, node_type: NodeType::Unknown }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl Node for ColumnRef {
    fn validate_types(&mut self, _err: &mut ParseError) -> NodeType {
        self.node_type
    }

    fn set_type(&mut self, hint: NodeType, err: &mut ParseError) -> bool {
        match self.node_type {
            NodeType::Unknown => {
                self.node_type = hint;
                true
            }
            current if current == hint => true,
            current => {
                *err = wrong_type_error(hint, current, self.range);
                false
            }
        }
    }

    fn evaluate(&self, row: &dyn Row, hint: NodeType) -> Value {
        let field = row.field(self.index);
        if hint == NodeType::Number {
            match field.as_number() {
                Some(n) => Value::number(n),
                None => Value::string(field.as_string().to_vec()),
            }
        } else {
            Value::string(field.as_string().to_vec())
        }
    }

    fn position(&self) -> Range {
        self.range
    }

    fn can_be_number(&self, row: &dyn Row) -> bool {
        row.field(self.index).as_number().is_some()
    }

    fn tree_string(&self) -> String {
        format!("{}~{}:{}", self.name, self.index, self.node_type)
    }
}
