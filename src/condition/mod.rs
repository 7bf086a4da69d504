mod op;

pub use op::{ConditionOperation, SetOperator};

use {crate::serutil::ElementList, serde_json::Value};

/// One `operator -> key -> values` entry of a statement's `Condition` block.
///
/// A block with two keys under one operator yields two conditions. Paths follow the validator's conventions: a `#`
/// before the last segment addresses the key itself rather than its value.
#[derive(Clone, Debug, PartialEq)]
pub struct Condition<'a> {
    statement_path: String,
    operator: &'a str,
    key: &'a str,
    values: &'a Value,
}

impl<'a> Condition<'a> {
    pub(crate) fn new(statement_path: String, operator: &'a str, key: &'a str, values: &'a Value) -> Self {
        Self {
            statement_path,
            operator,
            key,
            values,
        }
    }

    #[inline]
    pub fn operation(&self) -> ConditionOperation<'a> {
        ConditionOperation::new(self.operator)
    }

    #[inline]
    pub fn condition_key(&self) -> &'a str {
        self.key
    }

    /// The values to compare against. A single string is a one-element list.
    pub fn condition_values(&self) -> Vec<&'a str> {
        ElementList::new(self.values).strings()
    }

    #[inline]
    pub fn value_is_array(&self) -> bool {
        self.values.is_array()
    }

    pub fn operator_key_path(&self) -> String {
        format!("{}.Condition.#{}", self.statement_path, self.operator)
    }

    pub fn operator_value_path(&self) -> String {
        format!("{}.Condition.{}", self.statement_path, self.operator)
    }

    pub fn key_path(&self) -> String {
        format!("{}.#{}", self.operator_value_path(), self.key)
    }

    pub fn values_path(&self) -> String {
        format!("{}.{}", self.operator_value_path(), self.key)
    }
}

/// Flatten a `Condition` block. Operators whose value is not an object are skipped.
pub(crate) fn parse_conditions<'a>(condition: &'a Value, statement_path: &str) -> Vec<Condition<'a>> {
    let operators = match condition {
        Value::Object(operators) => operators,
        _ => return Vec::new(),
    };

    let mut result = Vec::new();
    for (operator, keys) in operators {
        if let Value::Object(keys) = keys {
            for (key, values) in keys {
                result.push(Condition::new(statement_path.to_string(), operator, key, values));
            }
        }
    }

    result
}
