//! Static conditional evaluation
//!
//! Conditionals are decided at compile time for targets without runtime branching. Conditions
//! are parsed into typed operators and evaluated directly against the prop's literal value.
//! Comparison follows strict-equality semantics: values of different types are never equal,
//! and ordering is only defined between two numbers or two strings.

use serde_json::Value;
use thiserror::Error;

use crate::uidl::{Condition, ConditionalContent, Literal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    StrictEqual,
    StrictNotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

impl BinaryOperator {
    /// Unrecognised operations fall back to strict equality.
    pub fn parse(op: &str) -> Self {
        match op {
            "!==" | "!=" => BinaryOperator::StrictNotEqual,
            ">" => BinaryOperator::Greater,
            ">=" => BinaryOperator::GreaterEqual,
            "<" => BinaryOperator::Less,
            "<=" => BinaryOperator::LessEqual,
            _ => BinaryOperator::StrictEqual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Truthy,
}

impl UnaryOperator {
    pub fn parse(op: &str) -> Self {
        match op {
            "!!" | "truthy" => UnaryOperator::Truthy,
            _ => UnaryOperator::Not,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionOp {
    Binary(BinaryOperator, Literal),
    Unary(UnaryOperator),
}

impl From<&Condition> for ConditionOp {
    fn from(condition: &Condition) -> Self {
        match &condition.operand {
            Some(operand) => {
                ConditionOp::Binary(BinaryOperator::parse(&condition.operation), operand.clone())
            }
            None => ConditionOp::Unary(UnaryOperator::parse(&condition.operation)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchingCriteria {
    All,
    Any,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot compare {left} with {right}")]
pub struct EvalError {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSet {
    pub ops: Vec<ConditionOp>,
    pub criteria: MatchingCriteria,
}

impl ConditionSet {
    /// A static `value` on the conditional is shorthand for a single `===` check.
    pub fn from_conditional(content: &ConditionalContent) -> Self {
        if let Some(value) = &content.value {
            return ConditionSet {
                ops: vec![ConditionOp::Binary(BinaryOperator::StrictEqual, value.clone())],
                criteria: MatchingCriteria::Any,
            };
        }

        let (ops, criteria) = match &content.condition {
            Some(expr) => (
                expr.conditions.iter().map(ConditionOp::from).collect(),
                if expr.matching_criteria.as_deref() == Some("all") {
                    MatchingCriteria::All
                } else {
                    MatchingCriteria::Any
                },
            ),
            None => (Vec::new(), MatchingCriteria::Any),
        };
        ConditionSet { ops, criteria }
    }

    pub fn evaluate(&self, value: &Value) -> Result<bool, EvalError> {
        if self.ops.is_empty() {
            return Ok(false);
        }
        match self.criteria {
            MatchingCriteria::All => {
                for op in &self.ops {
                    if !evaluate_op(op, value)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            MatchingCriteria::Any => {
                for op in &self.ops {
                    if evaluate_op(op, value)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

pub fn evaluate_op(op: &ConditionOp, value: &Value) -> Result<bool, EvalError> {
    match op {
        ConditionOp::Unary(UnaryOperator::Not) => Ok(!is_truthy(value)),
        ConditionOp::Unary(UnaryOperator::Truthy) => Ok(is_truthy(value)),
        ConditionOp::Binary(BinaryOperator::StrictEqual, operand) => {
            Ok(strict_equals(value, operand))
        }
        ConditionOp::Binary(BinaryOperator::StrictNotEqual, operand) => {
            Ok(!strict_equals(value, operand))
        }
        ConditionOp::Binary(relational, operand) => {
            let ordering = compare(value, operand)?;
            Ok(match relational {
                BinaryOperator::Greater => ordering.is_gt(),
                BinaryOperator::GreaterEqual => ordering.is_ge(),
                BinaryOperator::Less => ordering.is_lt(),
                BinaryOperator::LessEqual => ordering.is_le(),
                BinaryOperator::StrictEqual | BinaryOperator::StrictNotEqual => ordering.is_eq(),
            })
        }
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn strict_equals(value: &Value, operand: &Literal) -> bool {
    match (value, operand) {
        (Value::Bool(a), Literal::Bool(b)) => a == b,
        (Value::Number(a), Literal::Number(b)) => a.as_f64() == Some(*b),
        (Value::String(a), Literal::Str(b)) => a == b,
        _ => false,
    }
}

fn compare(value: &Value, operand: &Literal) -> Result<std::cmp::Ordering, EvalError> {
    let mismatch = || EvalError {
        left: value.to_string(),
        right: operand.to_json().to_string(),
    };
    match (value, operand) {
        (Value::Number(a), Literal::Number(b)) => a
            .as_f64()
            .and_then(|a| a.partial_cmp(b))
            .ok_or_else(mismatch),
        (Value::String(a), Literal::Str(b)) => Ok(a.as_str().cmp(b.as_str())),
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{dynamic_node, static_node};
    use crate::uidl::{ConditionExpression, ReferenceType};
    use serde_json::json;

    fn conditional(
        condition: Option<ConditionExpression>,
        value: Option<Literal>,
    ) -> ConditionalContent {
        ConditionalContent {
            node: Box::new(static_node("shown")),
            reference: Box::new(dynamic_node(ReferenceType::Prop, "visible")),
            value,
            condition,
        }
    }

    fn cond(operation: &str, operand: Option<Literal>) -> Condition {
        Condition {
            operation: operation.to_string(),
            operand,
        }
    }

    #[test]
    fn test_single_equality_condition() {
        let set = ConditionSet::from_conditional(&conditional(
            Some(ConditionExpression {
                conditions: vec![cond("===", Some(Literal::Bool(true)))],
                matching_criteria: None,
            }),
            None,
        ));
        assert_eq!(set.evaluate(&json!(true)), Ok(true));
        assert_eq!(set.evaluate(&json!(false)), Ok(false));
    }

    #[test]
    fn test_value_shorthand() {
        let shorthand = conditional(None, Some(Literal::Str("dark".into())));
        let set = ConditionSet::from_conditional(&shorthand);
        assert_eq!(set.evaluate(&json!("dark")), Ok(true));
        assert_eq!(set.evaluate(&json!("light")), Ok(false));
    }

    #[test]
    fn test_all_versus_any() {
        let conditions = vec![
            cond(">", Some(Literal::Number(1.0))),
            cond("<", Some(Literal::Number(5.0))),
        ];
        let all = ConditionSet::from_conditional(&conditional(
            Some(ConditionExpression {
                conditions: conditions.clone(),
                matching_criteria: Some("all".into()),
            }),
            None,
        ));
        let any = ConditionSet::from_conditional(&conditional(
            Some(ConditionExpression {
                conditions,
                matching_criteria: None,
            }),
            None,
        ));
        assert_eq!(all.evaluate(&json!(7)), Ok(false));
        assert_eq!(any.evaluate(&json!(7)), Ok(true));
        assert_eq!(all.evaluate(&json!(3)), Ok(true));
    }

    #[test]
    fn test_unary_not_and_type_mismatch() {
        assert_eq!(evaluate_op(&ConditionOp::from(&cond("!", None)), &json!("")), Ok(true));
        assert_eq!(evaluate_op(&ConditionOp::from(&cond("!", None)), &json!(1)), Ok(false));
        assert!(evaluate_op(
            &ConditionOp::Binary(BinaryOperator::Greater, Literal::Number(2.0)),
            &json!("abc")
        )
        .is_err());
        assert_eq!(
            evaluate_op(
                &ConditionOp::Binary(BinaryOperator::StrictEqual, Literal::Number(1.0)),
                &json!("1")
            ),
            Ok(false)
        );
    }

    #[test]
    fn test_unknown_operation_defaults_to_equality() {
        assert_eq!(BinaryOperator::parse("equals"), BinaryOperator::StrictEqual);
    }
}
