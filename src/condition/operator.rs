//! Comparison operators

use crate::error::{FieldsError, Result};
use std::fmt;
use std::str::FromStr;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// Equal (=)
    Equal,
    /// Not equal (!=)
    NotEqual,
    /// Membership (IN)
    In,
    /// Non-membership (NOT IN)
    NotIn,
    /// Greater than (>)
    Greater,
    /// Greater than or equal (>=)
    GreaterEqual,
    /// Less than (<)
    Less,
    /// Less than or equal (<=)
    LessEqual,
    /// Host callback (CUSTOM)
    Custom,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 9] = [
        ComparisonOperator::Equal,
        ComparisonOperator::NotEqual,
        ComparisonOperator::In,
        ComparisonOperator::NotIn,
        ComparisonOperator::Greater,
        ComparisonOperator::GreaterEqual,
        ComparisonOperator::Less,
        ComparisonOperator::LessEqual,
        ComparisonOperator::Custom,
    ];

    /// Parse an operator token
    ///
    /// Word operators are case-insensitive and tolerate repeated inner
    /// whitespace (`not  in`).
    pub fn parse(token: &str) -> Option<Self> {
        let normalized = token
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();

        match normalized.as_str() {
            "=" => Some(ComparisonOperator::Equal),
            "!=" => Some(ComparisonOperator::NotEqual),
            "IN" => Some(ComparisonOperator::In),
            "NOT IN" => Some(ComparisonOperator::NotIn),
            ">" => Some(ComparisonOperator::Greater),
            ">=" => Some(ComparisonOperator::GreaterEqual),
            "<" => Some(ComparisonOperator::Less),
            "<=" => Some(ComparisonOperator::LessEqual),
            "CUSTOM" => Some(ComparisonOperator::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::In => "IN",
            ComparisonOperator::NotIn => "NOT IN",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::GreaterEqual => ">=",
            ComparisonOperator::Less => "<",
            ComparisonOperator::LessEqual => "<=",
            ComparisonOperator::Custom => "CUSTOM",
        }
    }

    /// Negated operators (`!=`, `NOT IN`)
    pub fn is_negative(&self) -> bool {
        matches!(self, ComparisonOperator::NotEqual | ComparisonOperator::NotIn)
    }
}

impl FromStr for ComparisonOperator {
    type Err = FieldsError;

    fn from_str(s: &str) -> Result<Self> {
        ComparisonOperator::parse(s).ok_or_else(|| FieldsError::UnsupportedOperator {
            operator: s.to_string(),
            condition_type: String::new(),
        })
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
