//! Logical relation between the children of a collection

use crate::error::{FieldsError, Result};
use std::fmt;
use std::str::FromStr;

/// AND / OR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Relation {
    #[default]
    And,
    Or,
}

impl Relation {
    /// Case-insensitive parse; anything but AND/OR, padding included, is an error
    pub fn parse(token: &str) -> Result<Self> {
        match token.to_ascii_uppercase().as_str() {
            "AND" => Ok(Relation::And),
            "OR" => Ok(Relation::Or),
            _ => Err(FieldsError::InvalidRelation(token.to_string())),
        }
    }

    /// Relation of a foreign node; only an absent key defaults to AND
    pub fn from_foreign(token: Option<&str>) -> Result<Self> {
        token.map_or(Ok(Relation::And), Relation::parse)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::And => "AND",
            Relation::Or => "OR",
        }
    }
}

impl FromStr for Relation {
    type Err = FieldsError;

    fn from_str(s: &str) -> Result<Self> {
        Relation::parse(s)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
