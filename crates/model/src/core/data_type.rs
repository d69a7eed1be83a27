use serde::{Deserialize, Serialize};
use std::fmt;

/// Column types used by the catalog schema, independent of the SQL dialect.
///
/// Dialects map these to concrete type names (`NVARCHAR(MAX)` vs `TEXT`,
/// `BIT` vs `BOOLEAN`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    BigInt,
    Decimal { precision: u8, scale: u8 },
    Float,
    /// Variable-length text; `None` means unbounded.
    Text(Option<u32>),
    Boolean,
    Timestamp,
}

impl DataType {
    pub const fn decimal(precision: u8, scale: u8) -> Self {
        DataType::Decimal { precision, scale }
    }

    pub const fn text(max_length: u32) -> Self {
        DataType::Text(Some(max_length))
    }

    /// Numeric types are the ones a raw text cell has to be try-cast into.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Int | DataType::BigInt | DataType::Decimal { .. } | DataType::Float
        )
    }

    pub fn is_text(&self) -> bool {
        matches!(self, DataType::Text(_))
    }

    /// Maximum number of digits allowed left of the decimal point, when the
    /// type bounds it.
    pub fn integer_digits(&self) -> Option<u8> {
        match self {
            DataType::Int => Some(10),
            DataType::BigInt => Some(19),
            DataType::Decimal { precision, scale } => Some(precision.saturating_sub(*scale)),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "INT"),
            DataType::BigInt => write!(f, "BIGINT"),
            DataType::Decimal { precision, scale } => write!(f, "DECIMAL({precision},{scale})"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Text(Some(len)) => write!(f, "TEXT({len})"),
            DataType::Text(None) => write!(f, "TEXT"),
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_classification() {
        assert!(DataType::Int.is_numeric());
        assert!(DataType::decimal(10, 2).is_numeric());
        assert!(!DataType::Text(None).is_numeric());
        assert!(!DataType::Timestamp.is_numeric());
    }

    #[test]
    fn test_integer_digits() {
        assert_eq!(DataType::decimal(3, 2).integer_digits(), Some(1));
        assert_eq!(DataType::decimal(10, 2).integer_digits(), Some(8));
        assert_eq!(DataType::Int.integer_digits(), Some(10));
        assert_eq!(DataType::text(20).integer_digits(), None);
    }
}
