//! Target fields of the `Products` table and the fallbacks used when the
//! staging data has no column for them.

use crate::core::{data_type::DataType, value::Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A column as exposed by the source table's schema introspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceColumn {
    pub name: String,
    /// 1-based position, as reported by `INFORMATION_SCHEMA.COLUMNS`.
    pub ordinal: usize,
}

impl SourceColumn {
    pub fn new(name: impl Into<String>, ordinal: usize) -> Self {
        Self {
            name: name.into(),
            ordinal,
        }
    }

    /// Builds columns from names in order, numbering them from 1.
    pub fn from_names<I, S>(names: I) -> Vec<SourceColumn>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| SourceColumn::new(name, i + 1))
            .collect()
    }
}

/// The closed set of product fields the migration needs a source for.
///
/// The declaration order is the column order of the generated INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetField {
    Identifier,
    ProductName,
    Brand,
    Category,
    Price,
    Rating,
    Reviews,
}

impl TargetField {
    pub const ALL: [TargetField; 7] = [
        TargetField::Identifier,
        TargetField::ProductName,
        TargetField::Brand,
        TargetField::Category,
        TargetField::Price,
        TargetField::Rating,
        TargetField::Reviews,
    ];

    /// Column name in the `Products` table.
    pub fn column(&self) -> &'static str {
        match self {
            TargetField::Identifier => "ASIN",
            TargetField::ProductName => "ProductName",
            TargetField::Brand => "Brand",
            TargetField::Category => "Category",
            TargetField::Price => "Price",
            TargetField::Rating => "Rating",
            TargetField::Reviews => "ReviewCount",
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            TargetField::Identifier => DataType::text(50),
            TargetField::ProductName => DataType::text(500),
            TargetField::Brand | TargetField::Category => DataType::text(200),
            TargetField::Price => DataType::decimal(10, 2),
            TargetField::Rating => DataType::decimal(3, 2),
            TargetField::Reviews => DataType::Int,
        }
    }

    /// What the field resolves to when no source column matched it.
    pub fn fallback(&self) -> Fallback {
        match self {
            TargetField::Identifier => Fallback::GeneratedKey {
                prefix: UNKNOWN_KEY_PREFIX.to_string(),
            },
            TargetField::ProductName => Fallback::FirstColumn,
            TargetField::Brand
            | TargetField::Category
            | TargetField::Price
            | TargetField::Rating => Fallback::Literal(Value::Null),
            TargetField::Reviews => Fallback::Literal(Value::Int32(0)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetField::Identifier => "Identifier",
            TargetField::ProductName => "ProductName",
            TargetField::Brand => "Brand",
            TargetField::Category => "Category",
            TargetField::Price => "Price",
            TargetField::Rating => "Rating",
            TargetField::Reviews => "Reviews",
        }
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix of the keys generated for rows without an identifier.
pub const UNKNOWN_KEY_PREFIX: &str = "UNK-";

/// Documented replacement for a target field that has no source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fallback {
    /// A constant written into every row.
    Literal(Value),
    /// The identity value of the first source column.
    FirstColumn,
    /// `<prefix><row number>`, numbered in product-name order.
    GeneratedKey { prefix: String },
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::Literal(value) => write!(f, "literal {value}"),
            Fallback::FirstColumn => write!(f, "first source column"),
            Fallback::GeneratedKey { prefix } => write!(f, "generated '{prefix}<n>'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_names_numbers_from_one() {
        let cols = SourceColumn::from_names(["a", "b"]);
        assert_eq!(cols[0], SourceColumn::new("a", 1));
        assert_eq!(cols[1], SourceColumn::new("b", 2));
    }

    #[test]
    fn test_every_field_has_a_fallback() {
        for field in TargetField::ALL {
            // Must not panic and must be printable.
            let _ = field.fallback().to_string();
        }
        assert_eq!(TargetField::Reviews.column(), "ReviewCount");
        assert!(TargetField::Price.data_type().is_numeric());
    }
}
