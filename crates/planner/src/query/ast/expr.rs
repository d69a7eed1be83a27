//! Defines the AST for SQL expressions.

use crate::query::ast::select::{OrderByExpr, Select};
use model::core::{data_type::DataType, value::Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column or table identifier, e.g., `users` or `users.id`.
    Identifier(Ident),

    /// A value bound as a query parameter.
    Value(Value),

    /// A string literal written inline, quoted and escaped by the dialect.
    Text(String),

    /// Raw SQL written as-is. Only for trusted fragments such as numbers.
    Literal(String),

    Null,

    /// The server's current date and time.
    CurrentTimestamp,

    /// A binary operation, e.g., `column = 'value'` or `a AND b`.
    BinaryOp(Box<BinaryOp>),

    /// A function call, e.g., `COUNT(*)` or `COALESCE(a, b)`.
    FunctionCall(FunctionCall),

    /// An aliased expression, e.g. `COUNT(*) AS total_count`
    Alias { expr: Box<Expr>, alias: String },

    /// `CAST(expr AS type)`; fails on the server when the value does not convert.
    Cast {
        expr: Box<Expr>,
        data_type: DataType,
    },

    /// Conversion that yields NULL instead of failing.
    TryCast {
        expr: Box<Expr>,
        data_type: DataType,
    },

    /// `expr IS [NOT] NULL`
    IsNull { expr: Box<Expr>, negated: bool },

    /// `[NOT] EXISTS (subquery)`
    Exists { subquery: Box<Select>, negated: bool },

    /// `ROW_NUMBER() OVER (ORDER BY ...)`
    RowNumber { order_by: Vec<OrderByExpr> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub qualifier: Option<String>, // e.g., the 'users' in 'users.id'
    pub name: String,              // e.g., the 'id' in 'users.id'
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub left: Expr,
    pub op: BinaryOperator,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub wildcard: bool, // represents the '*' in 'COUNT(*)'
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    Like,
    And,
    Or,
}

impl Expr {
    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
        Expr::BinaryOp(Box::new(BinaryOp { left, op, right }))
    }

    pub fn equals(self, right: Expr) -> Expr {
        Expr::binary(self, BinaryOperator::Eq, right)
    }

    pub fn and(self, right: Expr) -> Expr {
        Expr::binary(self, BinaryOperator::And, right)
    }

    pub fn or(self, right: Expr) -> Expr {
        Expr::binary(self, BinaryOperator::Or, right)
    }

    pub fn like(self, pattern: Expr) -> Expr {
        Expr::binary(self, BinaryOperator::Like, pattern)
    }

    pub fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self),
            negated: true,
        }
    }

    pub fn cast(self, data_type: DataType) -> Expr {
        Expr::Cast {
            expr: Box::new(self),
            data_type,
        }
    }

    pub fn try_cast(self, data_type: DataType) -> Expr {
        Expr::TryCast {
            expr: Box::new(self),
            data_type,
        }
    }

    pub fn alias(self, alias: &str) -> Expr {
        Expr::Alias {
            expr: Box::new(self),
            alias: alias.to_string(),
        }
    }

    pub fn not_exists(subquery: Select) -> Expr {
        Expr::Exists {
            subquery: Box::new(subquery),
            negated: true,
        }
    }
}
