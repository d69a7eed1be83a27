//! Defines the AST for an INSERT statement.

use crate::query::ast::{common::TableRef, expr::Expr, select::Select};

/// Represents a complete INSERT statement.
///
/// Rows come either from `values` (one inner vector per row, batch inserts
/// included) or from `select`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insert {
    pub table: TableRef,
    pub columns: Vec<String>,
    pub values: Vec<Vec<Expr>>,
    pub select: Option<Select>,
}
