//! Fluent builder for `Select` ASTs.

use crate::query::ast::{
    common::{JoinKind, OrderDir, TableRef},
    expr::Expr,
    select::{FromClause, JoinClause, OrderByExpr, Select},
};

#[derive(Debug, Clone, Default)]
pub struct SelectBuilder {
    ast: Select,
}

impl SelectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, columns: Vec<Expr>) -> Self {
        self.ast.columns = columns;
        self
    }

    pub fn column(mut self, column: Expr) -> Self {
        self.ast.columns.push(column);
        self
    }

    pub fn from(mut self, table: TableRef, alias: Option<&str>) -> Self {
        self.ast.from = Some(FromClause {
            table,
            alias: alias.map(String::from),
        });
        self
    }

    pub fn join(mut self, kind: JoinKind, table: TableRef, alias: Option<&str>, on: Expr) -> Self {
        self.ast.joins.push(JoinClause {
            kind,
            table,
            alias: alias.map(String::from),
            on,
        });
        self
    }

    /// Sets the WHERE condition, AND-ing it onto any existing one.
    pub fn where_clause(mut self, condition: Expr) -> Self {
        self.ast.where_clause = Some(match self.ast.where_clause.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    pub fn order_by(mut self, expr: Expr, direction: Option<OrderDir>) -> Self {
        self.ast.order_by.push(OrderByExpr { expr, direction });
        self
    }

    pub fn build(self) -> Select {
        self.ast
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{
        ast::{
            common::{OrderDir, TableRef},
            expr::Expr,
        },
        builder::select::SelectBuilder,
        ident,
    };

    #[test]
    fn test_where_clauses_are_combined() {
        let ast = SelectBuilder::new()
            .select(vec![ident("TABLE_NAME")])
            .from(TableRef::with_schema("INFORMATION_SCHEMA", "TABLES"), None)
            .where_clause(ident("TABLE_TYPE").equals(Expr::Text("BASE TABLE".into())))
            .where_clause(ident("TABLE_NAME").is_not_null())
            .order_by(ident("TABLE_NAME"), Some(OrderDir::Asc))
            .build();

        assert!(matches!(ast.where_clause, Some(Expr::BinaryOp(_))));
        assert_eq!(ast.order_by.len(), 1);
    }
}
