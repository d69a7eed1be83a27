//! Provides a fluent builder for constructing `Insert` ASTs.

use crate::query::ast::{common::TableRef, expr::Expr, insert::Insert, select::Select};

#[derive(Debug, Clone)]
pub struct InsertBuilder {
    ast: Insert,
}

impl InsertBuilder {
    pub fn new(table: TableRef) -> Self {
        Self {
            ast: Insert {
                table,
                ..Default::default()
            },
        }
    }

    pub fn columns<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.ast.columns = columns.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Adds a row of values. Can be called repeatedly for a batch insert.
    pub fn values(mut self, values: Vec<Expr>) -> Self {
        self.ast.values.push(values);
        self
    }

    pub fn select(mut self, select: Select) -> Self {
        self.ast.select = Some(select);
        self
    }

    pub fn build(self) -> Insert {
        self.ast
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{
        ast::common::TableRef, builder::insert::InsertBuilder, builder::select::SelectBuilder,
        ident, value,
    };
    use model::core::value::Value;

    #[test]
    fn test_build_batch_insert() {
        let ast = InsertBuilder::new(TableRef::new("temp_products"))
            .columns(&["ASIN", "Price"])
            .values(vec![value(Value::from("B01")), value(Value::Null)])
            .values(vec![value(Value::from("B02")), value(Value::from("9.99"))])
            .build();

        assert_eq!(ast.columns, vec!["ASIN", "Price"]);
        assert_eq!(ast.values.len(), 2);
        assert!(ast.select.is_none());
    }

    #[test]
    fn test_build_insert_select() {
        let select = SelectBuilder::new()
            .select(vec![ident("ASIN")])
            .from(TableRef::new("temp_products"), None)
            .build();
        let ast = InsertBuilder::new(TableRef::new("Products"))
            .columns(&["ASIN"])
            .select(select)
            .build();

        assert!(ast.values.is_empty());
        assert!(ast.select.is_some());
    }
}
