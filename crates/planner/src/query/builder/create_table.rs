//! Fluent builder for `CreateTable` ASTs.

use crate::query::ast::{
    common::TableRef,
    create_table::{ColumnDef, CreateTable, TableConstraint},
    expr::Expr,
};
use model::core::data_type::DataType;

#[derive(Debug, Clone)]
pub struct CreateTableBuilder {
    ast: CreateTable,
}

impl CreateTableBuilder {
    pub fn new(table: TableRef) -> Self {
        Self {
            ast: CreateTable {
                table,
                ..Default::default()
            },
        }
    }

    pub fn if_not_exists(mut self) -> Self {
        self.ast.if_not_exists = true;
        self
    }

    pub fn column(self, name: &str, data_type: DataType) -> ColumnBuilder {
        ColumnBuilder::new(self, name, data_type)
    }

    /// Adds the conventional `Id` identity primary key.
    pub fn identity_key(self, name: &str) -> Self {
        self.column(name, DataType::Int).identity().primary_key().add()
    }

    pub fn foreign_key(mut self, column: &str, references: TableRef, referenced: &str) -> Self {
        self.ast.constraints.push(TableConstraint::ForeignKey {
            columns: vec![column.to_string()],
            references,
            referenced_columns: vec![referenced.to_string()],
        });
        self
    }

    pub fn build(self) -> CreateTable {
        self.ast
    }
}

pub struct ColumnBuilder {
    table_builder: CreateTableBuilder,
    column: ColumnDef,
}

impl ColumnBuilder {
    fn new(table_builder: CreateTableBuilder, name: &str, data_type: DataType) -> Self {
        Self {
            table_builder,
            column: ColumnDef {
                name: name.to_string(),
                data_type,
                is_nullable: true,
                is_primary_key: false,
                is_identity: false,
                is_unique: false,
                default_value: None,
            },
        }
    }

    pub fn not_null(mut self) -> Self {
        self.column.is_nullable = false;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.column.is_primary_key = true;
        self.column.is_nullable = false;
        self
    }

    pub fn identity(mut self) -> Self {
        self.column.is_identity = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.column.is_unique = true;
        self
    }

    pub fn default_value(mut self, default_value: Expr) -> Self {
        self.column.default_value = Some(default_value);
        self
    }

    pub fn add(mut self) -> CreateTableBuilder {
        self.table_builder.ast.columns.push(self.column);
        self.table_builder
    }
}
