use crate::query::ast::expr::{Expr, FunctionCall, Ident};
use model::core::{data_type::DataType, value::Value};

pub mod ast;
pub mod builder;
pub mod dialect;
pub mod renderer;

pub fn ident(name: &str) -> Expr {
    Expr::Identifier(Ident {
        qualifier: None,
        name: name.to_string(),
    })
}

pub fn qualified(qualifier: &str, name: &str) -> Expr {
    Expr::Identifier(Ident {
        qualifier: Some(qualifier.to_string()),
        name: name.to_string(),
    })
}

/// A bound parameter.
pub fn value(val: Value) -> Expr {
    Expr::Value(val)
}

/// A parameter wrapped in an explicit cast, so drivers that infer parameter
/// types from context (PostgreSQL) resolve it to the column's type.
pub fn typed_value(val: Value, data_type: DataType) -> Expr {
    Expr::Cast {
        expr: Box::new(Expr::Value(val)),
        data_type,
    }
}

pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::FunctionCall(FunctionCall {
        name: name.to_string(),
        args,
        wildcard: false,
    })
}

pub fn count_all() -> Expr {
    Expr::FunctionCall(FunctionCall {
        name: "COUNT".to_string(),
        args: Vec::new(),
        wildcard: true,
    })
}
