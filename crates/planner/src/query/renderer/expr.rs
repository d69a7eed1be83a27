use crate::query::{
    ast::expr::{BinaryOp, BinaryOperator, Expr, FunctionCall, Ident},
    dialect::{NumericBound, numeric_bound, numeric_pattern},
    renderer::{Render, Renderer},
};
use model::core::data_type::DataType;

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Identifier(ident) => ident.render(r),
            Expr::Value(val) => r.add_param(val.clone()),
            Expr::Text(text) => {
                let quoted = r.dialect.quote_text(text);
                r.sql.push_str(&quoted);
            }
            Expr::Literal(raw) => r.sql.push_str(raw),
            Expr::Null => r.sql.push_str("NULL"),
            Expr::CurrentTimestamp => r.sql.push_str(r.dialect.current_timestamp()),
            Expr::BinaryOp(op) => op.render(r),
            Expr::FunctionCall(func) => func.render(r),
            Expr::Alias { expr, alias } => {
                expr.render(r);
                r.sql.push_str(" AS ");
                r.sql.push_str(&r.dialect.quote_identifier(alias));
            }
            Expr::Cast { expr, data_type } => render_cast("CAST", expr, data_type, r),
            Expr::TryCast { expr, data_type } => {
                if r.dialect.supports_try_cast() {
                    render_cast("TRY_CAST", expr, data_type, r);
                } else {
                    render_guarded_cast(expr, data_type, r);
                }
            }
            Expr::IsNull { expr, negated } => {
                expr.render(r);
                r.sql
                    .push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::Exists { subquery, negated } => {
                if *negated {
                    r.sql.push_str("NOT ");
                }
                r.sql.push_str("EXISTS (");
                subquery.render(r);
                r.sql.push(')');
            }
            Expr::RowNumber { order_by } => {
                r.sql.push_str("ROW_NUMBER() OVER (ORDER BY ");
                for (i, order) in order_by.iter().enumerate() {
                    if i > 0 {
                        r.sql.push_str(", ");
                    }
                    order.render(r);
                }
                r.sql.push(')');
            }
        }
    }
}

fn render_cast(keyword: &str, expr: &Expr, data_type: &DataType, r: &mut Renderer) {
    r.sql.push_str(keyword);
    r.sql.push('(');
    expr.render(r);
    r.sql.push_str(" AS ");
    r.sql.push_str(&r.dialect.render_data_type(data_type));
    r.sql.push(')');
}

/// `CASE WHEN CAST(x AS TEXT) ~ '<pattern>' THEN CASE WHEN <bound> THEN
/// CAST(x AS T) END END`.
///
/// The bound sits in its own CASE because the server may evaluate the
/// operands of AND in any order, and the NUMERIC cast inside the bound must
/// only see text that matched. Text targets need no guard. The inner
/// expression is rendered several times, so it must not contain parameters.
fn render_guarded_cast(expr: &Expr, data_type: &DataType, r: &mut Renderer) {
    if !data_type.is_numeric() {
        render_cast("CAST", expr, data_type, r);
        return;
    }

    r.sql.push_str("CASE WHEN ");
    render_cast("CAST", expr, &DataType::Text(None), r);
    r.sql.push_str(" ~ ");
    let pattern = r.dialect.quote_text(&numeric_pattern(data_type));
    r.sql.push_str(&pattern);
    r.sql.push_str(" THEN ");

    let bound = numeric_bound(data_type);
    if let Some(bound) = &bound {
        r.sql.push_str("CASE WHEN ");
        render_bound(expr, bound, r);
        r.sql.push_str(" THEN ");
    }
    render_cast("CAST", expr, data_type, r);
    if bound.is_some() {
        r.sql.push_str(" END");
    }
    r.sql.push_str(" END");
}

fn render_bound(expr: &Expr, bound: &NumericBound, r: &mut Renderer) {
    let render_numeric = |r: &mut Renderer| {
        r.sql.push_str("CAST(");
        render_cast("CAST", expr, &DataType::Text(None), r);
        r.sql.push_str(" AS NUMERIC)");
    };

    match bound {
        NumericBound::Between(min, max) => {
            render_numeric(r);
            r.sql.push_str(&format!(" BETWEEN {min} AND {max}"));
        }
        NumericBound::Below { scale, limit } => {
            r.sql.push_str("ABS(");
            match scale {
                Some(scale) => {
                    r.sql.push_str("ROUND(");
                    render_numeric(r);
                    r.sql.push_str(&format!(", {scale})"));
                }
                None => render_numeric(r),
            }
            r.sql.push_str(&format!(") < {limit}"));
        }
    }
}

impl Render for Ident {
    fn render(&self, r: &mut Renderer) {
        if let Some(qualifier) = &self.qualifier {
            r.sql.push_str(&r.dialect.quote_identifier(qualifier));
            r.sql.push('.');
        }
        r.sql.push_str(&r.dialect.quote_identifier(&self.name));
    }
}

impl Render for BinaryOp {
    fn render(&self, r: &mut Renderer) {
        r.sql.push('(');
        self.left.render(r);

        let op_str = match self.op {
            BinaryOperator::Eq => " = ",
            BinaryOperator::NotEq => " <> ",
            BinaryOperator::Like => " LIKE ",
            BinaryOperator::And => " AND ",
            BinaryOperator::Or => " OR ",
        };
        r.sql.push_str(op_str);

        self.right.render(r);
        r.sql.push(')');
    }
}

impl Render for FunctionCall {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str(&self.name);
        r.sql.push('(');
        if self.wildcard {
            r.sql.push('*');
        } else {
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    r.sql.push_str(", ");
                }
                arg.render(r);
            }
        }
        r.sql.push(')');
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{
        ast::{common::OrderDir, expr::Expr, select::OrderByExpr},
        dialect::{MsSql, Postgres},
        func, ident,
        renderer::render,
    };
    use model::core::data_type::DataType;

    #[test]
    fn test_try_cast_mssql() {
        let expr = ident("Price").try_cast(DataType::decimal(10, 2));
        let (sql, params) = render(&expr, &MsSql);
        assert_eq!(sql, "TRY_CAST([Price] AS DECIMAL(10,2))");
        assert!(params.is_empty());
    }

    #[test]
    fn test_try_cast_postgres_is_guarded() {
        let expr = ident("Rating").try_cast(DataType::decimal(3, 2));
        let (sql, _) = render(&expr, &Postgres);
        assert_eq!(
            sql,
            concat!(
                r#"CASE WHEN CAST("Rating" AS TEXT) ~ '^[[:space:]]*[-+]?([0-9]+([.][0-9]*)?|[.][0-9]+)[[:space:]]*$' "#,
                r#"THEN CASE WHEN ABS(ROUND(CAST(CAST("Rating" AS TEXT) AS NUMERIC), 2)) < 10 "#,
                r#"THEN CAST("Rating" AS NUMERIC(3,2)) END END"#
            )
        );
    }

    #[test]
    fn test_guarded_decimal_rejects_values_that_round_past_precision() {
        // 9.999 rounds to 10.00, which NUMERIC(3,2) cannot hold.
        let (sql, _) = render(&ident("Rating").try_cast(DataType::decimal(3, 2)), &Postgres);
        let bound = sql.find("ABS(ROUND(").unwrap();
        let cast = sql.find(r#"THEN CAST("Rating" AS NUMERIC(3,2))"#).unwrap();
        assert!(bound < cast);
        assert!(sql.contains(", 2)) < 10 THEN"));
    }

    #[test]
    fn test_guarded_int_is_bounded_by_value() {
        let (sql, _) = render(&ident("Num_of_Reviews").try_cast(DataType::Int), &Postgres);
        assert_eq!(
            sql,
            concat!(
                r#"CASE WHEN CAST("Num_of_Reviews" AS TEXT) ~ '^[[:space:]]*[-+]?[0-9]+[[:space:]]*$' "#,
                r#"THEN CASE WHEN CAST(CAST("Num_of_Reviews" AS TEXT) AS NUMERIC) BETWEEN -2147483648 AND 2147483647 "#,
                r#"THEN CAST("Num_of_Reviews" AS INTEGER) END END"#
            )
        );
    }

    #[test]
    fn test_try_cast_to_text_is_plain_cast_on_postgres() {
        let (sql, _) = render(&ident("Brand").try_cast(DataType::text(200)), &Postgres);
        assert_eq!(sql, r#"CAST("Brand" AS VARCHAR(200))"#);
    }

    #[test]
    fn test_generated_key() {
        let expr = func(
            "COALESCE",
            vec![
                ident("ASIN"),
                func(
                    "CONCAT",
                    vec![
                        Expr::Text("UNK-".into()),
                        Expr::RowNumber {
                            order_by: vec![OrderByExpr {
                                expr: ident("Product_Name"),
                                direction: Some(OrderDir::Asc),
                            }],
                        }
                        .cast(DataType::text(10)),
                    ],
                ),
            ],
        );
        let (sql, _) = render(&expr, &MsSql);
        assert_eq!(
            sql,
            "COALESCE([ASIN], CONCAT(N'UNK-', CAST(ROW_NUMBER() OVER (ORDER BY [Product_Name] ASC) AS NVARCHAR(10))))"
        );
    }

    #[test]
    fn test_null_checks_and_timestamp() {
        let (sql, _) = render(&ident("x").is_not_null(), &Postgres);
        assert_eq!(sql, r#""x" IS NOT NULL"#);
        let (sql, _) = render(&Expr::CurrentTimestamp, &MsSql);
        assert_eq!(sql, "GETDATE()");
    }
}
