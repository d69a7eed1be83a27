use crate::query::{
    ast::{
        common::{JoinKind, OrderDir},
        select::{FromClause, JoinClause, OrderByExpr, Select},
    },
    renderer::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        // 1. SELECT clause
        r.sql.push_str("SELECT ");
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                r.sql.push_str(", ");
            }
            col.render(r);
        }

        // 2. FROM
        if let Some(from) = &self.from {
            r.sql.push(' ');
            from.render(r);
        }

        // 3. JOIN
        for join in &self.joins {
            r.sql.push(' ');
            join.render(r);
        }

        // 4. WHERE
        if let Some(where_clause) = &self.where_clause {
            r.sql.push_str(" WHERE ");
            where_clause.render(r);
        }

        // 5. ORDER BY
        if !self.order_by.is_empty() {
            r.sql.push_str(" ORDER BY ");
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    r.sql.push_str(", ");
                }
                order.render(r);
            }
        }
    }
}

impl Render for FromClause {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("FROM ");
        r.render_table_ref(&self.table);
        if let Some(alias) = &self.alias {
            r.sql.push_str(" AS ");
            r.sql.push_str(&r.dialect.quote_identifier(alias));
        }
    }
}

impl Render for JoinClause {
    fn render(&self, r: &mut Renderer) {
        let join_str = match self.kind {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
        };
        r.sql.push_str(join_str);
        r.sql.push(' ');
        r.render_table_ref(&self.table);
        if let Some(alias) = &self.alias {
            r.sql.push_str(" AS ");
            r.sql.push_str(&r.dialect.quote_identifier(alias));
        }
        r.sql.push_str(" ON ");
        self.on.render(r);
    }
}

impl Render for OrderByExpr {
    fn render(&self, r: &mut Renderer) {
        self.expr.render(r);
        if let Some(dir) = &self.direction {
            let dir_str = match dir {
                OrderDir::Asc => "ASC",
                OrderDir::Desc => "DESC",
            };
            r.sql.push(' ');
            r.sql.push_str(dir_str);
        }
    }
}

#[cfg(test)]
mod tests {
    use model::core::value::Value;

    use crate::query::{
        ast::{
            common::{JoinKind, TableRef},
            select::{FromClause, JoinClause, Select},
        },
        count_all,
        dialect::{MsSql, Postgres},
        ident, qualified,
        renderer::{Render, Renderer},
        value,
    };

    #[test]
    fn test_simple_select_postgres() {
        let ast = Select {
            columns: vec![ident("Id"), ident("Name")],
            from: Some(FromClause {
                table: TableRef::new("Brands"),
                alias: None,
            }),
            where_clause: Some(ident("Name").equals(value(Value::from("PROTEO")))),
            ..Default::default()
        };

        let dialect = Postgres;
        let mut renderer = Renderer::new(&dialect);
        ast.render(&mut renderer);
        let (sql, params) = renderer.finish();

        assert_eq!(sql, r#"SELECT "Id", "Name" FROM "Brands" WHERE ("Name" = $1)"#);
        assert_eq!(params, vec![Value::from("PROTEO")]);
    }

    #[test]
    fn test_count_with_schema_mssql() {
        let ast = Select {
            columns: vec![count_all()],
            from: Some(FromClause {
                table: TableRef::with_schema("config", "users"),
                alias: None,
            }),
            ..Default::default()
        };

        let mut renderer = Renderer::new(&MsSql);
        ast.render(&mut renderer);
        let (sql, _) = renderer.finish();

        assert_eq!(sql, "SELECT COUNT(*) FROM [config].[users]");
    }

    #[test]
    fn test_inner_join_mssql() {
        let ast = Select {
            columns: vec![qualified("p", "Id"), qualified("sa", "Key_Labels")],
            from: Some(FromClause {
                table: TableRef::new("temp_selected_analysis"),
                alias: Some("sa".to_string()),
            }),
            joins: vec![JoinClause {
                kind: JoinKind::Inner,
                table: TableRef::new("Products"),
                alias: Some("p".to_string()),
                on: qualified("p", "ASIN").equals(qualified("sa", "ASIN")),
            }],
            where_clause: Some(qualified("sa", "Value_Proposition").is_not_null()),
            ..Default::default()
        };

        let mut renderer = Renderer::new(&MsSql);
        ast.render(&mut renderer);
        let (sql, params) = renderer.finish();

        assert_eq!(
            sql,
            concat!(
                "SELECT [p].[Id], [sa].[Key_Labels] FROM [temp_selected_analysis] AS [sa] ",
                "INNER JOIN [Products] AS [p] ON ([p].[ASIN] = [sa].[ASIN]) ",
                "WHERE [sa].[Value_Proposition] IS NOT NULL"
            )
        );
        assert!(params.is_empty());
    }
}
