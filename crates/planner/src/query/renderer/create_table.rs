use crate::query::{
    ast::create_table::{ColumnDef, CreateTable, TableConstraint},
    renderer::{Render, Renderer},
};

impl Render for CreateTable {
    fn render(&self, r: &mut Renderer) {
        // Servers without IF NOT EXISTS get the statement wrapped in an
        // INFORMATION_SCHEMA existence check instead.
        let guarded = self.if_not_exists && !r.dialect.supports_create_if_not_exists();
        if guarded {
            render_existence_guard(self, r);
        }

        r.sql.push_str("CREATE TABLE ");
        if self.if_not_exists && !guarded {
            r.sql.push_str("IF NOT EXISTS ");
        }
        r.render_table_ref(&self.table);
        r.sql.push_str(" (");

        let num_cols = self.columns.len();
        for (i, col) in self.columns.iter().enumerate() {
            r.sql.push_str("\n\t");
            col.render(r);
            if i < num_cols - 1 || !self.constraints.is_empty() {
                r.sql.push(',');
            }
        }

        for (i, constraint) in self.constraints.iter().enumerate() {
            r.sql.push_str("\n\t");
            constraint.render(r);
            if i < self.constraints.len() - 1 {
                r.sql.push(',');
            }
        }

        r.sql.push_str("\n);");

        if guarded {
            r.sql.push_str("\nEND");
        }
    }
}

fn render_existence_guard(table: &CreateTable, r: &mut Renderer) {
    r.sql
        .push_str("IF NOT EXISTS (SELECT 1 FROM INFORMATION_SCHEMA.TABLES WHERE ");
    if let Some(schema) = &table.table.schema {
        let quoted = r.dialect.quote_text(schema);
        r.sql.push_str("TABLE_SCHEMA = ");
        r.sql.push_str(&quoted);
        r.sql.push_str(" AND ");
    }
    let quoted = r.dialect.quote_text(&table.table.name);
    r.sql.push_str("TABLE_NAME = ");
    r.sql.push_str(&quoted);
    r.sql.push_str(")\nBEGIN\n");
}

impl Render for ColumnDef {
    fn render(&self, r: &mut Renderer) {
        // Name and Type
        r.sql.push_str(&r.dialect.quote_identifier(&self.name));
        r.sql.push(' ');
        r.sql.push_str(&r.dialect.render_data_type(&self.data_type));

        // Constraints
        if self.is_identity {
            r.sql.push(' ');
            r.sql.push_str(r.dialect.identity_clause());
        }
        if self.is_primary_key {
            r.sql.push_str(" PRIMARY KEY");
        }
        if !self.is_nullable {
            r.sql.push_str(" NOT NULL");
        }
        if self.is_unique {
            r.sql.push_str(" UNIQUE");
        }
        if let Some(default) = &self.default_value {
            r.sql.push_str(" DEFAULT ");
            default.render(r);
        }
    }
}

impl Render for TableConstraint {
    fn render(&self, r: &mut Renderer) {
        match self {
            TableConstraint::PrimaryKey { columns } => {
                r.sql.push_str("PRIMARY KEY (");
                r.render_column_list(columns);
                r.sql.push(')');
            }
            TableConstraint::ForeignKey {
                columns,
                references,
                referenced_columns,
            } => {
                r.sql.push_str("FOREIGN KEY (");
                r.render_column_list(columns);
                r.sql.push_str(") REFERENCES ");
                r.render_table_ref(references);
                r.sql.push_str(" (");
                r.render_column_list(referenced_columns);
                r.sql.push(')');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use model::core::data_type::DataType;

    use crate::query::{
        ast::{
            common::TableRef,
            create_table::{ColumnDef, CreateTable, TableConstraint},
            expr::Expr,
        },
        dialect::{MsSql, Postgres},
        renderer::{Render, Renderer},
    };

    fn categories() -> CreateTable {
        CreateTable {
            table: TableRef::new("Categories"),
            if_not_exists: true,
            columns: vec![
                ColumnDef {
                    name: "Id".to_string(),
                    data_type: DataType::Int,
                    is_nullable: false,
                    is_primary_key: true,
                    is_identity: true,
                    is_unique: false,
                    default_value: None,
                },
                ColumnDef {
                    name: "Name".to_string(),
                    data_type: DataType::text(100),
                    is_nullable: false,
                    is_primary_key: false,
                    is_identity: false,
                    is_unique: true,
                    default_value: None,
                },
                ColumnDef {
                    name: "ParentCategoryId".to_string(),
                    data_type: DataType::Int,
                    is_nullable: true,
                    is_primary_key: false,
                    is_identity: false,
                    is_unique: false,
                    default_value: None,
                },
                ColumnDef {
                    name: "CreatedAt".to_string(),
                    data_type: DataType::Timestamp,
                    is_nullable: true,
                    is_primary_key: false,
                    is_identity: false,
                    is_unique: false,
                    default_value: Some(Expr::CurrentTimestamp),
                },
            ],
            constraints: vec![TableConstraint::ForeignKey {
                columns: vec!["ParentCategoryId".to_string()],
                references: TableRef::new("Categories"),
                referenced_columns: vec!["Id".to_string()],
            }],
        }
    }

    #[test]
    fn test_render_create_table_postgres() {
        let mut renderer = Renderer::new(&Postgres);
        categories().render(&mut renderer);
        let (sql, params) = renderer.finish();

        let expected_sql = r#"CREATE TABLE IF NOT EXISTS "Categories" (
	"Id" INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY NOT NULL,
	"Name" VARCHAR(100) NOT NULL UNIQUE,
	"ParentCategoryId" INTEGER,
	"CreatedAt" TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
	FOREIGN KEY ("ParentCategoryId") REFERENCES "Categories" ("Id")
);"#;
        assert_eq!(sql, expected_sql);
        assert!(params.is_empty());
    }

    #[test]
    fn test_render_create_table_mssql_is_guarded() {
        let mut renderer = Renderer::new(&MsSql);
        categories().render(&mut renderer);
        let (sql, _) = renderer.finish();

        let expected_sql = "IF NOT EXISTS (SELECT 1 FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = N'Categories')
BEGIN
CREATE TABLE [Categories] (
	[Id] INT IDENTITY(1,1) PRIMARY KEY NOT NULL,
	[Name] NVARCHAR(100) NOT NULL UNIQUE,
	[ParentCategoryId] INT,
	[CreatedAt] DATETIME2 DEFAULT GETDATE(),
	FOREIGN KEY ([ParentCategoryId]) REFERENCES [Categories] ([Id])
);
END";
        assert_eq!(sql, expected_sql);
    }
}
