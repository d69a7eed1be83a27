//! Application users in `config.users`, reported without their secrets.

use crate::error::EngineError;
use connectors::sql::base::adapter::SqlAdapter;
use model::core::{data_type::DataType, value::Value};
use planner::query::{
    ast::{common::OrderDir, common::TableRef, expr::Expr, select::Select},
    builder::select::SelectBuilder,
    count_all, ident,
    renderer::render,
    typed_value,
};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

pub const USERS_TABLE: &str = "config.users";

const VISIBLE_CHARS: usize = 3;

/// `abc****xyz` for secrets longer than six characters, all `*` otherwise.
pub fn mask_password(password: &str) -> String {
    let chars: Vec<char> = password.chars().collect();
    if chars.len() > VISIBLE_CHARS * 2 {
        let head: String = chars[..VISIBLE_CHARS].iter().collect();
        let tail: String = chars[chars.len() - VISIBLE_CHARS..].iter().collect();
        format!(
            "{head}{}{tail}",
            "*".repeat(chars.len() - VISIBLE_CHARS * 2)
        )
    } else {
        "*".repeat(chars.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub masked_password: String,
    pub password_length: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginCheck {
    Success,
    UnknownEmail,
    PasswordMismatch,
}

impl fmt::Display for LoginCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginCheck::Success => write!(f, "credentials accepted"),
            LoginCheck::UnknownEmail => write!(f, "email not found"),
            LoginCheck::PasswordMismatch => write!(f, "email found, password does not match"),
        }
    }
}

pub fn users_query() -> Select {
    SelectBuilder::new()
        .select(vec![
            ident("IdUser"),
            ident("NameUser"),
            ident("Email"),
            ident("Password"),
        ])
        .from(TableRef::parse(USERS_TABLE), None)
        .order_by(ident("IdUser"), Some(OrderDir::Asc))
        .build()
}

fn credential(value: &str) -> Expr {
    typed_value(Value::from(value), DataType::text(255))
}

/// Counts users matching `email`, and `password` when given.
pub fn login_query(email: &str, password: Option<&str>) -> Select {
    let condition = ident("Email").equals(credential(email));
    let condition = match password {
        Some(password) => condition.and(ident("Password").equals(credential(password))),
        None => condition,
    };
    SelectBuilder::new()
        .select(vec![count_all().alias("total")])
        .from(TableRef::parse(USERS_TABLE), None)
        .where_clause(condition)
        .build()
}

pub async fn list_users(adapter: &dyn SqlAdapter) -> Result<Vec<UserSummary>, EngineError> {
    let (sql, params) = render(&users_query(), adapter.dialect());
    let rows = adapter.query_rows(&sql, params).await?;

    let users: Vec<UserSummary> = rows
        .iter()
        .map(|row| {
            let password = row.get_string("Password").unwrap_or_default();
            UserSummary {
                id: row.get_value("IdUser").as_i64(),
                name: row.get_string("NameUser"),
                email: row.get_string("Email"),
                masked_password: mask_password(&password),
                password_length: password.chars().count(),
            }
        })
        .collect();

    info!("{} user(s) in {}", users.len(), USERS_TABLE);
    Ok(users)
}

async fn count(adapter: &dyn SqlAdapter, query: &Select) -> Result<i64, EngineError> {
    let (sql, params) = render(query, adapter.dialect());
    let rows = adapter.query_rows(&sql, params).await?;
    Ok(rows
        .first()
        .and_then(|row| row.get_at(0))
        .and_then(Value::as_i64)
        .unwrap_or(0))
}

/// Checks a test login with bound parameters only.
pub async fn check_login(
    adapter: &dyn SqlAdapter,
    email: &str,
    password: &str,
) -> Result<LoginCheck, EngineError> {
    let outcome = if count(adapter, &login_query(email, Some(password))).await? > 0 {
        LoginCheck::Success
    } else if count(adapter, &login_query(email, None)).await? > 0 {
        LoginCheck::PasswordMismatch
    } else {
        LoginCheck::UnknownEmail
    };

    match outcome {
        LoginCheck::Success => info!("Login check for {}: {}", email, outcome),
        _ => warn!("Login check for {}: {}", email, outcome),
    }
    Ok(outcome)
}
