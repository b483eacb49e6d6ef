//! Dynamic WHERE clause construction for list queries.
//!
//! Conditions are added with a `{}` placeholder that is replaced by the next
//! positional parameter (`$1`, `$2`, ...). The collected values are then
//! bound in the same order onto either a row query or a count query.

use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::Postgres;
use stockroom_core::types::Timestamp;

/// Typed bind value for dynamically-built queries.
#[derive(Debug, Clone)]
pub enum BindValue {
    SmallInt(i16),
    BigInt(i64),
    Text(String),
    Timestamp(Timestamp),
}

#[derive(Debug, Default)]
pub struct FilterBuilder {
    conditions: Vec<String>,
    values: Vec<BindValue>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition with one bound value. `{}` in `condition` is
    /// replaced by the parameter marker; repeated `{}` reuse the same one.
    pub fn push(&mut self, condition: &str, value: BindValue) -> &mut Self {
        self.values.push(value);
        let marker = format!("${}", self.values.len());
        self.conditions.push(condition.replace("{}", &marker));
        self
    }

    /// Add a condition that binds nothing.
    pub fn push_raw(&mut self, condition: &str) -> &mut Self {
        self.conditions.push(condition.to_string());
        self
    }

    /// Case-insensitive substring match over one or more columns. `%` and
    /// `_` in `needle` match literally.
    pub fn push_search(&mut self, columns: &[&str], needle: &str) -> &mut Self {
        let clause = columns
            .iter()
            .map(|c| format!("{c} ILIKE {{}} ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        let pattern = format!("%{}%", escape_like(needle));
        self.push(&format!("({clause})"), BindValue::Text(pattern))
    }

    /// `WHERE a AND b ...`, or an empty string when no filter is active.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Index of the next free positional parameter.
    pub fn next_param(&self) -> usize {
        self.values.len() + 1
    }

    pub fn bind_rows<'q, O>(
        &'q self,
        mut q: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for val in &self.values {
            q = match val {
                BindValue::SmallInt(v) => q.bind(*v),
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q
    }

    pub fn bind_count<'q>(
        &'q self,
        mut q: QueryScalar<'q, Postgres, i64, PgArguments>,
    ) -> QueryScalar<'q, Postgres, i64, PgArguments> {
        for val in &self.values {
            q = match val {
                BindValue::SmallInt(v) => q.bind(*v),
                BindValue::BigInt(v) => q.bind(*v),
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Timestamp(v) => q.bind(*v),
            };
        }
        q
    }
}

/// Escape LIKE metacharacters with a backslash.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
