//! A SELECT-only convenience shim for the admin console.
//!
//! Queries are never sent to the database as SQL. A query that starts with
//! `select` has its table name parsed out and is turned into a structured
//! `select *` on that table through the store. Everything else is refused.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use std::time::Instant;

use crate::db::ContentStore;
use crate::errors::ServiceError;
use crate::models::TABLE_NAMES;

static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)from\s+([a-zA-Z_][a-zA-Z0-9_]*)").expect("valid table regex")
});

pub const WRITE_REFUSAL: &str = "For DDL/DML operations (CREATE, ALTER, INSERT, UPDATE, DELETE), \
     please use the Supabase Dashboard SQL Editor directly.";

#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<serde_json::Value>,
    pub row_count: usize,
    pub duration_ms: f64,
}

/// Work out which table a SELECT reads from, or why it cannot run.
pub fn target_table(query: &str) -> Result<&'static str, ServiceError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation("Please enter a SQL query".into()));
    }

    if !trimmed.to_lowercase().starts_with("select") {
        return Err(ServiceError::InvalidInput(WRITE_REFUSAL.into()));
    }

    let name = TABLE_RE
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| ServiceError::InvalidInput("Could not parse table name from query".into()))?;

    TABLE_NAMES
        .iter()
        .copied()
        .find(|t| t.eq_ignore_ascii_case(name))
        .ok_or_else(|| ServiceError::InvalidInput(format!("Unknown table: {name}")))
}

pub async fn execute(store: &dyn ContentStore, query: &str) -> Result<QueryResult, ServiceError> {
    let table = target_table(query)?;
    let started = Instant::now();

    let rows = store.select_all(table).await?;
    let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

    let columns = rows
        .first()
        .and_then(|row| row.as_object())
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default();

    tracing::info!("SQL console read {} rows from {table}", rows.len());

    Ok(QueryResult {
        columns,
        row_count: rows.len(),
        rows,
        duration_ms,
    })
}

/// Header of column names, then one line per row with every cell JSON-encoded.
/// Missing and null cells become `""`.
pub fn to_csv(result: &QueryResult) -> String {
    let mut lines = Vec::with_capacity(result.rows.len() + 1);
    lines.push(result.columns.join(","));

    for row in &result.rows {
        let cells: Vec<String> = result
            .columns
            .iter()
            .map(|col| match row.get(col) {
                None | Some(serde_json::Value::Null) => "\"\"".to_string(),
                Some(value) => value.to_string(),
            })
            .collect();
        lines.push(cells.join(","));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::portfolio::PortfolioFields;
    use serde_json::json;

    #[test]
    fn non_select_is_refused_with_dashboard_hint() {
        let err = target_table("DELETE FROM portfolios").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(err.to_string().contains("Supabase Dashboard"));
    }

    #[test]
    fn table_is_parsed_case_insensitively() {
        assert_eq!(
            target_table("  SELECT title FROM Portfolio_Tags WHERE name = 'x'").unwrap(),
            "portfolio_tags"
        );
    }

    #[test]
    fn empty_and_unknown_tables_are_rejected() {
        assert!(matches!(target_table("   "), Err(ServiceError::Validation(_))));
        assert!(matches!(target_table("select 1"), Err(ServiceError::InvalidInput(_))));
        assert!(matches!(
            target_table("select * from auth_users"),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn execute_reads_every_row_of_the_table() {
        let store = MemoryStore::new();
        store
            .insert_portfolio(PortfolioFields {
                title: "Console".into(),
                category: "Web Development".into(),
                ..PortfolioFields::default()
            })
            .await
            .unwrap();

        let result = execute(&store, "select * from portfolios").await.unwrap();
        assert_eq!(result.row_count, 1);
        assert!(result.columns.contains(&"title".to_string()));
    }

    #[test]
    fn csv_json_encodes_cells_and_blanks_nulls() {
        let result = QueryResult {
            columns: vec!["name".into(), "count".into(), "note".into()],
            rows: vec![json!({"name": "a,b", "count": 3, "note": null})],
            row_count: 1,
            duration_ms: 0.0,
        };
        assert_eq!(to_csv(&result), "name,count,note\n\"a,b\",3,\"\"");
    }
}
