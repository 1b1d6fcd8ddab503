//! Database schema initialization for simpletodo
//!
//! Defines the SurrealDB tables for tasks and tags. Each side stores the ids
//! of the records it is associated with, so the association lives on both
//! tables.

use crate::config::Tables;
use crate::error::DbError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::debug;

/// Build the definition of the task table.
fn define_task_table(table: &str) -> String {
    format!(
        r#"
        DEFINE TABLE IF NOT EXISTS {table} SCHEMAFULL;

        DEFINE FIELD IF NOT EXISTS description ON {table} TYPE string;

        DEFINE FIELD IF NOT EXISTS tags ON {table} TYPE array<string> DEFAULT [];
    "#
    )
}

/// Build the definition of the tag table, including the unique name index.
fn define_tag_table(table: &str) -> String {
    format!(
        r#"
        DEFINE TABLE IF NOT EXISTS {table} SCHEMAFULL;

        DEFINE FIELD IF NOT EXISTS name ON {table} TYPE string;

        DEFINE FIELD IF NOT EXISTS tasks ON {table} TYPE array<string> DEFAULT [];

        DEFINE INDEX IF NOT EXISTS {table}_name_unique ON {table} FIELDS name UNIQUE;
    "#
    )
}

/// Initialize the database schema.
///
/// Creates the task and tag tables with all required fields and the unique
/// tag name index. Safe to call repeatedly.
///
/// # Errors
///
/// Returns `DbError::Schema` if any schema definition fails.
pub async fn init_schema(client: &Surreal<Db>, tables: &Tables) -> Result<(), DbError> {
    debug!(
        "Initializing schema for tables {} and {}",
        tables.tasks(),
        tables.tags()
    );

    for definition in [
        define_task_table(tables.tasks()),
        define_tag_table(tables.tags()),
    ] {
        client
            .query(definition)
            .await
            .and_then(|response| response.check())
            .map_err(|e| DbError::Schema(Box::new(e)))?;
    }

    Ok(())
}
