//! Storage configuration
//!
//! Namespace, database and table names used by the SurrealDB backend.

use crate::error::{DbError, DbResult};

/// Default SurrealDB namespace
pub const DEFAULT_NAMESPACE: &str = "simpletodo";

/// Default SurrealDB database within the namespace
pub const DEFAULT_DATABASE: &str = "main";

/// Default name of the task table
pub const DEFAULT_TASKS_TABLE: &str = "task";

/// Default name of the tag table
pub const DEFAULT_TAGS_TABLE: &str = "tag";

/// Names of the two tables holding tasks and tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    tasks: String,
    tags: String,
}

impl Tables {
    /// Build a validated pair of table names.
    ///
    /// Both names must be plain identifiers and must differ, since they are
    /// spliced into schema definitions.
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidConfig` if either name is rejected.
    pub fn new(tasks: impl Into<String>, tags: impl Into<String>) -> DbResult<Self> {
        let tasks = tasks.into();
        let tags = tags.into();
        validate_table_name(&tasks)?;
        validate_table_name(&tags)?;
        if tasks == tags {
            return Err(DbError::InvalidConfig {
                message: format!("tasks and tags cannot share the table '{}'", tasks),
            });
        }
        Ok(Self { tasks, tags })
    }

    /// Table holding task records
    pub fn tasks(&self) -> &str {
        &self.tasks
    }

    /// Table holding tag records
    pub fn tags(&self) -> &str {
        &self.tags
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            tasks: DEFAULT_TASKS_TABLE.to_string(),
            tags: DEFAULT_TAGS_TABLE.to_string(),
        }
    }
}

/// Where inside SurrealDB the application keeps its data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub namespace: String,
    pub database: String,
    pub tables: Tables,
}

impl DbConfig {
    /// Build a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidConfig` if a name is not an identifier.
    pub fn new(
        namespace: impl Into<String>,
        database: impl Into<String>,
        tables: Tables,
    ) -> DbResult<Self> {
        let namespace = namespace.into();
        let database = database.into();
        validate_identifier("namespace", &namespace)?;
        validate_identifier("database", &database)?;
        Ok(Self {
            namespace,
            database,
            tables,
        })
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            tables: Tables::default(),
        }
    }
}

/// SurrealQL keywords that cannot be spliced in as a bare table name
const RESERVED_TABLE_NAMES: &[&str] = &[
    "and", "begin", "break", "cancel", "commit", "content", "continue", "create", "define",
    "delete", "else", "end", "false", "fetch", "field", "for", "from", "group", "if", "index",
    "info", "insert", "kill", "let", "limit", "live", "merge", "none", "not", "null", "on",
    "only", "option", "or", "order", "parallel", "patch", "relate", "remove", "return",
    "select", "set", "show", "sleep", "split", "start", "table", "then", "throw", "timeout",
    "transaction", "true", "type", "unset", "update", "upsert", "use", "value", "where",
];

fn validate_table_name(name: &str) -> DbResult<()> {
    validate_identifier("table", name)?;
    if RESERVED_TABLE_NAMES
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(name))
    {
        return Err(DbError::InvalidConfig {
            message: format!("table name '{}' is a reserved word", name),
        });
    }
    Ok(())
}

fn validate_identifier(kind: &str, name: &str) -> DbResult<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(DbError::InvalidConfig {
            message: format!("{} name '{}' is not an identifier", kind, name),
        })
    }
}
