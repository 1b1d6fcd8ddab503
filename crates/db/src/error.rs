use crate::transaction::TransactionScope;
use std::path::PathBuf;
use thiserror::Error;

/// Database error types for simpletodo
#[derive(Error, Debug)]
pub enum DbError {
    /// Error establishing connection to the database
    #[error("Failed to connect to database at {path}: {source}")]
    Connection {
        path: PathBuf,
        #[source]
        source: Box<surrealdb::Error>,
    },

    /// Error during schema initialization
    #[error("Failed to initialize database schema: {0}")]
    Schema(#[source] Box<surrealdb::Error>),

    /// Error executing a query
    #[error("Query execution failed")]
    Query(#[source] Box<surrealdb::Error>),

    /// Error creating database directory
    #[error("Failed to create database directory at {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rejected storage configuration (table names, namespace)
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A task-side rule was violated; the message is meant for the user
    #[error("{message}")]
    TaskRepository { message: String },

    /// A tag-side rule was violated; the message is meant for the user
    #[error("{message}")]
    TagRepository { message: String },

    /// A unit of work could not be committed and nothing was written
    #[error("{scope} transaction failed, aborting")]
    TransactionAborted {
        scope: TransactionScope,
        #[source]
        source: Box<DbError>,
    },
}

impl From<surrealdb::Error> for DbError {
    fn from(err: surrealdb::Error) -> Self {
        DbError::Query(Box::new(err))
    }
}

impl DbError {
    /// Shorthand for a task-side error with the given message.
    pub fn task(message: impl Into<String>) -> Self {
        DbError::TaskRepository {
            message: message.into(),
        }
    }

    /// Shorthand for a tag-side error with the given message.
    pub fn tag(message: impl Into<String>) -> Self {
        DbError::TagRepository {
            message: message.into(),
        }
    }

    /// Whether this error is a domain rule violation raised by a unit of work,
    /// as opposed to a storage failure.
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            DbError::TaskRepository { .. } | DbError::TagRepository { .. }
        )
    }

    /// Get the full error message including nested SurrealDB error details.
    ///
    /// This is useful for displaying detailed error information to users.
    pub fn full_message(&self) -> String {
        match self {
            DbError::Query(err) => format!("Query execution failed: {}", err),
            DbError::TransactionAborted { source, .. } => {
                format!("{}: {}", self, source.full_message())
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for database operations
pub type DbResult<T> = Result<T, DbError>;
