//! CLI commands for simpletodo
//!
//! This module contains all subcommand implementations for the todo CLI.

pub mod assign;
pub mod tag;
pub mod task;

pub use assign::{AssignCommand, UnassignCommand};
pub use tag::{AddTagCommand, TagAction, TagCommand};
pub use task::{AddTaskCommand, TaskAction, TaskCommand};

use crate::console::ConsoleView;
use clap::Subcommand;
use simpletodo_db::{Database, DbError};

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage tasks
    Task(TaskCommand),
    /// Manage tags
    Tag(TagCommand),
    /// Assign a tag to a task
    Assign(AssignCommand),
    /// Remove a tag from a task
    Unassign(UnassignCommand),
}

impl Command {
    /// Execute the command with the given database connection.
    ///
    /// # Arguments
    ///
    /// * `db` - Reference to the database connection
    ///
    /// # Returns
    ///
    /// The view holding everything the command reported.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the command could not be carried out at all.
    pub async fn execute(&self, db: &Database) -> Result<ConsoleView, DbError> {
        match self {
            Command::Task(cmd) => cmd.execute(db).await,
            Command::Tag(cmd) => cmd.execute(db).await,
            Command::Assign(cmd) => cmd.execute(db).await,
            Command::Unassign(cmd) => cmd.execute(db).await,
        }
    }
}
