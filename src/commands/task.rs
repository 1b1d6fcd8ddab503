//! Task commands
//!
//! Implements `todo task add|delete|list|tags`.

use crate::console::ConsoleView;
use crate::controller::TodoController;
use crate::id::IdGenerator;
use clap::{Args, Subcommand};
use simpletodo_db::{Database, DbError};

/// Manage tasks
#[derive(Debug, Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

/// Task subcommands
#[derive(Debug, Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add(AddTaskCommand),
    /// Delete a task and unassign it from its tags
    Delete {
        /// Task ID
        id: String,
    },
    /// List all tasks
    List,
    /// Show the tags assigned to a task
    Tags {
        /// Task ID
        id: String,
    },
}

/// Create a new task
#[derive(Debug, Args)]
pub struct AddTaskCommand {
    /// What needs doing
    #[arg(required = true)]
    pub description: String,

    /// Explicit ID (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,
}

impl TaskCommand {
    /// Execute the task command.
    ///
    /// # Errors
    ///
    /// Returns `DbError` only when no free id could be generated; failures of
    /// the action itself are reported through the view.
    pub async fn execute(&self, db: &Database) -> Result<ConsoleView, DbError> {
        let mut controller = TodoController::new(db.service(), ConsoleView::new());

        match &self.action {
            TaskAction::Add(cmd) => {
                let id = match &cmd.id {
                    Some(id) => id.clone(),
                    None => generate_unique_id(db, &cmd.description).await?,
                };
                controller.add_task(&id, &cmd.description).await;
            }
            TaskAction::Delete { id } => controller.delete_task(id).await,
            TaskAction::List => controller.get_all_tasks().await,
            TaskAction::Tags { id } => controller.get_tags_by_task(id).await,
        }

        Ok(controller.into_view())
    }
}

/// Generate an id not yet used by any task.
async fn generate_unique_id(db: &Database, description: &str) -> Result<String, DbError> {
    let service = db.service();
    let mut generator = IdGenerator::new(description);

    while let Some(id) = generator.next_id() {
        if service.find_task_by_id(&id).await?.is_none() {
            return Ok(id);
        }
    }

    Err(DbError::task(
        "Failed to generate a unique task ID after maximum retries",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use simpletodo_db::DbConfig;

    async fn test_db() -> Database {
        let db = Database::in_memory(DbConfig::default()).await.unwrap();
        db.init().await.unwrap();
        db
    }

    fn add(description: &str, id: Option<&str>) -> TaskCommand {
        TaskCommand {
            action: TaskAction::Add(AddTaskCommand {
                description: description.to_string(),
                id: id.map(String::from),
            }),
        }
    }

    #[tokio::test]
    async fn test_add_with_explicit_id() {
        let db = test_db().await;
        let view = add("Start using TDD", Some("1")).execute(&db).await.unwrap();

        assert_eq!(view.output(), "Created task: 1 - Start using TDD");
        assert!(!view.has_error());
    }

    #[tokio::test]
    async fn test_add_generates_id() {
        let db = test_db().await;
        let view = add("Write the docs", None).execute(&db).await.unwrap();
        assert!(!view.has_error(), "{}", view.output());

        let tasks = db.service().get_all_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id.len(), 6);
        assert_eq!(tasks[0].description, "Write the docs");
    }

    #[tokio::test]
    async fn test_add_blank_description_reports_error() {
        let db = test_db().await;
        let view = add(" ", None).execute(&db).await.unwrap();

        assert!(view.has_error());
        assert_eq!(
            view.output(),
            "error: Task ID and description must not be empty"
        );
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let db = test_db().await;
        add("Start using TDD", Some("1")).execute(&db).await.unwrap();

        let view = TaskCommand {
            action: TaskAction::Delete { id: "1".to_string() },
        }
        .execute(&db)
        .await
        .unwrap();
        assert_eq!(view.output(), "Deleted task: 1 - Start using TDD");

        let view = TaskCommand {
            action: TaskAction::List,
        }
        .execute(&db)
        .await
        .unwrap();
        assert_eq!(view.output(), "No tasks found.");
    }

    #[tokio::test]
    async fn test_tags_of_missing_task() {
        let db = test_db().await;
        let view = TaskCommand {
            action: TaskAction::Tags { id: "9".to_string() },
        }
        .execute(&db)
        .await
        .unwrap();

        assert!(view.has_error());
        assert_eq!(view.output(), "error: No task with ID 9");
    }
}
