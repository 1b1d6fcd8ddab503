//! Tag commands
//!
//! Implements `todo tag add|delete|list|tasks|assign|unassign`.

use crate::console::ConsoleView;
use crate::controller::TodoController;
use crate::id::IdGenerator;
use clap::{Args, Subcommand};
use simpletodo_db::{Database, DbError};

/// Manage tags
#[derive(Debug, Args)]
pub struct TagCommand {
    #[command(subcommand)]
    pub action: TagAction,
}

/// Tag subcommands
#[derive(Debug, Subcommand)]
pub enum TagAction {
    /// Create a new tag
    Add(AddTagCommand),
    /// Delete a tag and remove it from every task
    Delete {
        /// Tag ID
        id: String,
    },
    /// List all tags
    List,
    /// Show the tasks a tag is assigned to
    Tasks {
        /// Tag ID
        id: String,
    },
    /// Assign a tag to a task
    Assign {
        /// Tag ID
        tag_id: String,
        /// Task ID
        task_id: String,
    },
    /// Remove a tag from a task
    Unassign {
        /// Tag ID
        tag_id: String,
        /// Task ID
        task_id: String,
    },
}

/// Create a new tag
#[derive(Debug, Args)]
pub struct AddTagCommand {
    /// Tag name, unique across tags
    #[arg(required = true)]
    pub name: String,

    /// Explicit ID (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,
}

impl TagCommand {
    /// Execute the tag command.
    ///
    /// # Errors
    ///
    /// Returns `DbError` only when no free id could be generated.
    pub async fn execute(&self, db: &Database) -> Result<ConsoleView, DbError> {
        let mut controller = TodoController::new(db.service(), ConsoleView::new());

        match &self.action {
            TagAction::Add(cmd) => {
                let id = match &cmd.id {
                    Some(id) => id.clone(),
                    None => generate_unique_id(db, &cmd.name).await?,
                };
                controller.add_tag(&id, &cmd.name).await;
            }
            TagAction::Delete { id } => controller.delete_tag(id).await,
            TagAction::List => controller.get_all_tags().await,
            TagAction::Tasks { id } => controller.get_tasks_by_tag(id).await,
            TagAction::Assign { tag_id, task_id } => {
                controller.add_task_to_tag(tag_id, task_id).await
            }
            TagAction::Unassign { tag_id, task_id } => {
                controller.remove_task_from_tag(tag_id, task_id).await
            }
        }

        Ok(controller.into_view())
    }
}

/// Generate an id not yet used by any tag.
async fn generate_unique_id(db: &Database, name: &str) -> Result<String, DbError> {
    let service = db.service();
    let mut generator = IdGenerator::new(name);

    while let Some(id) = generator.next_id() {
        if service.find_tag_by_id(&id).await?.is_none() {
            return Ok(id);
        }
    }

    Err(DbError::tag(
        "Failed to generate a unique tag ID after maximum retries",
    ))
}
