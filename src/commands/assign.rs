//! Assign and unassign commands
//!
//! Link or unlink a tag and a task. Both sides of the link change together.

use crate::console::ConsoleView;
use crate::controller::TodoController;
use clap::Args;
use simpletodo_db::{Database, DbError};

/// Assign a tag to a task
#[derive(Debug, Args)]
pub struct AssignCommand {
    /// Task ID
    #[arg(required = true)]
    pub task_id: String,

    /// Tag ID
    #[arg(required = true)]
    pub tag_id: String,
}

impl AssignCommand {
    pub async fn execute(&self, db: &Database) -> Result<ConsoleView, DbError> {
        let mut controller = TodoController::new(db.service(), ConsoleView::new());
        controller.add_tag_to_task(&self.task_id, &self.tag_id).await;
        Ok(controller.into_view())
    }
}

/// Remove a tag from a task
#[derive(Debug, Args)]
pub struct UnassignCommand {
    /// Task ID
    #[arg(required = true)]
    pub task_id: String,

    /// Tag ID
    #[arg(required = true)]
    pub tag_id: String,
}

impl UnassignCommand {
    pub async fn execute(&self, db: &Database) -> Result<ConsoleView, DbError> {
        let mut controller = TodoController::new(db.service(), ConsoleView::new());
        controller
            .remove_tag_from_task(&self.task_id, &self.tag_id)
            .await;
        Ok(controller.into_view())
    }
}
