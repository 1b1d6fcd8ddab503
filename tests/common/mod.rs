//! Test infrastructure for integration tests
//!
//! Provides isolated database setup/teardown and CLI command helpers.
//! Each test gets its own on-disk database to ensure no shared state.

use simpletodo::ConsoleView;
use simpletodo::commands::{
    AddTagCommand, AddTaskCommand, AssignCommand, Command, TagAction, TagCommand, TaskAction,
    TaskCommand, UnassignCommand,
};
use simpletodo_db::{Database, DbConfig};
use std::path::PathBuf;

/// Test context containing an isolated database and temp directory
pub struct TestContext {
    pub db: Database,
    pub temp_dir: PathBuf,
}

impl TestContext {
    /// Create a new test context with the default configuration.
    pub async fn new() -> Self {
        Self::with_config(DbConfig::default()).await
    }

    /// Create a new test context with custom namespace, database and tables.
    ///
    /// Each call creates a uniquely named temp directory using process ID,
    /// thread ID, and nanosecond timestamp to guarantee isolation.
    pub async fn with_config(config: DbConfig) -> Self {
        let temp_dir = std::env::temp_dir().join(format!(
            "todo-integration-test-{}-{:?}-{}",
            std::process::id(),
            std::thread::current().id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));

        let db = Database::connect(&temp_dir, config).await.unwrap();
        db.init().await.unwrap();

        Self { db, temp_dir }
    }

    /// Run a command and return what it reported.
    pub async fn run(&self, cmd: Command) -> ConsoleView {
        cmd.execute(&self.db).await.unwrap()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.temp_dir);
    }
}

// =============================================================================
// Command Builder Helpers
// =============================================================================

pub fn task_add(id: &str, description: &str) -> Command {
    Command::Task(TaskCommand {
        action: TaskAction::Add(AddTaskCommand {
            description: description.to_string(),
            id: Some(id.to_string()),
        }),
    })
}

pub fn task_delete(id: &str) -> Command {
    Command::Task(TaskCommand {
        action: TaskAction::Delete { id: id.to_string() },
    })
}

pub fn task_list() -> Command {
    Command::Task(TaskCommand {
        action: TaskAction::List,
    })
}

pub fn task_tags(id: &str) -> Command {
    Command::Task(TaskCommand {
        action: TaskAction::Tags { id: id.to_string() },
    })
}

pub fn tag_add(id: &str, name: &str) -> Command {
    Command::Tag(TagCommand {
        action: TagAction::Add(AddTagCommand {
            name: name.to_string(),
            id: Some(id.to_string()),
        }),
    })
}

pub fn tag_delete(id: &str) -> Command {
    Command::Tag(TagCommand {
        action: TagAction::Delete { id: id.to_string() },
    })
}

pub fn tag_list() -> Command {
    Command::Tag(TagCommand {
        action: TagAction::List,
    })
}

pub fn tag_tasks(id: &str) -> Command {
    Command::Tag(TagCommand {
        action: TagAction::Tasks { id: id.to_string() },
    })
}

pub fn tag_assign(tag_id: &str, task_id: &str) -> Command {
    Command::Tag(TagCommand {
        action: TagAction::Assign {
            tag_id: tag_id.to_string(),
            task_id: task_id.to_string(),
        },
    })
}

pub fn tag_unassign(tag_id: &str, task_id: &str) -> Command {
    Command::Tag(TagCommand {
        action: TagAction::Unassign {
            tag_id: tag_id.to_string(),
            task_id: task_id.to_string(),
        },
    })
}

pub fn assign(task_id: &str, tag_id: &str) -> Command {
    Command::Assign(AssignCommand {
        task_id: task_id.to_string(),
        tag_id: tag_id.to_string(),
    })
}

pub fn unassign(task_id: &str, tag_id: &str) -> Command {
    Command::Unassign(UnassignCommand {
        task_id: task_id.to_string(),
        tag_id: tag_id.to_string(),
    })
}

// =============================================================================
// Query Helpers
// =============================================================================

/// Stored tag ids of a task, read straight from the service.
pub async fn tag_ids_of(db: &Database, task_id: &str) -> Vec<String> {
    db.service().find_tags_by_task_id(task_id).await.unwrap()
}

/// Stored task ids of a tag, read straight from the service.
pub async fn task_ids_of(db: &Database, tag_id: &str) -> Vec<String> {
    db.service().find_tasks_by_tag_id(tag_id).await.unwrap()
}
