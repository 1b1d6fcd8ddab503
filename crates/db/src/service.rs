//! Service layer for simpletodo
//!
//! Each use case runs as exactly one unit of work. Use cases that touch the
//! association (assign, unassign, delete with cascade) run as composite
//! units so both sides are committed together.

use crate::error::{DbError, DbResult};
use crate::models::{Association, Tag, Task};
use crate::transaction::TransactionManager;
use tracing::debug;

fn no_task(id: &str) -> DbError {
    DbError::task(format!("No task with ID {}", id))
}

fn no_tag(id: &str) -> DbError {
    DbError::tag(format!("No tag with ID {}", id))
}

/// Task and tag use cases over a transaction manager
pub struct TodoService<'a> {
    transactions: TransactionManager<'a>,
}

impl<'a> TodoService<'a> {
    /// Create a new service running its use cases through `transactions`
    pub fn new(transactions: TransactionManager<'a>) -> Self {
        Self { transactions }
    }

    /// List every task.
    pub async fn get_all_tasks(&self) -> DbResult<Vec<Task>> {
        self.transactions
            .task_transaction(async |tasks| tasks.find_all().await)
            .await
    }

    /// Look up a single task.
    pub async fn find_task_by_id(&self, id: &str) -> DbResult<Option<Task>> {
        self.transactions
            .task_transaction(async |tasks| tasks.find_by_id(id).await)
            .await
    }

    /// Store a new task.
    ///
    /// # Errors
    ///
    /// Returns a task error if a field is blank or the id is taken.
    pub async fn save_task(&self, task: &Task) -> DbResult<()> {
        if !task.is_complete() {
            return Err(DbError::task("Task ID and description must not be empty"));
        }

        self.transactions
            .task_transaction(async |tasks| {
                if tasks.find_by_id(&task.id).await?.is_some() {
                    return Err(DbError::task(format!(
                        "Cannot add task with duplicated ID {}",
                        task.id
                    )));
                }

                tasks.save(task);
                Ok(())
            })
            .await
    }

    /// Delete a task and strip its id from every tag that references it.
    ///
    /// # Returns
    ///
    /// The task as it was stored before deletion.
    ///
    /// # Errors
    ///
    /// Returns a task error if the task does not exist.
    pub async fn delete_task(&self, id: &str) -> DbResult<Task> {
        self.transactions
            .composite_transaction(async |tasks, tags| {
                let Some(task) = tasks.find_by_id(id).await? else {
                    return Err(DbError::task(format!(
                        "Task with ID {} has already been deleted",
                        id
                    )));
                };

                debug!("Deleting task {} and unlinking it from its tags", id);
                tags.remove_task_from_all_tags(&task.id);
                tasks.delete(&task.id);
                Ok(task)
            })
            .await
    }

    /// List every tag.
    pub async fn get_all_tags(&self) -> DbResult<Vec<Tag>> {
        self.transactions
            .tag_transaction(async |tags| tags.find_all().await)
            .await
    }

    /// Look up a single tag.
    pub async fn find_tag_by_id(&self, id: &str) -> DbResult<Option<Tag>> {
        self.transactions
            .tag_transaction(async |tags| tags.find_by_id(id).await)
            .await
    }

    /// Store a new tag.
    ///
    /// # Errors
    ///
    /// Returns a tag error if a field is blank, or the id or name is taken.
    pub async fn save_tag(&self, tag: &Tag) -> DbResult<()> {
        if !tag.is_complete() {
            return Err(DbError::tag("Tag ID and name must not be empty"));
        }

        self.transactions
            .tag_transaction(async |tags| {
                if tags.find_by_id(&tag.id).await?.is_some() {
                    return Err(DbError::tag(format!(
                        "Cannot add tag with duplicated ID {}",
                        tag.id
                    )));
                }

                if tags.find_by_name(&tag.name).await?.is_some() {
                    return Err(DbError::tag(format!(
                        "Cannot add tag with duplicated name \"{}\"",
                        tag.name
                    )));
                }

                tags.save(tag);
                Ok(())
            })
            .await
    }

    /// Delete a tag and strip its id from every task that references it.
    ///
    /// # Errors
    ///
    /// Returns a tag error if the tag does not exist.
    pub async fn delete_tag(&self, id: &str) -> DbResult<Tag> {
        self.transactions
            .composite_transaction(async |tasks, tags| {
                let Some(tag) = tags.find_by_id(id).await? else {
                    return Err(DbError::tag(format!(
                        "Tag with ID {} has already been deleted",
                        id
                    )));
                };

                debug!("Deleting tag {} and unlinking it from its tasks", id);
                tasks.remove_tag_from_all_tasks(&tag.id);
                tags.delete(&tag.id);
                Ok(tag)
            })
            .await
    }

    /// Assign a tag to a task, recording the link on both sides.
    ///
    /// # Errors
    ///
    /// Returns a task error if the task is missing or already carries the
    /// tag, and a tag error if the tag is missing.
    pub async fn add_tag_to_task(&self, task_id: &str, tag_id: &str) -> DbResult<Association> {
        self.transactions
            .composite_transaction(async |tasks, tags| {
                let task = tasks.find_by_id(task_id).await?.ok_or_else(|| no_task(task_id))?;
                let tag = tags.find_by_id(tag_id).await?.ok_or_else(|| no_tag(tag_id))?;

                let assigned = tasks.get_tags_by_task_id(task_id).await?.unwrap_or_default();
                if assigned.iter().any(|id| id == tag_id) {
                    return Err(DbError::task(format!(
                        "Tag with ID {} is already assigned to task with ID {}",
                        tag_id, task_id
                    )));
                }

                tasks.add_tag_to_task(task_id, tag_id);
                tags.add_task_to_tag(tag_id, task_id);
                Ok(Association { task, tag })
            })
            .await
    }

    /// Remove a tag from a task on both sides of the link.
    ///
    /// # Errors
    ///
    /// Returns a task error if the task is missing or does not carry the tag,
    /// and a tag error if the tag is missing.
    pub async fn remove_tag_from_task(
        &self,
        task_id: &str,
        tag_id: &str,
    ) -> DbResult<Association> {
        self.transactions
            .composite_transaction(async |tasks, tags| {
                let task = tasks.find_by_id(task_id).await?.ok_or_else(|| no_task(task_id))?;
                let tag = tags.find_by_id(tag_id).await?.ok_or_else(|| no_tag(tag_id))?;

                let assigned = tasks.get_tags_by_task_id(task_id).await?.unwrap_or_default();
                if !assigned.iter().any(|id| id == tag_id) {
                    return Err(DbError::task(format!(
                        "Tag with ID {} is not assigned to task with ID {}",
                        tag_id, task_id
                    )));
                }

                tasks.remove_tag_from_task(task_id, tag_id);
                tags.remove_task_from_tag(tag_id, task_id);
                Ok(Association { task, tag })
            })
            .await
    }

    /// Ids of the tags assigned to a task.
    ///
    /// # Errors
    ///
    /// Returns a task error if the task does not exist.
    pub async fn find_tags_by_task_id(&self, task_id: &str) -> DbResult<Vec<String>> {
        self.transactions
            .task_transaction(async |tasks| {
                tasks
                    .get_tags_by_task_id(task_id)
                    .await?
                    .ok_or_else(|| no_task(task_id))
            })
            .await
    }

    /// Ids of the tasks a tag is assigned to.
    ///
    /// # Errors
    ///
    /// Returns a tag error if the tag does not exist.
    pub async fn find_tasks_by_tag_id(&self, tag_id: &str) -> DbResult<Vec<String>> {
        self.transactions
            .tag_transaction(async |tags| {
                tags.get_tasks_by_tag_id(tag_id)
                    .await?
                    .ok_or_else(|| no_tag(tag_id))
            })
            .await
    }

    /// The tags assigned to a task, resolved in one unit of work.
    ///
    /// Ids that no longer resolve to a tag are skipped.
    pub async fn find_tags_of_task(&self, task_id: &str) -> DbResult<Vec<Tag>> {
        self.transactions
            .composite_transaction(async |tasks, tags| {
                let ids = tasks
                    .get_tags_by_task_id(task_id)
                    .await?
                    .ok_or_else(|| no_task(task_id))?;

                let mut resolved = Vec::with_capacity(ids.len());
                for id in &ids {
                    match tags.find_by_id(id).await? {
                        Some(tag) => resolved.push(tag),
                        None => debug!("Task {} references missing tag {}", task_id, id),
                    }
                }
                Ok(resolved)
            })
            .await
    }

    /// The tasks a tag is assigned to, resolved in one unit of work.
    ///
    /// Ids that no longer resolve to a task are skipped.
    pub async fn find_tasks_of_tag(&self, tag_id: &str) -> DbResult<Vec<Task>> {
        self.transactions
            .composite_transaction(async |tasks, tags| {
                let ids = tags
                    .get_tasks_by_tag_id(tag_id)
                    .await?
                    .ok_or_else(|| no_tag(tag_id))?;

                let mut resolved = Vec::with_capacity(ids.len());
                for id in &ids {
                    match tasks.find_by_id(id).await? {
                        Some(task) => resolved.push(task),
                        None => debug!("Tag {} references missing task {}", tag_id, id),
                    }
                }
                Ok(resolved)
            })
            .await
    }
}
