//! Task repository for CRUD operations on tasks
//!
//! Reads go straight to SurrealDB. Writes are staged in the enclosing
//! transaction's write set and applied when that transaction commits.

use crate::error::DbResult;
use crate::models::Task;
use crate::transaction::WriteSet;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::{debug, trace};

/// Repository for task CRUD and task-side association operations
///
/// Only obtainable inside a unit of work opened by the
/// [`TransactionManager`](crate::TransactionManager).
pub struct TaskRepository<'t> {
    client: &'t Surreal<Db>,
    table: &'t str,
    writes: &'t mut WriteSet,
}

impl<'t> TaskRepository<'t> {
    pub(crate) fn new(client: &'t Surreal<Db>, table: &'t str, writes: &'t mut WriteSet) -> Self {
        Self {
            client,
            table,
            writes,
        }
    }

    /// Fetch all tasks, ordered by id.
    pub async fn find_all(&self) -> DbResult<Vec<Task>> {
        debug!("Fetching all tasks from {}", self.table);
        let mut result = self
            .client
            .query("SELECT record::id(id) AS id, description FROM type::table($table) ORDER BY id")
            .bind(("table", self.table.to_string()))
            .await?;
        let tasks: Vec<Task> = result.take(0)?;
        trace!("Fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    /// Get a task by ID.
    ///
    /// # Returns
    ///
    /// `Some(Task)` if found, `None` otherwise.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Task>> {
        // Empty ids are not valid record keys
        if id.is_empty() {
            return Ok(None);
        }
        debug!("Fetching task: {}", id);
        let mut result = self
            .client
            .query("SELECT record::id(id) AS id, description FROM type::thing($table, $id)")
            .bind(("table", self.table.to_string()))
            .bind(("id", id.to_string()))
            .await?;
        let task: Option<Task> = result.take(0)?;
        if task.is_none() {
            debug!("Task not found: {}", id);
        }
        Ok(task)
    }

    /// Get the ids of the tags assigned to a task.
    ///
    /// # Returns
    ///
    /// `None` if the task does not exist.
    pub async fn get_tags_by_task_id(&self, id: &str) -> DbResult<Option<Vec<String>>> {
        // Empty ids are not valid record keys
        if id.is_empty() {
            return Ok(None);
        }
        debug!("Fetching tags of task: {}", id);
        let mut result = self
            .client
            .query("SELECT VALUE tags FROM type::thing($table, $id)")
            .bind(("table", self.table.to_string()))
            .bind(("id", id.to_string()))
            .await?;
        let tags: Option<Vec<String>> = result.take(0)?;
        Ok(tags)
    }

    /// Stage the creation of a task with no tags.
    pub fn save(&mut self, task: &Task) {
        debug!("Staging creation of task: {}", task.id);
        trace!("Task data: {:?}", task);
        let table = self.writes.bind(self.table);
        let id = self.writes.bind(&task.id);
        let description = self.writes.bind(&task.description);
        self.writes.push(format!(
            "CREATE type::thing({table}, {id}) SET description = {description}, tags = []"
        ));
    }

    /// Stage the deletion of a task.
    pub fn delete(&mut self, id: &str) {
        debug!("Staging deletion of task: {}", id);
        let table = self.writes.bind(self.table);
        let id = self.writes.bind(id);
        self.writes
            .push(format!("DELETE type::thing({table}, {id})"));
    }

    /// Stage adding a tag id to a task's tag list.
    pub fn add_tag_to_task(&mut self, task_id: &str, tag_id: &str) {
        debug!("Staging tag {} on task {}", tag_id, task_id);
        let table = self.writes.bind(self.table);
        let task_id = self.writes.bind(task_id);
        let tag_id = self.writes.bind(tag_id);
        self.writes.push(format!(
            "UPDATE type::thing({table}, {task_id}) SET tags += {tag_id}"
        ));
    }

    /// Stage removing a tag id from a task's tag list.
    pub fn remove_tag_from_task(&mut self, task_id: &str, tag_id: &str) {
        debug!("Staging removal of tag {} from task {}", tag_id, task_id);
        let table = self.writes.bind(self.table);
        let task_id = self.writes.bind(task_id);
        let tag_id = self.writes.bind(tag_id);
        self.writes.push(format!(
            "UPDATE type::thing({table}, {task_id}) SET tags -= {tag_id}"
        ));
    }

    /// Stage removing a tag id from every task that references it.
    pub fn remove_tag_from_all_tasks(&mut self, tag_id: &str) {
        debug!("Staging removal of tag {} from all tasks", tag_id);
        let table = self.writes.bind(self.table);
        let tag_id = self.writes.bind(tag_id);
        self.writes.push(format!(
            "UPDATE type::table({table}) SET tags -= {tag_id} WHERE tags CONTAINS {tag_id}"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_db, insert_task, tags_of_task};

    #[tokio::test]
    async fn test_find_all_on_empty_table() {
        let db = create_test_db().await.unwrap();
        let tasks = db
            .transactions()
            .task_transaction(async |tasks| tasks.find_all().await)
            .await
            .unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_find_all_returns_every_task_in_id_order() {
        let db = create_test_db().await.unwrap();
        insert_task(&db, &Task::new("2", "Second")).await;
        insert_task(&db, &Task::new("1", "First")).await;

        let tasks = db
            .transactions()
            .task_transaction(async |tasks| tasks.find_all().await)
            .await
            .unwrap();
        assert_eq!(tasks, vec![Task::new("1", "First"), Task::new("2", "Second")]);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let db = create_test_db().await.unwrap();
        insert_task(&db, &Task::new("1", "Start using TDD")).await;

        let (found, missing) = db
            .transactions()
            .task_transaction(async |tasks| {
                Ok((tasks.find_by_id("1").await?, tasks.find_by_id("9").await?))
            })
            .await
            .unwrap();
        assert_eq!(found, Some(Task::new("1", "Start using TDD")));
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_empty_id_matches_nothing() {
        let db = create_test_db().await.unwrap();
        insert_task(&db, &Task::new("1", "Start using TDD")).await;

        let (found, tags) = db
            .transactions()
            .task_transaction(async |tasks| {
                Ok((tasks.find_by_id("").await?, tasks.get_tags_by_task_id("").await?))
            })
            .await
            .unwrap();
        assert_eq!(found, None);
        assert_eq!(tags, None);
    }

    #[tokio::test]
    async fn test_save_is_applied_on_commit() {
        let db = create_test_db().await.unwrap();
        let task = Task::new("abc", "Write the docs");

        db.transactions()
            .task_transaction(async |tasks| {
                tasks.save(&task);
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(tags_of_task(&db, "abc").await, Some(vec![]));
        let found = db
            .transactions()
            .task_transaction(async |tasks| tasks.find_by_id("abc").await)
            .await
            .unwrap();
        assert_eq!(found, Some(task));
    }

    #[tokio::test]
    async fn test_staged_writes_are_not_visible_to_reads_in_same_unit() {
        let db = create_test_db().await.unwrap();

        let seen = db
            .transactions()
            .task_transaction(async |tasks| {
                tasks.save(&Task::new("1", "Pending"));
                tasks.find_by_id("1").await
            })
            .await
            .unwrap();
        assert_eq!(seen, None);
        assert_eq!(tags_of_task(&db, "1").await, Some(vec![]));
    }

    #[tokio::test]
    async fn test_ids_with_special_characters() {
        let db = create_test_db().await.unwrap();
        let task = Task::new("task 1/\"quoted\"", "Odd id");

        db.transactions()
            .task_transaction(async |tasks| {
                tasks.save(&task);
                Ok(())
            })
            .await
            .unwrap();

        let all = db
            .transactions()
            .task_transaction(async |tasks| tasks.find_all().await)
            .await
            .unwrap();
        assert_eq!(all, vec![task]);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = create_test_db().await.unwrap();
        insert_task(&db, &Task::new("1", "Doomed")).await;

        db.transactions()
            .task_transaction(async |tasks| {
                tasks.delete("1");
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(tags_of_task(&db, "1").await, None);
    }

    #[tokio::test]
    async fn test_add_and_remove_tag() {
        let db = create_test_db().await.unwrap();
        insert_task(&db, &Task::new("1", "Tagged")).await;

        db.transactions()
            .task_transaction(async |tasks| {
                tasks.add_tag_to_task("1", "t1");
                tasks.add_tag_to_task("1", "t2");
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(
            tags_of_task(&db, "1").await,
            Some(vec!["t1".to_string(), "t2".to_string()])
        );

        db.transactions()
            .task_transaction(async |tasks| {
                tasks.remove_tag_from_task("1", "t1");
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(tags_of_task(&db, "1").await, Some(vec!["t2".to_string()]));
    }

    #[tokio::test]
    async fn test_get_tags_by_task_id() {
        let db = create_test_db().await.unwrap();
        insert_task(&db, &Task::new("1", "Tagged")).await;

        let (existing, missing) = db
            .transactions()
            .task_transaction(async |tasks| {
                Ok((
                    tasks.get_tags_by_task_id("1").await?,
                    tasks.get_tags_by_task_id("2").await?,
                ))
            })
            .await
            .unwrap();
        assert_eq!(existing, Some(vec![]));
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_remove_tag_from_all_tasks() {
        let db = create_test_db().await.unwrap();
        insert_task(&db, &Task::new("1", "One")).await;
        insert_task(&db, &Task::new("2", "Two")).await;
        insert_task(&db, &Task::new("3", "Three")).await;

        db.transactions()
            .task_transaction(async |tasks| {
                tasks.add_tag_to_task("1", "work");
                tasks.add_tag_to_task("2", "work");
                tasks.add_tag_to_task("2", "home");
                Ok(())
            })
            .await
            .unwrap();

        db.transactions()
            .task_transaction(async |tasks| {
                tasks.remove_tag_from_all_tasks("work");
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(tags_of_task(&db, "1").await, Some(vec![]));
        assert_eq!(tags_of_task(&db, "2").await, Some(vec!["home".to_string()]));
        assert_eq!(tags_of_task(&db, "3").await, Some(vec![]));
    }
}
