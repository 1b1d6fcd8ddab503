//! Units of work spanning the task and tag repositories
//!
//! A unit of work is an async closure that receives one or both repositories.
//! Its reads hit the database directly while its writes are staged; when the
//! closure succeeds every staged write is sent to SurrealDB inside a single
//! `BEGIN TRANSACTION ... COMMIT TRANSACTION` block, so either all of them
//! land or none do.
//!
//! Units issued through the same manager are serialized by an async mutex
//! held from the first read to the commit. Units must not open another unit
//! themselves; the mutex is not reentrant.

use crate::config::Tables;
use crate::error::{DbError, DbResult};
use crate::repository::{TagRepository, TaskRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

/// Which repositories a unit of work was given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionScope {
    Task,
    Tag,
    Composite,
}

impl TransactionScope {
    /// Returns the name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionScope::Task => "Task",
            TransactionScope::Tag => "Tag",
            TransactionScope::Composite => "Composite",
        }
    }
}

impl std::fmt::Display for TransactionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Statements staged by one repository, with their bound parameters.
///
/// Parameter names carry the owning repository's prefix so that write sets
/// from both repositories can share one query.
#[derive(Debug)]
pub(crate) struct WriteSet {
    prefix: &'static str,
    statements: Vec<String>,
    bindings: Vec<(String, String)>,
}

impl WriteSet {
    pub(crate) fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            statements: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Register a parameter value and return its `$name` placeholder.
    pub(crate) fn bind(&mut self, value: impl Into<String>) -> String {
        let name = format!("{}_p{}", self.prefix, self.bindings.len());
        let placeholder = format!("${}", name);
        self.bindings.push((name, value.into()));
        placeholder
    }

    pub(crate) fn push(&mut self, statement: String) {
        trace!("Staged: {}", statement);
        self.statements.push(statement);
    }

    pub(crate) fn len(&self) -> usize {
        self.statements.len()
    }
}

/// Runs units of work against the task and tag repositories
pub struct TransactionManager<'a> {
    client: &'a Surreal<Db>,
    tables: &'a Tables,
    lock: &'a Mutex<()>,
}

impl<'a> TransactionManager<'a> {
    /// Create a manager over the given client and tables.
    ///
    /// All managers that should exclude each other must share `lock`.
    pub fn new(client: &'a Surreal<Db>, tables: &'a Tables, lock: &'a Mutex<()>) -> Self {
        Self {
            client,
            tables,
            lock,
        }
    }

    /// Run a unit of work against the task repository only.
    ///
    /// # Errors
    ///
    /// Domain errors returned by `work` are passed through unchanged and
    /// nothing is written. Any other failure, including a failed commit,
    /// becomes `DbError::TransactionAborted` with scope `Task`.
    pub async fn task_transaction<T, F>(&self, work: F) -> DbResult<T>
    where
        F: AsyncFnOnce(&mut TaskRepository<'_>) -> DbResult<T>,
    {
        let _guard = self.lock.lock().await;
        debug!("Task transaction started");

        let mut task_writes = WriteSet::new("task");
        let outcome = {
            let mut tasks = TaskRepository::new(self.client, self.tables.tasks(), &mut task_writes);
            work(&mut tasks).await
        };

        self.finish(TransactionScope::Task, outcome, vec![task_writes])
            .await
    }

    /// Run a unit of work against the tag repository only.
    ///
    /// # Errors
    ///
    /// Same contract as [`task_transaction`](Self::task_transaction), with
    /// scope `Tag`.
    pub async fn tag_transaction<T, F>(&self, work: F) -> DbResult<T>
    where
        F: AsyncFnOnce(&mut TagRepository<'_>) -> DbResult<T>,
    {
        let _guard = self.lock.lock().await;
        debug!("Tag transaction started");

        let mut tag_writes = WriteSet::new("tag");
        let outcome = {
            let mut tags = TagRepository::new(self.client, self.tables.tags(), &mut tag_writes);
            work(&mut tags).await
        };

        self.finish(TransactionScope::Tag, outcome, vec![tag_writes])
            .await
    }

    /// Run a unit of work against both repositories.
    ///
    /// Writes staged through either repository are committed together.
    ///
    /// # Errors
    ///
    /// Same contract as [`task_transaction`](Self::task_transaction), with
    /// scope `Composite`.
    pub async fn composite_transaction<T, F>(&self, work: F) -> DbResult<T>
    where
        F: AsyncFnOnce(&mut TaskRepository<'_>, &mut TagRepository<'_>) -> DbResult<T>,
    {
        let _guard = self.lock.lock().await;
        debug!("Composite transaction started");

        let mut task_writes = WriteSet::new("task");
        let mut tag_writes = WriteSet::new("tag");
        let outcome = {
            let mut tasks = TaskRepository::new(self.client, self.tables.tasks(), &mut task_writes);
            let mut tags = TagRepository::new(self.client, self.tables.tags(), &mut tag_writes);
            work(&mut tasks, &mut tags).await
        };

        self.finish(
            TransactionScope::Composite,
            outcome,
            vec![task_writes, tag_writes],
        )
        .await
    }

    /// Commit or abort depending on the outcome of the unit of work.
    async fn finish<T>(
        &self,
        scope: TransactionScope,
        outcome: DbResult<T>,
        writes: Vec<WriteSet>,
    ) -> DbResult<T> {
        match outcome {
            Ok(value) => {
                self.commit(scope, writes).await?;
                Ok(value)
            }
            Err(err) if err.is_domain() => {
                debug!("{} transaction rejected: {}", scope, err);
                Err(err)
            }
            Err(err) => {
                warn!("{} transaction failed, aborting: {}", scope, err.full_message());
                Err(DbError::TransactionAborted {
                    scope,
                    source: Box::new(err),
                })
            }
        }
    }

    /// Send every staged statement to SurrealDB as one transaction.
    async fn commit(&self, scope: TransactionScope, writes: Vec<WriteSet>) -> DbResult<()> {
        let count: usize = writes.iter().map(WriteSet::len).sum();
        if count == 0 {
            debug!("{} transaction had nothing to commit", scope);
            return Ok(());
        }

        let mut sql = String::from("BEGIN TRANSACTION;\n");
        let mut bindings = Vec::new();
        for set in writes {
            for statement in set.statements {
                sql.push_str(&statement);
                sql.push_str(";\n");
            }
            bindings.extend(set.bindings);
        }
        sql.push_str("COMMIT TRANSACTION;");
        trace!("Committing: {}", sql);

        let mut query = self.client.query(sql);
        for binding in bindings {
            query = query.bind(binding);
        }

        query
            .await
            .and_then(|response| response.check())
            .map_err(|e| {
                warn!("{} transaction commit failed: {}", scope, e);
                DbError::TransactionAborted {
                    scope,
                    source: Box::new(DbError::Query(Box::new(e))),
                }
            })?;

        info!("{} transaction committed {} statement(s)", scope, count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Tag, Task};
    use crate::test_utils::{create_test_db, insert_tag, insert_task, tags_of_task, tasks_of_tag};

    #[test]
    fn test_scope_display() {
        assert_eq!(TransactionScope::Task.to_string(), "Task");
        assert_eq!(TransactionScope::Tag.to_string(), "Tag");
        assert_eq!(TransactionScope::Composite.to_string(), "Composite");
    }

    #[test]
    fn test_write_set_placeholders_are_unique_and_prefixed() {
        let mut writes = WriteSet::new("task");
        assert_eq!(writes.bind("a"), "$task_p0");
        assert_eq!(writes.bind("b"), "$task_p1");
        assert_eq!(
            writes.bindings,
            vec![
                ("task_p0".to_string(), "a".to_string()),
                ("task_p1".to_string(), "b".to_string())
            ]
        );
        assert_eq!(writes.len(), 0);
    }

    #[tokio::test]
    async fn test_task_transaction_returns_value() {
        let db = create_test_db().await.unwrap();
        insert_task(&db, &Task::new("1", "Start using TDD")).await;

        let count = db
            .transactions()
            .task_transaction(async |tasks| Ok(tasks.find_all().await?.len()))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_composite_transaction_commits_both_sides() {
        let db = create_test_db().await.unwrap();
        let task = Task::new("1", "Start using TDD");
        let tag = Tag::new("1", "Work");

        db.transactions()
            .composite_transaction(async |tasks, tags| {
                tasks.save(&task);
                tags.save(&tag);
                tasks.add_tag_to_task(&task.id, &tag.id);
                tags.add_task_to_tag(&tag.id, &task.id);
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(tags_of_task(&db, "1").await, Some(vec!["1".to_string()]));
        assert_eq!(tasks_of_tag(&db, "1").await, Some(vec!["1".to_string()]));
    }

    #[tokio::test]
    async fn test_domain_error_discards_staged_writes() {
        let db = create_test_db().await.unwrap();
        insert_task(&db, &Task::new("1", "Start using TDD")).await;
        insert_tag(&db, &Tag::new("1", "Work")).await;

        let result: DbResult<()> = db
            .transactions()
            .composite_transaction(async |tasks, tags| {
                tasks.add_tag_to_task("1", "1");
                tags.add_task_to_tag("1", "1");
                Err(DbError::task("changed my mind"))
            })
            .await;

        match result {
            Err(DbError::TaskRepository { message }) => assert_eq!(message, "changed my mind"),
            other => panic!("Expected the domain error back, got {:?}", other),
        }
        assert_eq!(tags_of_task(&db, "1").await, Some(vec![]));
        assert_eq!(tasks_of_tag(&db, "1").await, Some(vec![]));
    }

    #[tokio::test]
    async fn test_failed_commit_rolls_back_every_write() {
        let db = create_test_db().await.unwrap();
        insert_task(&db, &Task::new("1", "Start using TDD")).await;
        insert_tag(&db, &Tag::new("1", "Work")).await;

        // The second CREATE collides with an existing record, so the whole
        // batch must be rejected, including the association updates.
        let result: DbResult<()> = db
            .transactions()
            .composite_transaction(async |tasks, tags| {
                tasks.add_tag_to_task("1", "1");
                tags.add_task_to_tag("1", "1");
                tags.save(&Tag::new("1", "Duplicate"));
                Ok(())
            })
            .await;

        match result {
            Err(DbError::TransactionAborted { scope, .. }) => {
                assert_eq!(scope, TransactionScope::Composite)
            }
            other => panic!("Expected TransactionAborted, got {:?}", other),
        }
        assert_eq!(tags_of_task(&db, "1").await, Some(vec![]));
        assert_eq!(tasks_of_tag(&db, "1").await, Some(vec![]));
    }

    #[tokio::test]
    async fn test_failed_commit_reports_task_scope() {
        let db = create_test_db().await.unwrap();
        insert_task(&db, &Task::new("1", "Start using TDD")).await;

        let err = db
            .transactions()
            .task_transaction(async |tasks| {
                tasks.save(&Task::new("1", "Again"));
                Ok(())
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Task transaction failed, aborting");
    }

    #[tokio::test]
    async fn test_unique_tag_name_violation_aborts_tag_transaction() {
        let db = create_test_db().await.unwrap();
        insert_tag(&db, &Tag::new("1", "Work")).await;

        let err = db
            .transactions()
            .tag_transaction(async |tags| {
                tags.save(&Tag::new("2", "Work"));
                Ok(())
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Tag transaction failed, aborting");
        assert_eq!(tasks_of_tag(&db, "2").await, None);
    }

    #[tokio::test]
    async fn test_concurrent_units_are_serialized() {
        let db = create_test_db().await.unwrap();
        insert_tag(&db, &Tag::new("1", "Work")).await;

        // Each unit reads the list and appends based on what it saw; without
        // serialization both would see an empty list.
        let append = |task_id: &'static str| {
            let manager = db.transactions();
            async move {
                manager
                    .tag_transaction(async |tags| {
                        let current = tags.get_tasks_by_tag_id("1").await?.unwrap_or_default();
                        tokio::task::yield_now().await;
                        if current.is_empty() {
                            tags.add_task_to_tag("1", task_id);
                        }
                        Ok(())
                    })
                    .await
            }
        };

        let (a, b) = tokio::join!(append("a"), append("b"));
        a.unwrap();
        b.unwrap();

        let tasks = tasks_of_tag(&db, "1").await.unwrap();
        assert_eq!(tasks.len(), 1, "only the first unit should append: {:?}", tasks);
    }
}
