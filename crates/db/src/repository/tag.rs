//! Tag repository for CRUD operations on tags
//!
//! Mirror of the task repository for the tag table: tags keep the ids of
//! their tasks in a `tasks` array.

use crate::error::DbResult;
use crate::models::Tag;
use crate::transaction::WriteSet;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::{debug, trace};

/// Repository for tag CRUD and tag-side association operations
pub struct TagRepository<'t> {
    client: &'t Surreal<Db>,
    table: &'t str,
    writes: &'t mut WriteSet,
}

impl<'t> TagRepository<'t> {
    pub(crate) fn new(client: &'t Surreal<Db>, table: &'t str, writes: &'t mut WriteSet) -> Self {
        Self {
            client,
            table,
            writes,
        }
    }

    /// Fetch all tags, ordered by id.
    pub async fn find_all(&self) -> DbResult<Vec<Tag>> {
        debug!("Fetching all tags from {}", self.table);
        let mut result = self
            .client
            .query("SELECT record::id(id) AS id, name FROM type::table($table) ORDER BY id")
            .bind(("table", self.table.to_string()))
            .await?;
        let tags: Vec<Tag> = result.take(0)?;
        trace!("Fetched {} tags", tags.len());
        Ok(tags)
    }

    /// Get a tag by ID.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Tag>> {
        // Empty ids are not valid record keys
        if id.is_empty() {
            return Ok(None);
        }
        debug!("Fetching tag: {}", id);
        let mut result = self
            .client
            .query("SELECT record::id(id) AS id, name FROM type::thing($table, $id)")
            .bind(("table", self.table.to_string()))
            .bind(("id", id.to_string()))
            .await?;
        let tag: Option<Tag> = result.take(0)?;
        Ok(tag)
    }

    /// Get a tag by its exact name.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Tag>> {
        debug!("Fetching tag by name: {}", name);
        let mut result = self
            .client
            .query(
                "SELECT record::id(id) AS id, name FROM type::table($table) WHERE name = $name LIMIT 1",
            )
            .bind(("table", self.table.to_string()))
            .bind(("name", name.to_string()))
            .await?;
        let tag: Option<Tag> = result.take(0)?;
        Ok(tag)
    }

    /// Get the ids of the tasks a tag is assigned to.
    ///
    /// # Returns
    ///
    /// `None` if the tag does not exist.
    pub async fn get_tasks_by_tag_id(&self, id: &str) -> DbResult<Option<Vec<String>>> {
        // Empty ids are not valid record keys
        if id.is_empty() {
            return Ok(None);
        }
        debug!("Fetching tasks of tag: {}", id);
        let mut result = self
            .client
            .query("SELECT VALUE tasks FROM type::thing($table, $id)")
            .bind(("table", self.table.to_string()))
            .bind(("id", id.to_string()))
            .await?;
        let tasks: Option<Vec<String>> = result.take(0)?;
        Ok(tasks)
    }

    /// Stage the creation of a tag with no tasks.
    pub fn save(&mut self, tag: &Tag) {
        debug!("Staging creation of tag: {}", tag.id);
        trace!("Tag data: {:?}", tag);
        let table = self.writes.bind(self.table);
        let id = self.writes.bind(&tag.id);
        let name = self.writes.bind(&tag.name);
        self.writes.push(format!(
            "CREATE type::thing({table}, {id}) SET name = {name}, tasks = []"
        ));
    }

    /// Stage the deletion of a tag.
    pub fn delete(&mut self, id: &str) {
        debug!("Staging deletion of tag: {}", id);
        let table = self.writes.bind(self.table);
        let id = self.writes.bind(id);
        self.writes
            .push(format!("DELETE type::thing({table}, {id})"));
    }

    /// Stage adding a task id to a tag's task list.
    pub fn add_task_to_tag(&mut self, tag_id: &str, task_id: &str) {
        debug!("Staging task {} on tag {}", task_id, tag_id);
        let table = self.writes.bind(self.table);
        let tag_id = self.writes.bind(tag_id);
        let task_id = self.writes.bind(task_id);
        self.writes.push(format!(
            "UPDATE type::thing({table}, {tag_id}) SET tasks += {task_id}"
        ));
    }

    /// Stage removing a task id from a tag's task list.
    pub fn remove_task_from_tag(&mut self, tag_id: &str, task_id: &str) {
        debug!("Staging removal of task {} from tag {}", task_id, tag_id);
        let table = self.writes.bind(self.table);
        let tag_id = self.writes.bind(tag_id);
        let task_id = self.writes.bind(task_id);
        self.writes.push(format!(
            "UPDATE type::thing({table}, {tag_id}) SET tasks -= {task_id}"
        ));
    }

    /// Stage removing a task id from every tag that references it.
    pub fn remove_task_from_all_tags(&mut self, task_id: &str) {
        debug!("Staging removal of task {} from all tags", task_id);
        let table = self.writes.bind(self.table);
        let task_id = self.writes.bind(task_id);
        self.writes.push(format!(
            "UPDATE type::table({table}) SET tasks -= {task_id} WHERE tasks CONTAINS {task_id}"
        ));
    }
}
