//! Controller translating user actions into service calls
//!
//! Each action runs one service use case and reports the result to the view.
//! Domain errors are routed by the repository that raised them; anything
//! else goes to the error callback of the entity the action is about.

use crate::view::TodoView;
use simpletodo_db::{DbError, Tag, Task, TodoService};
use tracing::warn;

/// Entity an action is about, used to route non-domain errors
#[derive(Debug, Clone, Copy)]
enum Subject {
    Task,
    Tag,
}

/// Drives a [`TodoView`] from a [`TodoService`]
pub struct TodoController<'a, V: TodoView> {
    service: TodoService<'a>,
    view: V,
}

impl<'a, V: TodoView> TodoController<'a, V> {
    pub fn new(service: TodoService<'a>, view: V) -> Self {
        Self { service, view }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Consume the controller, returning the view.
    pub fn into_view(self) -> V {
        self.view
    }

    pub async fn get_all_tasks(&mut self) {
        match self.service.get_all_tasks().await {
            Ok(tasks) => self.view.show_all_tasks(&tasks),
            Err(e) => self.report(Subject::Task, e),
        }
    }

    pub async fn add_task(&mut self, id: &str, description: &str) {
        let task = Task::new(id, description);
        match self.service.save_task(&task).await {
            Ok(()) => self.view.task_added(&task),
            Err(e) => self.report(Subject::Task, e),
        }
    }

    pub async fn delete_task(&mut self, id: &str) {
        match self.service.delete_task(id).await {
            Ok(task) => self.view.task_deleted(&task),
            Err(e) => self.report(Subject::Task, e),
        }
    }

    pub async fn get_all_tags(&mut self) {
        match self.service.get_all_tags().await {
            Ok(tags) => self.view.show_all_tags(&tags),
            Err(e) => self.report(Subject::Tag, e),
        }
    }

    pub async fn add_tag(&mut self, id: &str, name: &str) {
        let tag = Tag::new(id, name);
        match self.service.save_tag(&tag).await {
            Ok(()) => self.view.tag_added(&tag),
            Err(e) => self.report(Subject::Tag, e),
        }
    }

    pub async fn delete_tag(&mut self, id: &str) {
        match self.service.delete_tag(id).await {
            Ok(tag) => self.view.tag_deleted(&tag),
            Err(e) => self.report(Subject::Tag, e),
        }
    }

    pub async fn add_tag_to_task(&mut self, task_id: &str, tag_id: &str) {
        match self.service.add_tag_to_task(task_id, tag_id).await {
            Ok(association) => self.view.tag_added_to_task(&association),
            Err(e) => self.report(Subject::Task, e),
        }
    }

    pub async fn remove_tag_from_task(&mut self, task_id: &str, tag_id: &str) {
        match self.service.remove_tag_from_task(task_id, tag_id).await {
            Ok(association) => self.view.tag_removed_from_task(&association),
            Err(e) => self.report(Subject::Task, e),
        }
    }

    /// Same link as [`add_tag_to_task`](Self::add_tag_to_task), seen from the tag.
    pub async fn add_task_to_tag(&mut self, tag_id: &str, task_id: &str) {
        match self.service.add_tag_to_task(task_id, tag_id).await {
            Ok(association) => self.view.task_added_to_tag(&association),
            Err(e) => self.report(Subject::Tag, e),
        }
    }

    pub async fn remove_task_from_tag(&mut self, tag_id: &str, task_id: &str) {
        match self.service.remove_tag_from_task(task_id, tag_id).await {
            Ok(association) => self.view.task_removed_from_tag(&association),
            Err(e) => self.report(Subject::Tag, e),
        }
    }

    pub async fn get_tags_by_task(&mut self, task_id: &str) {
        match self.service.find_tags_of_task(task_id).await {
            Ok(tags) => self.view.show_task_tags(task_id, &tags),
            Err(e) => self.report(Subject::Task, e),
        }
    }

    pub async fn get_tasks_by_tag(&mut self, tag_id: &str) {
        match self.service.find_tasks_of_tag(tag_id).await {
            Ok(tasks) => self.view.show_tag_tasks(tag_id, &tasks),
            Err(e) => self.report(Subject::Tag, e),
        }
    }

    fn report(&mut self, subject: Subject, err: DbError) {
        match err {
            DbError::TaskRepository { message } => self.view.task_error(&message),
            DbError::TagRepository { message } => self.view.tag_error(&message),
            other => {
                let message = other.full_message();
                warn!("{:?} action failed: {}", subject, message);
                match subject {
                    Subject::Task => self.view.task_error(&message),
                    Subject::Tag => self.view.tag_error(&message),
                }
            }
        }
    }
}
