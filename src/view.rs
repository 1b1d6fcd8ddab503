//! View callbacks driven by the controller

use simpletodo_db::{Association, Tag, Task};

/// Receives the outcome of every controller action.
///
/// Exactly one callback is invoked per action: the success callback for the
/// action, or the error callback of the entity it concerns.
pub trait TodoView {
    fn show_all_tasks(&mut self, tasks: &[Task]);
    fn task_added(&mut self, task: &Task);
    fn task_deleted(&mut self, task: &Task);
    fn task_error(&mut self, message: &str);

    fn show_all_tags(&mut self, tags: &[Tag]);
    fn tag_added(&mut self, tag: &Tag);
    fn tag_deleted(&mut self, tag: &Tag);
    fn tag_error(&mut self, message: &str);

    /// Tags assigned to the task with `task_id`
    fn show_task_tags(&mut self, task_id: &str, tags: &[Tag]);
    /// Tasks the tag with `tag_id` is assigned to
    fn show_tag_tasks(&mut self, tag_id: &str, tasks: &[Task]);

    fn tag_added_to_task(&mut self, association: &Association);
    fn tag_removed_from_task(&mut self, association: &Association);
    fn task_added_to_tag(&mut self, association: &Association);
    fn task_removed_from_tag(&mut self, association: &Association);
}
