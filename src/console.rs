//! Terminal implementation of the view
//!
//! Collects everything the controller reports into a text buffer that the
//! binary prints once the command has run.

use crate::output::{format_tag_table, format_task_table};
use crate::view::TodoView;
use simpletodo_db::{Association, Tag, Task};

/// View accumulating console output
#[derive(Debug, Default)]
pub struct ConsoleView {
    lines: Vec<String>,
    failed: bool,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far, one entry per line.
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether any error callback fired.
    pub fn has_error(&self) -> bool {
        self.failed
    }

    fn error(&mut self, message: &str) {
        self.failed = true;
        self.lines.push(format!("error: {}", message));
    }
}

impl TodoView for ConsoleView {
    fn show_all_tasks(&mut self, tasks: &[Task]) {
        self.lines.push(format_task_table(tasks));
    }

    fn task_added(&mut self, task: &Task) {
        self.lines.push(format!("Created task: {}", task));
    }

    fn task_deleted(&mut self, task: &Task) {
        self.lines.push(format!("Deleted task: {}", task));
    }

    fn task_error(&mut self, message: &str) {
        self.error(message);
    }

    fn show_all_tags(&mut self, tags: &[Tag]) {
        self.lines.push(format_tag_table(tags));
    }

    fn tag_added(&mut self, tag: &Tag) {
        self.lines.push(format!("Created tag: {}", tag));
    }

    fn tag_deleted(&mut self, tag: &Tag) {
        self.lines.push(format!("Deleted tag: {}", tag));
    }

    fn tag_error(&mut self, message: &str) {
        self.error(message);
    }

    fn show_task_tags(&mut self, task_id: &str, tags: &[Tag]) {
        self.lines.push(format!("Tags of task {}:", task_id));
        self.lines.push(format_tag_table(tags));
    }

    fn show_tag_tasks(&mut self, tag_id: &str, tasks: &[Task]) {
        self.lines.push(format!("Tasks tagged {}:", tag_id));
        self.lines.push(format_task_table(tasks));
    }

    fn tag_added_to_task(&mut self, association: &Association) {
        self.lines.push(format!(
            "Assigned tag {} to task {}",
            association.tag, association.task
        ));
    }

    fn tag_removed_from_task(&mut self, association: &Association) {
        self.lines.push(format!(
            "Removed tag {} from task {}",
            association.tag, association.task
        ));
    }

    fn task_added_to_tag(&mut self, association: &Association) {
        self.lines.push(format!(
            "Tagged task {} with {}",
            association.task, association.tag
        ));
    }

    fn task_removed_from_tag(&mut self, association: &Association) {
        self.lines.push(format!(
            "Untagged task {} from {}",
            association.task, association.tag
        ));
    }
}
