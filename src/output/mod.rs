//! Output formatting module for simpletodo
//!
//! Provides table formatting for task and tag listings.

use simpletodo_db::{Tag, Task};

/// Maximum width for the text column before truncation
const MAX_TEXT_WIDTH: usize = 50;

/// Truncate a string to the specified maximum width in characters, adding
/// an ellipsis if needed.
fn truncate(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{}...", kept)
    }
}

/// Format `(id, text)` rows into an aligned two-column table.
fn format_table<'r>(
    headers: [&str; 2],
    rows: impl Iterator<Item = (&'r str, &'r str)> + Clone,
) -> String {
    let id_width = rows
        .clone()
        .map(|(id, _)| id.chars().count())
        .max()
        .unwrap_or(0)
        .max(headers[0].len());

    let text_width = rows
        .clone()
        .map(|(_, text)| text.chars().count().min(MAX_TEXT_WIDTH))
        .max()
        .unwrap_or(0)
        .max(headers[1].len());

    let mut output = String::new();

    output.push_str(&format!(
        "{:<id_w$}  {:<text_w$}\n",
        headers[0],
        headers[1],
        id_w = id_width,
        text_w = text_width,
    ));

    output.push_str(&format!(
        "{:->id_w$}  {:->text_w$}\n",
        "",
        "",
        id_w = id_width,
        text_w = text_width,
    ));

    for (id, text) in rows {
        output.push_str(&format!(
            "{:<id_w$}  {}\n",
            id,
            truncate(text, MAX_TEXT_WIDTH),
            id_w = id_width,
        ));
    }

    // Remove trailing newline
    output.pop();

    output
}

/// Format tasks into an aligned table string.
///
/// Produces output in the format:
/// ```text
/// ID      Description
/// ------  ---------------
/// a1b2c3  Start using TDD
/// ```
pub fn format_task_table(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }

    format_table(
        ["ID", "Description"],
        tasks.iter().map(|t| (t.id.as_str(), t.description.as_str())),
    )
}

/// Format tags into an aligned table string.
pub fn format_tag_table(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return "No tags found.".to_string();
    }

    format_table(
        ["ID", "Name"],
        tags.iter().map(|t| (t.id.as_str(), t.name.as_str())),
    )
}
