//! Repository modules for database operations
//!
//! One repository per table. Repositories are handed out by the transaction
//! manager for the duration of a unit of work.

mod tag;
mod task;

pub use tag::TagRepository;
pub use task::TaskRepository;
