/// Project state owner and its commands.
pub mod editor;
/// Background tasks with cancellation.
pub mod tasks;
