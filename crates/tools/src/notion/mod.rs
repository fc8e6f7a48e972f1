//! Notion integration: a typed API client and the task tools built on it.

pub mod client;
pub mod tasks;

pub use client::NotionClient;
pub use tasks::{CreateTaskTool, DeleteTaskTool, ShowTasksTool, UpdateTaskTool};
