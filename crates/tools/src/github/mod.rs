//! GitHub integration: a typed API client and the repository tools
//! built on it.

pub mod branches;
pub mod client;
pub mod collaborators;
pub mod contents;
pub mod issues;
pub mod pulls;
pub mod repos;
pub mod search;

pub use branches::{CreateBranchTool, DeleteBranchTool, ListBranchesTool, ListCommitsTool};
pub use client::GithubClient;
pub use collaborators::{AddCollaboratorTool, RemoveCollaboratorTool};
pub use contents::{CreateFileTool, DeleteFileTool, UpdateFileTool};
pub use issues::{CloseIssueTool, CreateIssueTool, ListIssuesTool};
pub use pulls::{CreatePrTool, ListPrsTool, MergePrTool};
pub use repos::{CreateRepoTool, DeleteRepoTool, ListReposTool, WhoamiTool};
pub use search::{RateLimitTool, SearchIssuesTool, SearchRepositoriesTool};
