//! Built-in tool implementations for Adjutant.
//!
//! Tools give the assistant its hands: querying and editing the Notion
//! task database, and managing GitHub repositories, branches, files,
//! issues, pull requests, and collaborators.
//!
//! Every tool degrades gracefully when its backend credential is
//! missing, so a partially configured deployment still starts and the
//! model can explain what is unavailable.

pub mod github;
pub mod notion;

use std::sync::Arc;

use adjutant_config::AppConfig;
use adjutant_core::tool::ToolRegistry;

use github::GithubClient;
use notion::NotionClient;

/// Create the default tool registry with all built-in tools.
///
/// One shared client per backend; the tools hold `Arc` handles so the
/// underlying connection pools are reused across calls.
pub fn default_registry(config: &AppConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    let notion = Arc::new(NotionClient::new(&config.notion));
    registry.register(Box::new(notion::ShowTasksTool::new(notion.clone())));
    registry.register(Box::new(notion::CreateTaskTool::new(notion.clone())));
    registry.register(Box::new(notion::UpdateTaskTool::new(notion.clone())));
    registry.register(Box::new(notion::DeleteTaskTool::new(notion)));

    let github = Arc::new(GithubClient::new(&config.github));
    registry.register(Box::new(github::WhoamiTool::new(github.clone())));
    registry.register(Box::new(github::ListReposTool::new(github.clone())));
    registry.register(Box::new(github::CreateRepoTool::new(github.clone())));
    registry.register(Box::new(github::DeleteRepoTool::new(github.clone())));
    registry.register(Box::new(github::ListCommitsTool::new(github.clone())));
    registry.register(Box::new(github::ListBranchesTool::new(github.clone())));
    registry.register(Box::new(github::CreateBranchTool::new(github.clone())));
    registry.register(Box::new(github::DeleteBranchTool::new(github.clone())));
    registry.register(Box::new(github::CreateFileTool::new(github.clone())));
    registry.register(Box::new(github::UpdateFileTool::new(github.clone())));
    registry.register(Box::new(github::DeleteFileTool::new(github.clone())));
    registry.register(Box::new(github::ListIssuesTool::new(github.clone())));
    registry.register(Box::new(github::CreateIssueTool::new(github.clone())));
    registry.register(Box::new(github::CloseIssueTool::new(github.clone())));
    registry.register(Box::new(github::ListPrsTool::new(github.clone())));
    registry.register(Box::new(github::CreatePrTool::new(github.clone())));
    registry.register(Box::new(github::MergePrTool::new(github.clone())));
    registry.register(Box::new(github::AddCollaboratorTool::new(github.clone())));
    registry.register(Box::new(github::RemoveCollaboratorTool::new(github.clone())));
    registry.register(Box::new(github::SearchRepositoriesTool::new(github.clone())));
    registry.register(Box::new(github::SearchIssuesTool::new(github.clone())));
    registry.register(Box::new(github::RateLimitTool::new(github)));

    registry
}
