//! Commit history and branch management tools.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use adjutant_core::error::ToolError;
use adjutant_core::tool::{Tool, ToolResult, parse_args};

use super::client::{GithubClient, clamp_limit};

fn default_main() -> String {
    "main".into()
}

pub struct ListCommitsTool {
    client: Arc<GithubClient>,
}

impl ListCommitsTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListCommitsTool {
    fn name(&self) -> &str {
        "github_list_commits"
    }

    fn description(&self) -> &str {
        "List recent commits on a branch, newest first. Returns each commit's \
         sha, author, date, and first message line."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "repo": {
                    "type": "string",
                    "description": "Repository, as 'owner/name' or a bare name"
                },
                "owner": {
                    "type": "string",
                    "description": "Owner, when 'repo' is a bare name"
                },
                "branch": {
                    "type": "string",
                    "description": "Branch to read (default 'main')",
                    "default": "main"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of commits to return (default 20)",
                    "default": 20
                }
            },
            "required": ["repo"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Args {
            repo: String,
            owner: Option<String>,
            #[serde(default = "default_main")]
            branch: String,
            limit: Option<u32>,
        }
        let args: Args = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;
        let limit = clamp_limit(args.limit, 20, 100);

        let query = [("sha", args.branch.clone())];
        let items = self
            .client
            .get_paged(&format!("/repos/{full_name}/commits"), &query, limit)
            .await?;

        let commits: Vec<Value> = items
            .iter()
            .map(|c| {
                let message = c["commit"]["message"]
                    .as_str()
                    .and_then(|m| m.lines().next())
                    .unwrap_or_default();
                json!({
                    "sha": c["sha"],
                    "date": c["commit"]["author"]["date"],
                    "message": message,
                    "author": c["commit"]["author"]["name"],
                })
            })
            .collect();

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "branch": args.branch,
            "commits": commits,
        })))
    }
}

pub struct ListBranchesTool {
    client: Arc<GithubClient>,
}

impl ListBranchesTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListBranchesTool {
    fn name(&self) -> &str {
        "github_list_branches"
    }

    fn description(&self) -> &str {
        "List the branches of a repository."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "repo": {
                    "type": "string",
                    "description": "Repository, as 'owner/name' or a bare name"
                },
                "owner": {
                    "type": "string",
                    "description": "Owner, when 'repo' is a bare name"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of branches to return (default 100)",
                    "default": 100
                }
            },
            "required": ["repo"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Args {
            repo: String,
            owner: Option<String>,
            limit: Option<u32>,
        }
        let args: Args = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;
        let limit = clamp_limit(args.limit, 100, 200);

        let items = self
            .client
            .get_paged(&format!("/repos/{full_name}/branches"), &[], limit)
            .await?;

        let branches: Vec<Value> = items.iter().map(|b| json!({ "name": b["name"] })).collect();

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "branches": branches,
        })))
    }
}

pub struct CreateBranchTool {
    client: Arc<GithubClient>,
}

impl CreateBranchTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CreateBranchTool {
    fn name(&self) -> &str {
        "github_create_branch"
    }

    fn description(&self) -> &str {
        "Create a new branch pointing at the tip of a source branch \
         (default 'main')."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "repo": {
                    "type": "string",
                    "description": "Repository, as 'owner/name' or a bare name"
                },
                "owner": {
                    "type": "string",
                    "description": "Owner, when 'repo' is a bare name"
                },
                "new_branch": {
                    "type": "string",
                    "description": "Name of the branch to create"
                },
                "source_branch": {
                    "type": "string",
                    "description": "Branch to fork from (default 'main')",
                    "default": "main"
                }
            },
            "required": ["repo", "new_branch"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Args {
            repo: String,
            owner: Option<String>,
            new_branch: String,
            #[serde(default = "default_main")]
            source_branch: String,
        }
        let args: Args = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;

        let source = self
            .client
            .get(&format!(
                "/repos/{full_name}/branches/{}",
                args.source_branch
            ))
            .await?;
        let sha = source["commit"]["sha"].as_str().unwrap_or_default();

        let body = json!({
            "ref": format!("refs/heads/{}", args.new_branch),
            "sha": sha,
        });
        self.client
            .post(&format!("/repos/{full_name}/git/refs"), &body)
            .await?;

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "new_branch": args.new_branch,
            "source_branch": args.source_branch,
            "sha": sha,
        })))
    }
}

pub struct DeleteBranchTool {
    client: Arc<GithubClient>,
}

impl DeleteBranchTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for DeleteBranchTool {
    fn name(&self) -> &str {
        "github_delete_branch"
    }

    fn description(&self) -> &str {
        "Delete a branch. DESTRUCTIVE: unmerged commits on the branch become \
         unreachable."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "repo": {
                    "type": "string",
                    "description": "Repository, as 'owner/name' or a bare name"
                },
                "owner": {
                    "type": "string",
                    "description": "Owner, when 'repo' is a bare name"
                },
                "branch": {
                    "type": "string",
                    "description": "Name of the branch to delete"
                }
            },
            "required": ["repo", "branch"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Args {
            repo: String,
            owner: Option<String>,
            branch: String,
        }
        let args: Args = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;

        self.client
            .delete(&format!(
                "/repos/{full_name}/git/refs/heads/{}",
                args.branch
            ))
            .await?;

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "branch": args.branch,
        })))
    }
}
