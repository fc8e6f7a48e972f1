//! Pull request tools.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use adjutant_core::error::ToolError;
use adjutant_core::tool::{Tool, ToolResult, parse_args};

use super::client::{GithubClient, clamp_limit};

fn default_state() -> String {
    "open".into()
}

fn default_base() -> String {
    "main".into()
}

pub struct ListPrsTool {
    client: Arc<GithubClient>,
}

impl ListPrsTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListPrsTool {
    fn name(&self) -> &str {
        "github_list_prs"
    }

    fn description(&self) -> &str {
        "List pull requests in a repository, filtered by state. Returns each \
         PR's number, title, state, url, and head/base branches."
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
                "state": {
                    "type": "string",
                    "description": "PR state filter (default 'open')",
                    "enum": ["open", "closed", "all"],
                    "default": "open"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of PRs to return (default 20)",
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
            #[serde(default = "default_state")]
            state: String,
            limit: Option<u32>,
        }
        let args: Args = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;
        let limit = clamp_limit(args.limit, 20, 200);

        let query = [("state", args.state)];
        let items = self
            .client
            .get_paged(&format!("/repos/{full_name}/pulls"), &query, limit)
            .await?;

        let prs: Vec<Value> = items
            .iter()
            .map(|pr| {
                json!({
                    "number": pr["number"],
                    "title": pr["title"],
                    "state": pr["state"],
                    "url": pr["html_url"],
                    "head": pr["head"]["ref"],
                    "base": pr["base"]["ref"],
                })
            })
            .collect();

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "prs": prs,
        })))
    }
}

pub struct CreatePrTool {
    client: Arc<GithubClient>,
}

impl CreatePrTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CreatePrTool {
    fn name(&self) -> &str {
        "github_create_pr"
    }

    fn description(&self) -> &str {
        "Open a pull request from a head branch into a base branch \
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
                "title": {
                    "type": "string",
                    "description": "Pull request title"
                },
                "head": {
                    "type": "string",
                    "description": "Branch with the changes"
                },
                "base": {
                    "type": "string",
                    "description": "Branch to merge into (default 'main')",
                    "default": "main"
                },
                "body": {
                    "type": "string",
                    "description": "Pull request description"
                }
            },
            "required": ["repo", "title", "head"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Args {
            repo: String,
            owner: Option<String>,
            title: String,
            head: String,
            #[serde(default = "default_base")]
            base: String,
            #[serde(default)]
            body: String,
        }
        let args: Args = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;

        let body = json!({
            "title": args.title,
            "head": args.head,
            "base": args.base,
            "body": args.body,
        });
        let pr = self
            .client
            .post(&format!("/repos/{full_name}/pulls"), &body)
            .await?;

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "pr": {
                "number": pr["number"],
                "title": pr["title"],
                "url": pr["html_url"],
            }
        })))
    }
}

pub struct MergePrTool {
    client: Arc<GithubClient>,
}

impl MergePrTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for MergePrTool {
    fn name(&self) -> &str {
        "github_merge_pr"
    }

    fn description(&self) -> &str {
        "Merge a pull request by number. Fails if the PR has conflicts or is \
         not mergeable."
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
                "number": {
                    "type": "integer",
                    "description": "Pull request number"
                },
                "commit_message": {
                    "type": "string",
                    "description": "Extra detail appended to the merge commit message"
                }
            },
            "required": ["repo", "number"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Args {
            repo: String,
            owner: Option<String>,
            number: u64,
            commit_message: Option<String>,
        }
        let args: Args = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;

        let mut body = json!({});
        if let Some(message) = args.commit_message.filter(|m| !m.is_empty()) {
            body["commit_message"] = json!(message);
        }
        let result = self
            .client
            .put(
                &format!("/repos/{full_name}/pulls/{}/merge", args.number),
                Some(&body),
            )
            .await?;

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "number": args.number,
            "merged": result["merged"].as_bool().unwrap_or(false),
            "message": result["message"],
        })))
    }
}
