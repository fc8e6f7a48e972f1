//! Issue tools.
//!
//! The issues list endpoint also returns pull requests (they are issues
//! underneath); callers that want only PRs use the dedicated PR tools.

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

pub struct ListIssuesTool {
    client: Arc<GithubClient>,
}

impl ListIssuesTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListIssuesTool {
    fn name(&self) -> &str {
        "github_list_issues"
    }

    fn description(&self) -> &str {
        "List issues in a repository, filtered by state (open, closed, or all)."
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
                    "description": "Issue state filter (default 'open')",
                    "enum": ["open", "closed", "all"],
                    "default": "open"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of issues to return (default 20)",
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
            .get_paged(&format!("/repos/{full_name}/issues"), &query, limit)
            .await?;

        let issues: Vec<Value> = items
            .iter()
            .map(|i| {
                json!({
                    "number": i["number"],
                    "title": i["title"],
                    "state": i["state"],
                    "url": i["html_url"],
                })
            })
            .collect();

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "issues": issues,
        })))
    }
}

pub struct CreateIssueTool {
    client: Arc<GithubClient>,
}

impl CreateIssueTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CreateIssueTool {
    fn name(&self) -> &str {
        "github_create_issue"
    }

    fn description(&self) -> &str {
        "Open a new issue in a repository."
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
                    "description": "Issue title"
                },
                "body": {
                    "type": "string",
                    "description": "Issue body text"
                }
            },
            "required": ["repo", "title"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Args {
            repo: String,
            owner: Option<String>,
            title: String,
            #[serde(default)]
            body: String,
        }
        let args: Args = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;

        let body = json!({ "title": args.title, "body": args.body });
        let issue = self
            .client
            .post(&format!("/repos/{full_name}/issues"), &body)
            .await?;

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "issue": {
                "number": issue["number"],
                "title": issue["title"],
                "url": issue["html_url"],
            }
        })))
    }
}

pub struct CloseIssueTool {
    client: Arc<GithubClient>,
}

impl CloseIssueTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CloseIssueTool {
    fn name(&self) -> &str {
        "github_close_issue"
    }

    fn description(&self) -> &str {
        "Close an issue by number."
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
                    "description": "Issue number"
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
        }
        let args: Args = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;

        let body = json!({ "state": "closed" });
        self.client
            .patch(&format!("/repos/{full_name}/issues/{}", args.number), &body)
            .await?;

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "number": args.number,
        })))
    }
}
