//! Cross-repository search and API quota tools.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use adjutant_core::error::ToolError;
use adjutant_core::tool::{Tool, ToolResult, parse_args};

use super::client::{GithubClient, clamp_limit};

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
    limit: Option<u32>,
}

fn search_schema(what: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": format!("GitHub search syntax query for {what}")
            },
            "limit": {
                "type": "integer",
                "description": "Maximum number of results to return (default 10)",
                "default": 10
            }
        },
        "required": ["query"]
    })
}

pub struct SearchRepositoriesTool {
    client: Arc<GithubClient>,
}

impl SearchRepositoriesTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchRepositoriesTool {
    fn name(&self) -> &str {
        "github_search_repositories"
    }

    fn description(&self) -> &str {
        "Search public repositories with GitHub search syntax (e.g. \
         'language:rust stars:>1000'). Returns full name, star count, and url."
    }

    fn parameters_schema(&self) -> Value {
        search_schema("repositories")
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        let args: SearchArgs = parse_args(arguments)?;
        let limit = clamp_limit(args.limit, 10, 50);

        let query = [
            ("q", args.query.clone()),
            ("per_page", limit.to_string()),
        ];
        let data = self
            .client
            .get_with_query("/search/repositories", &query)
            .await?;

        let repos: Vec<Value> = data["items"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .take(limit as usize)
            .map(|r| {
                json!({
                    "full_name": r["full_name"],
                    "stars": r["stargazers_count"],
                    "url": r["html_url"],
                })
            })
            .collect();

        Ok(ToolResult::ok(json!({
            "query": args.query,
            "repos": repos,
        })))
    }
}

pub struct SearchIssuesTool {
    client: Arc<GithubClient>,
}

impl SearchIssuesTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for SearchIssuesTool {
    fn name(&self) -> &str {
        "github_search_issues"
    }

    fn description(&self) -> &str {
        "Search issues and pull requests with GitHub search syntax (e.g. \
         'repo:rust-lang/rust label:bug is:open')."
    }

    fn parameters_schema(&self) -> Value {
        search_schema("issues and pull requests")
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        let args: SearchArgs = parse_args(arguments)?;
        let limit = clamp_limit(args.limit, 10, 50);

        let query = [
            ("q", args.query.clone()),
            ("per_page", limit.to_string()),
        ];
        let data = self.client.get_with_query("/search/issues", &query).await?;

        let items: Vec<Value> = data["items"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .take(limit as usize)
            .map(|i| {
                // The search payload carries the repository as an API url
                let repo = i["repository_url"]
                    .as_str()
                    .and_then(|u| u.split("/repos/").nth(1));
                json!({
                    "title": i["title"],
                    "url": i["html_url"],
                    "repo": repo,
                    "number": i["number"],
                })
            })
            .collect();

        Ok(ToolResult::ok(json!({
            "query": args.query,
            "items": items,
        })))
    }
}

pub struct RateLimitTool {
    client: Arc<GithubClient>,
}

impl RateLimitTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for RateLimitTool {
    fn name(&self) -> &str {
        "github_rate_limit"
    }

    fn description(&self) -> &str {
        "Report the remaining GitHub API quota and when it resets."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: Value) -> Result<ToolResult, ToolError> {
        let data = self.client.get("/rate_limit").await?;
        let core = &data["resources"]["core"];

        let reset = core["reset"]
            .as_i64()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .map(|t| t.to_rfc3339());

        Ok(ToolResult::ok(json!({
            "core": {
                "remaining": core["remaining"],
                "limit": core["limit"],
                "reset": reset,
            }
        })))
    }
}
