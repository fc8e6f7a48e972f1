//! Identity and repository management tools.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use adjutant_core::error::ToolError;
use adjutant_core::tool::{Tool, ToolResult, parse_args};

use super::client::{GithubClient, clamp_limit};

pub struct WhoamiTool {
    client: Arc<GithubClient>,
}

impl WhoamiTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WhoamiTool {
    fn name(&self) -> &str {
        "github_whoami"
    }

    fn description(&self) -> &str {
        "Return the authenticated GitHub user's login, display name, and id."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: Value) -> Result<ToolResult, ToolError> {
        let me = self.client.get("/user").await?;
        Ok(ToolResult::ok(json!({
            "login": me["login"],
            "name": me["name"],
            "id": me["id"],
        })))
    }
}

pub struct ListReposTool {
    client: Arc<GithubClient>,
}

impl ListReposTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListReposTool {
    fn name(&self) -> &str {
        "github_list_repos"
    }

    fn description(&self) -> &str {
        "List the authenticated user's repositories, optionally filtered by \
         visibility. Returns each repository's full name, privacy flag, and \
         description."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "visibility": {
                    "type": "string",
                    "description": "Which repositories to include",
                    "enum": ["all", "public", "private"],
                    "default": "all"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of repositories to return (default 50)",
                    "default": 50
                }
            }
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Args {
            #[serde(default = "default_visibility")]
            visibility: String,
            limit: Option<u32>,
        }
        fn default_visibility() -> String {
            "all".into()
        }
        let args: Args = parse_args(arguments)?;
        let limit = clamp_limit(args.limit, 50, 200);

        let query = [("visibility", args.visibility)];
        let items = self.client.get_paged("/user/repos", &query, limit).await?;

        let repos: Vec<Value> = items
            .iter()
            .map(|r| {
                json!({
                    "full_name": r["full_name"],
                    "private": r["private"],
                    "description": r["description"],
                })
            })
            .collect();

        Ok(ToolResult::ok(json!({ "repos": repos })))
    }
}

pub struct CreateRepoTool {
    client: Arc<GithubClient>,
}

impl CreateRepoTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CreateRepoTool {
    fn name(&self) -> &str {
        "github_create_repo"
    }

    fn description(&self) -> &str {
        "Create a new repository under the authenticated user. Initializes \
         with a README by default so the default branch exists immediately."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Repository name"
                },
                "description": {
                    "type": "string",
                    "description": "Short repository description"
                },
                "private": {
                    "type": "boolean",
                    "description": "Create as a private repository (default false)",
                    "default": false
                },
                "auto_init": {
                    "type": "boolean",
                    "description": "Initialize with an empty README (default true)",
                    "default": true
                }
            },
            "required": ["name"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Args {
            name: String,
            #[serde(default)]
            description: String,
            #[serde(default)]
            private: bool,
            #[serde(default = "default_true")]
            auto_init: bool,
        }
        fn default_true() -> bool {
            true
        }
        let args: Args = parse_args(arguments)?;

        let body = json!({
            "name": args.name,
            "description": args.description,
            "private": args.private,
            "auto_init": args.auto_init,
        });
        let repo = self.client.post("/user/repos", &body).await?;

        Ok(ToolResult::ok(json!({
            "repo": {
                "full_name": repo["full_name"],
                "private": repo["private"],
                "url": repo["html_url"],
            }
        })))
    }
}

pub struct DeleteRepoTool {
    client: Arc<GithubClient>,
}

impl DeleteRepoTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for DeleteRepoTool {
    fn name(&self) -> &str {
        "github_delete_repo"
    }

    fn description(&self) -> &str {
        "Permanently delete a repository. DESTRUCTIVE: this cannot be undone. \
         Accepts 'owner/name' or a bare name resolved against the default owner."
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
        }
        let args: Args = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;

        self.client.delete(&format!("/repos/{full_name}")).await?;

        Ok(ToolResult::ok(json!({ "full_name": full_name })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adjutant_config::GithubConfig;

    fn unconfigured() -> Arc<GithubClient> {
        Arc::new(GithubClient::new(&GithubConfig::default()))
    }

    #[test]
    fn tool_definitions() {
        let client = unconfigured();
        assert_eq!(WhoamiTool::new(client.clone()).name(), "github_whoami");

        let list = ListReposTool::new(client.clone());
        assert_eq!(
            list.parameters_schema()["properties"]["visibility"]["enum"],
            json!(["all", "public", "private"])
        );

        let create = CreateRepoTool::new(client.clone());
        assert_eq!(create.parameters_schema()["required"], json!(["name"]));

        assert_eq!(
            DeleteRepoTool::new(client).name(),
            "github_delete_repo"
        );
    }

    #[tokio::test]
    async fn whoami_without_token_is_graceful() {
        let tool = WhoamiTool::new(unconfigured());
        let err = tool.execute(json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "GITHUB_TOKEN is not set.");
    }

    #[tokio::test]
    async fn delete_requires_resolvable_owner() {
        let client = Arc::new(GithubClient::new(&GithubConfig {
            token: Some("ghp_test".into()),
            default_owner: None,
        }));
        let tool = DeleteRepoTool::new(client);
        let err = tool
            .execute(json!({ "repo": "bare-name" }))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "owner is required if repo is not in 'owner/name' form."
        );
    }

    #[tokio::test]
    async fn create_requires_name() {
        let tool = CreateRepoTool::new(unconfigured());
        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
