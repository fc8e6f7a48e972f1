//! Collaborator management tools.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use adjutant_core::error::ToolError;
use adjutant_core::tool::{Tool, ToolResult, parse_args};

use super::client::GithubClient;

fn default_permission() -> String {
    "push".into()
}

pub struct AddCollaboratorTool {
    client: Arc<GithubClient>,
}

impl AddCollaboratorTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for AddCollaboratorTool {
    fn name(&self) -> &str {
        "github_add_collaborator"
    }

    fn description(&self) -> &str {
        "Invite a user as a collaborator on a repository with a permission \
         level (default 'push')."
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
                "username": {
                    "type": "string",
                    "description": "GitHub login of the user to invite"
                },
                "permission": {
                    "type": "string",
                    "description": "Permission level to grant (default 'push')",
                    "enum": ["pull", "triage", "push", "maintain", "admin"],
                    "default": "push"
                }
            },
            "required": ["repo", "username"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Args {
            repo: String,
            owner: Option<String>,
            username: String,
            #[serde(default = "default_permission")]
            permission: String,
        }
        let args: Args = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;

        let body = json!({ "permission": args.permission });
        // 201 with an invitation body, or 204 when already a collaborator
        self.client
            .put(
                &format!("/repos/{full_name}/collaborators/{}", args.username),
                Some(&body),
            )
            .await?;

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "username": args.username,
            "permission": args.permission,
        })))
    }
}

pub struct RemoveCollaboratorTool {
    client: Arc<GithubClient>,
}

impl RemoveCollaboratorTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for RemoveCollaboratorTool {
    fn name(&self) -> &str {
        "github_remove_collaborator"
    }

    fn description(&self) -> &str {
        "Remove a collaborator from a repository."
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
                "username": {
                    "type": "string",
                    "description": "GitHub login of the collaborator to remove"
                }
            },
            "required": ["repo", "username"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Args {
            repo: String,
            owner: Option<String>,
            username: String,
        }
        let args: Args = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;

        self.client
            .delete(&format!(
                "/repos/{full_name}/collaborators/{}",
                args.username
            ))
            .await?;

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "username": args.username,
        })))
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
        let add = AddCollaboratorTool::new(client.clone());
        assert_eq!(add.name(), "github_add_collaborator");
        assert_eq!(
            add.parameters_schema()["properties"]["permission"]["enum"],
            json!(["pull", "triage", "push", "maintain", "admin"])
        );

        let remove = RemoveCollaboratorTool::new(client);
        assert_eq!(
            remove.parameters_schema()["required"],
            json!(["repo", "username"])
        );
    }

    #[tokio::test]
    async fn add_requires_username() {
        let tool = AddCollaboratorTool::new(unconfigured());
        let err = tool
            .execute(json!({ "repo": "octocat/hello-world" }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
