//! Repository file tools — create, update, and delete files through the
//! contents API.
//!
//! File bodies travel base64-encoded on the wire. Update and delete need
//! the current blob sha, so both start with a contents lookup.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use adjutant_core::error::ToolError;
use adjutant_core::tool::{Tool, ToolResult, parse_args};

use super::client::GithubClient;

fn default_main() -> String {
    "main".into()
}

#[derive(Deserialize)]
struct FileArgs {
    repo: String,
    owner: Option<String>,
    path: String,
    message: String,
    #[serde(default)]
    content: String,
    #[serde(default = "default_main")]
    branch: String,
}

fn file_schema(with_content: bool) -> Value {
    let mut properties = json!({
        "repo": {
            "type": "string",
            "description": "Repository, as 'owner/name' or a bare name"
        },
        "owner": {
            "type": "string",
            "description": "Owner, when 'repo' is a bare name"
        },
        "path": {
            "type": "string",
            "description": "File path within the repository"
        },
        "message": {
            "type": "string",
            "description": "Commit message"
        },
        "branch": {
            "type": "string",
            "description": "Branch to commit to (default 'main')",
            "default": "main"
        }
    });
    let mut required = vec!["repo", "path", "message"];
    if with_content {
        properties["content"] = json!({
            "type": "string",
            "description": "The full file content as plain text"
        });
        required.push("content");
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub struct CreateFileTool {
    client: Arc<GithubClient>,
}

impl CreateFileTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CreateFileTool {
    fn name(&self) -> &str {
        "github_create_file"
    }

    fn description(&self) -> &str {
        "Create a new file in a repository with a commit. Fails if the file \
         already exists; use github_update_file for that."
    }

    fn parameters_schema(&self) -> Value {
        file_schema(true)
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        let args: FileArgs = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;

        let body = json!({
            "message": args.message,
            "content": BASE64.encode(&args.content),
            "branch": args.branch,
        });
        let result = self
            .client
            .put(&format!("/repos/{full_name}/contents/{}", args.path), Some(&body))
            .await?;

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "path": args.path,
            "branch": args.branch,
            "commit_sha": result["commit"]["sha"],
        })))
    }
}

pub struct UpdateFileTool {
    client: Arc<GithubClient>,
}

impl UpdateFileTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for UpdateFileTool {
    fn name(&self) -> &str {
        "github_update_file"
    }

    fn description(&self) -> &str {
        "Replace the content of an existing file with a commit. The file must \
         already exist on the target branch."
    }

    fn parameters_schema(&self) -> Value {
        file_schema(true)
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        let args: FileArgs = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;
        let contents_path = format!("/repos/{full_name}/contents/{}", args.path);

        let current = self
            .client
            .get_with_query(&contents_path, &[("ref", args.branch.clone())])
            .await?;
        let sha = current["sha"].as_str().unwrap_or_default();

        let body = json!({
            "message": args.message,
            "content": BASE64.encode(&args.content),
            "sha": sha,
            "branch": args.branch,
        });
        let result = self.client.put(&contents_path, Some(&body)).await?;

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "path": args.path,
            "branch": args.branch,
            "commit_sha": result["commit"]["sha"],
        })))
    }
}

pub struct DeleteFileTool {
    client: Arc<GithubClient>,
}

impl DeleteFileTool {
    pub fn new(client: Arc<GithubClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for DeleteFileTool {
    fn name(&self) -> &str {
        "github_delete_file"
    }

    fn description(&self) -> &str {
        "Delete a file from a repository with a commit. DESTRUCTIVE."
    }

    fn parameters_schema(&self) -> Value {
        file_schema(false)
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        let args: FileArgs = parse_args(arguments)?;
        let full_name = self
            .client
            .resolve_repo(args.owner.as_deref(), &args.repo)?;
        let contents_path = format!("/repos/{full_name}/contents/{}", args.path);

        let current = self
            .client
            .get_with_query(&contents_path, &[("ref", args.branch.clone())])
            .await?;
        let sha = current["sha"].as_str().unwrap_or_default();

        let body = json!({
            "message": args.message,
            "sha": sha,
            "branch": args.branch,
        });
        let result = self.client.delete_with_body(&contents_path, &body).await?;

        Ok(ToolResult::ok(json!({
            "repo": full_name,
            "path": args.path,
            "branch": args.branch,
            "commit_sha": result["commit"]["sha"],
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
        let create = CreateFileTool::new(client.clone());
        assert_eq!(create.name(), "github_create_file");
        assert_eq!(
            create.parameters_schema()["required"],
            json!(["repo", "path", "message", "content"])
        );

        // Delete takes no content argument
        let delete = DeleteFileTool::new(client);
        assert_eq!(
            delete.parameters_schema()["required"],
            json!(["repo", "path", "message"])
        );
        assert!(delete.parameters_schema()["properties"]["content"].is_null());
    }

    #[tokio::test]
    async fn create_without_token_is_graceful() {
        let tool = CreateFileTool::new(unconfigured());
        let err = tool
            .execute(json!({
                "repo": "octocat/hello-world",
                "path": "README.md",
                "message": "add readme",
                "content": "# Hello"
            }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "GITHUB_TOKEN is not set.");
    }

    #[tokio::test]
    async fn update_requires_message() {
        let tool = UpdateFileTool::new(unconfigured());
        let err = tool
            .execute(json!({
                "repo": "octocat/hello-world",
                "path": "README.md",
                "content": "# Hello"
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
