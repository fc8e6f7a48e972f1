//! Notion task tools — list, create, update, and archive pages in the
//! configured task database.
//!
//! The database schema these tools assume: a `Task name` title property,
//! a `Status` status property, an `Assignee` people property, a
//! `Due date` date property, and a `Description` rich-text property.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use adjutant_core::error::ToolError;
use adjutant_core::tool::{Tool, ToolResult, parse_args};

use super::client::NotionClient;

// --- Property payload builders ---

fn title_property(title: &str) -> Value {
    json!({ "title": [{ "text": { "content": title } }] })
}

fn status_property(status: &str) -> Value {
    json!({ "status": { "name": status } })
}

fn date_property(date: &str) -> Value {
    json!({ "date": { "start": date } })
}

fn rich_text_property(text: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": text } }] })
}

fn people_property(user_id: &str) -> Value {
    json!({ "people": [{ "id": user_id }] })
}

// --- Response shaping ---

/// Concatenate the plain text of a rich-text / title fragment array.
fn plain_text(fragments: &Value) -> String {
    fragments
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
        .filter_map(|f| f["plain_text"].as_str())
        .collect()
}

/// Reduce a page object to the summary the model reads.
fn task_summary(page: &Value) -> Value {
    let properties = &page["properties"];

    let title = plain_text(&properties["Task name"]["title"]);
    let status = properties["Status"]["status"]["name"]
        .as_str()
        .unwrap_or("No Status");
    let assignees: Vec<&str> = properties["Assignee"]["people"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();

    json!({
        "id": page["id"],
        "title": title,
        "status": status,
        "assignees": assignees,
    })
}

fn user_not_found(name: &str) -> ToolResult {
    ToolResult::err(format!(
        "Could not find Notion user matching name '{name}'."
    ))
}

// --- Tools ---

pub struct ShowTasksTool {
    client: Arc<NotionClient>,
}

impl ShowTasksTool {
    pub fn new(client: Arc<NotionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ShowTasksTool {
    fn name(&self) -> &str {
        "show_notion_tasks"
    }

    fn description(&self) -> &str {
        "Show tasks from the configured Notion database that are currently \
         'Not started' or 'In Progress'. Returns each task's id, title, status, \
         and assignees."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: Value) -> Result<ToolResult, ToolError> {
        let (_, db_id) = self.client.database_credentials()?;

        let payload = json!({
            "filter": {
                "or": [
                    { "property": "Status", "status": { "equals": "Not started" } },
                    { "property": "Status", "status": { "equals": "In Progress" } },
                ]
            },
            "page_size": 50,
        });

        let data = self
            .client
            .post(&format!("/databases/{db_id}/query"), &payload)
            .await?;

        let tasks: Vec<Value> = data["results"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(task_summary)
            .collect();

        Ok(ToolResult::ok(json!({
            "count": tasks.len(),
            "tasks": tasks,
        })))
    }
}

pub struct CreateTaskTool {
    client: Arc<NotionClient>,
}

impl CreateTaskTool {
    pub fn new(client: Arc<NotionClient>) -> Self {
        Self { client }
    }
}

fn default_status() -> String {
    "Not started".into()
}

#[async_trait]
impl Tool for CreateTaskTool {
    fn name(&self) -> &str {
        "create_notion_task"
    }

    fn description(&self) -> &str {
        "Add a new task to the Notion task database. Optionally set a status, \
         a due date (YYYY-MM-DD), a description, and an assignee by name."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "The task title"
                },
                "status": {
                    "type": "string",
                    "description": "Initial status (default 'Not started')",
                    "default": "Not started"
                },
                "due_date": {
                    "type": "string",
                    "description": "Due date in ISO format (YYYY-MM-DD)"
                },
                "description": {
                    "type": "string",
                    "description": "Longer task description"
                },
                "assignee_name": {
                    "type": "string",
                    "description": "Name of the workspace user to assign (matched case-insensitively)"
                }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Args {
            title: String,
            #[serde(default = "default_status")]
            status: String,
            due_date: Option<String>,
            description: Option<String>,
            assignee_name: Option<String>,
        }
        let args: Args = parse_args(arguments)?;
        let (_, db_id) = self.client.database_credentials()?;

        let mut properties = serde_json::Map::new();
        properties.insert("Task name".into(), title_property(&args.title));
        properties.insert("Status".into(), status_property(&args.status));
        if let Some(ref due_date) = args.due_date {
            properties.insert("Due date".into(), date_property(due_date));
        }
        if let Some(ref description) = args.description {
            properties.insert("Description".into(), rich_text_property(description));
        }
        if let Some(ref name) = args.assignee_name {
            match self.client.find_user_id(name).await? {
                Some(user_id) => {
                    properties.insert("Assignee".into(), people_property(&user_id));
                }
                None => return Ok(user_not_found(name)),
            }
        }

        let payload = json!({
            "parent": { "database_id": db_id },
            "properties": properties,
        });

        let data = self.client.post("/pages", &payload).await?;

        Ok(ToolResult::ok(json!({
            "page_id": data["id"],
            "url": data["url"],
        })))
    }
}

pub struct UpdateTaskTool {
    client: Arc<NotionClient>,
}

impl UpdateTaskTool {
    pub fn new(client: Arc<NotionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for UpdateTaskTool {
    fn name(&self) -> &str {
        "update_notion_task"
    }

    fn description(&self) -> &str {
        "Update an existing Notion task by page id. Only the provided fields \
         change; omitted fields keep their current values."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "page_id": {
                    "type": "string",
                    "description": "The id of the task page to update"
                },
                "title": { "type": "string", "description": "New title" },
                "status": { "type": "string", "description": "New status" },
                "due_date": {
                    "type": "string",
                    "description": "New due date in ISO format (YYYY-MM-DD)"
                },
                "description": { "type": "string", "description": "New description" },
                "assignee_name": {
                    "type": "string",
                    "description": "Name of the workspace user to assign (matched case-insensitively)"
                }
            },
            "required": ["page_id"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Args {
            page_id: String,
            title: Option<String>,
            status: Option<String>,
            due_date: Option<String>,
            description: Option<String>,
            assignee_name: Option<String>,
        }
        let args: Args = parse_args(arguments)?;
        self.client.token()?;

        let mut properties = serde_json::Map::new();
        if let Some(ref title) = args.title {
            properties.insert("Task name".into(), title_property(title));
        }
        if let Some(ref status) = args.status {
            properties.insert("Status".into(), status_property(status));
        }
        if let Some(ref due_date) = args.due_date {
            properties.insert("Due date".into(), date_property(due_date));
        }
        if let Some(ref description) = args.description {
            properties.insert("Description".into(), rich_text_property(description));
        }
        if let Some(ref name) = args.assignee_name {
            match self.client.find_user_id(name).await? {
                Some(user_id) => {
                    properties.insert("Assignee".into(), people_property(&user_id));
                }
                None => return Ok(user_not_found(name)),
            }
        }

        if properties.is_empty() {
            return Ok(ToolResult::err("No fields provided to update."));
        }

        let payload = json!({ "properties": properties });
        let data = self
            .client
            .patch(&format!("/pages/{}", args.page_id), &payload)
            .await?;

        let mut task = task_summary(&data);
        task["due_date"] = data["properties"]["Due date"]["date"]["start"].clone();
        task["url"] = data["url"].clone();

        Ok(ToolResult::ok(json!({ "task": task })))
    }
}

pub struct DeleteTaskTool {
    client: Arc<NotionClient>,
}

impl DeleteTaskTool {
    pub fn new(client: Arc<NotionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for DeleteTaskTool {
    fn name(&self) -> &str {
        "delete_notion_task"
    }

    fn description(&self) -> &str {
        "Archive a Notion task by page id. Archived pages disappear from the \
         database view but can be restored from Notion's trash."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "page_id": {
                    "type": "string",
                    "description": "The id of the task page to archive"
                }
            },
            "required": ["page_id"]
        })
    }

    async fn execute(&self, arguments: Value) -> Result<ToolResult, ToolError> {
        #[derive(Deserialize)]
        struct Args {
            page_id: String,
        }
        let args: Args = parse_args(arguments)?;
        self.client.token()?;

        let payload = json!({ "archived": true });
        self.client
            .patch(&format!("/pages/{}", args.page_id), &payload)
            .await?;

        Ok(ToolResult::ok(json!({
            "page_id": args.page_id,
            "archived": true,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adjutant_config::NotionConfig;

    fn unconfigured() -> Arc<NotionClient> {
        Arc::new(NotionClient::new(&NotionConfig::default()))
    }

    fn token_only() -> Arc<NotionClient> {
        Arc::new(NotionClient::new(&NotionConfig {
            token: Some("secret".into()),
            ..NotionConfig::default()
        }))
    }

    #[test]
    fn tool_definitions() {
        let client = unconfigured();
        let show = ShowTasksTool::new(client.clone());
        assert_eq!(show.name(), "show_notion_tasks");

        let create = CreateTaskTool::new(client.clone());
        assert_eq!(
            create.parameters_schema()["required"],
            json!(["title"])
        );

        let update = UpdateTaskTool::new(client.clone());
        assert_eq!(
            update.parameters_schema()["required"],
            json!(["page_id"])
        );

        let delete = DeleteTaskTool::new(client);
        assert_eq!(delete.name(), "delete_notion_task");
    }

    #[tokio::test]
    async fn show_without_credentials_is_graceful() {
        let tool = ShowTasksTool::new(unconfigured());
        let err = tool.execute(json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "DATABASE_ID or NOTION_TOKEN is not set.");
    }

    #[tokio::test]
    async fn create_without_credentials_is_graceful() {
        let tool = CreateTaskTool::new(unconfigured());
        let err = tool
            .execute(json!({ "title": "Buy milk" }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "DATABASE_ID or NOTION_TOKEN is not set.");
    }

    #[tokio::test]
    async fn update_without_token_is_graceful() {
        // Update needs the token but not the database id
        let tool = UpdateTaskTool::new(unconfigured());
        let err = tool
            .execute(json!({ "page_id": "p1", "status": "Done" }))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "NOTION_TOKEN is not set.");
    }

    #[tokio::test]
    async fn create_requires_title() {
        let tool = CreateTaskTool::new(token_only());
        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn update_with_no_fields_fails_before_any_request() {
        let tool = UpdateTaskTool::new(token_only());
        let result = tool.execute(json!({ "page_id": "p1" })).await.unwrap();
        assert!(!result.success);
        assert_eq!(
            result.error_message(),
            Some("No fields provided to update.")
        );
    }

    #[test]
    fn task_summary_shapes_a_page() {
        let page = json!({
            "id": "page-123",
            "properties": {
                "Task name": {
                    "title": [
                        { "plain_text": "Write the " },
                        { "plain_text": "report" }
                    ]
                },
                "Status": { "status": { "name": "In Progress" } },
                "Assignee": {
                    "people": [
                        { "name": "Ada", "id": "u1" },
                        { "name": "Grace", "id": "u2" }
                    ]
                }
            }
        });

        let summary = task_summary(&page);
        assert_eq!(summary["id"], "page-123");
        assert_eq!(summary["title"], "Write the report");
        assert_eq!(summary["status"], "In Progress");
        assert_eq!(summary["assignees"], json!(["Ada", "Grace"]));
    }

    #[test]
    fn task_summary_tolerates_missing_properties() {
        let summary = task_summary(&json!({ "id": "page-1", "properties": {} }));
        assert_eq!(summary["title"], "");
        assert_eq!(summary["status"], "No Status");
        assert_eq!(summary["assignees"], json!([]));
    }

    #[test]
    fn property_builders_match_the_notion_shapes() {
        assert_eq!(
            title_property("Fix roof"),
            json!({ "title": [{ "text": { "content": "Fix roof" } }] })
        );
        assert_eq!(
            status_property("Done"),
            json!({ "status": { "name": "Done" } })
        );
        assert_eq!(
            date_property("2025-03-01"),
            json!({ "date": { "start": "2025-03-01" } })
        );
        assert_eq!(
            people_property("u1"),
            json!({ "people": [{ "id": "u1" }] })
        );
    }
}
