//! Thin typed client for the Notion REST API.
//!
//! Credentials are optional at construction: a client built without a
//! token still exists, and every call through it reports the missing
//! credential as a [`ToolError::NotConfigured`] — which the registry
//! folds into a graceful failure result for the model.

use serde_json::Value;
use tracing::debug;

use adjutant_config::NotionConfig;
use adjutant_core::error::ToolError;

const NOTION_API_BASE: &str = "https://api.notion.com/v1";

pub struct NotionClient {
    token: Option<String>,
    database_id: Option<String>,
    version: String,
    client: reqwest::Client,
}

impl NotionClient {
    pub fn new(config: &NotionConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            token: config.token.clone(),
            database_id: config.database_id.clone(),
            version: config.version.clone(),
            client,
        }
    }

    /// The integration token, or the graceful "not set" failure.
    pub fn token(&self) -> Result<&str, ToolError> {
        self.token
            .as_deref()
            .ok_or_else(|| ToolError::NotConfigured("NOTION_TOKEN is not set.".into()))
    }

    /// Token plus task-database id, for the tools that query the
    /// configured database. Either one missing yields the combined
    /// message the model is expected to relay.
    pub fn database_credentials(&self) -> Result<(&str, &str), ToolError> {
        match (self.token.as_deref(), self.database_id.as_deref()) {
            (Some(token), Some(db_id)) => Ok((token, db_id)),
            _ => Err(ToolError::NotConfigured(
                "DATABASE_ID or NOTION_TOKEN is not set.".into(),
            )),
        }
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ToolError> {
        self.request(reqwest::Method::POST, path, &[], Some(body))
            .await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value, ToolError> {
        self.request(reqwest::Method::PATCH, path, &[], Some(body))
            .await
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ToolError> {
        self.request(reqwest::Method::GET, path, query, None).await
    }

    async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, ToolError> {
        let token = self.token()?;
        let url = format!("{NOTION_API_BASE}{path}");
        debug!(method = %method, path, "Notion API request");

        let mut request = self
            .client
            .request(method, &url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Notion-Version", &self.version)
            .header("Content-Type", "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ToolError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let message = response.text().await.unwrap_or_default();
            return Err(ToolError::Api {
                status_code: status,
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ToolError::Network(e.to_string()))
    }

    /// Resolve a person's name to a workspace user id.
    ///
    /// Walks the paginated user list and returns the first user whose
    /// display name contains `name` (case-insensitive). `Ok(None)` means
    /// the whole list was searched without a match.
    pub async fn find_user_id(&self, name: &str) -> Result<Option<String>, ToolError> {
        let needle = name.to_lowercase();
        let mut cursor: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(ref c) = cursor {
                query.push(("start_cursor", c.clone()));
            }

            let data = self.get("/users", &query).await?;

            for user in data["results"].as_array().map(Vec::as_slice).unwrap_or(&[]) {
                let user_name = user["name"].as_str().unwrap_or_default();
                if user_name.to_lowercase().contains(&needle) {
                    return Ok(user["id"].as_str().map(String::from));
                }
            }

            if !data["has_more"].as_bool().unwrap_or(false) {
                return Ok(None);
            }
            cursor = data["next_cursor"].as_str().map(String::from);
            if cursor.is_none() {
                return Ok(None);
            }
        }
    }
}
