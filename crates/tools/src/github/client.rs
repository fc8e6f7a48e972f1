//! Thin typed client for the GitHub REST API (v3).
//!
//! Like the Notion client, it is constructed even when no token is
//! configured; the missing credential turns into a graceful failure
//! result at the tool boundary instead of an error at startup.

use serde_json::Value;
use tracing::debug;

use adjutant_config::GithubConfig;
use adjutant_core::error::ToolError;

const GITHUB_API_BASE: &str = "https://api.github.com";

pub struct GithubClient {
    token: Option<String>,
    default_owner: Option<String>,
    client: reqwest::Client,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Self {
        // GitHub rejects requests without a User-Agent
        let client = reqwest::Client::builder()
            .user_agent(concat!("adjutant/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            token: config.token.clone(),
            default_owner: config.default_owner.clone(),
            client,
        }
    }

    /// The access token, or the graceful "not set" failure.
    pub fn token(&self) -> Result<&str, ToolError> {
        self.token
            .as_deref()
            .ok_or_else(|| ToolError::NotConfigured("GITHUB_TOKEN is not set.".into()))
    }

    /// Resolve a repository argument to `owner/name` form.
    ///
    /// Accepts a full name as-is; a bare name is qualified with the
    /// explicit `owner` argument or the configured default owner.
    pub fn resolve_repo(&self, owner: Option<&str>, repo: &str) -> Result<String, ToolError> {
        if repo.contains('/') {
            return Ok(repo.to_string());
        }
        if let Some(owner) = owner {
            return Ok(format!("{owner}/{repo}"));
        }
        if let Some(ref owner) = self.default_owner {
            return Ok(format!("{owner}/{repo}"));
        }
        Err(ToolError::NotConfigured(
            "owner is required if repo is not in 'owner/name' form.".into(),
        ))
    }

    pub async fn get(&self, path: &str) -> Result<Value, ToolError> {
        self.request(reqwest::Method::GET, path, &[], None).await
    }

    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, ToolError> {
        self.request(reqwest::Method::GET, path, query, None).await
    }

    /// Fetch a paginated array endpoint, following `page` until `limit`
    /// items are collected or the server returns a short page.
    pub async fn get_paged(
        &self,
        path: &str,
        base_query: &[(&str, String)],
        limit: u32,
    ) -> Result<Vec<Value>, ToolError> {
        let per_page = limit.min(100);
        let mut items: Vec<Value> = Vec::new();
        let mut page = 1u32;

        while (items.len() as u32) < limit {
            let mut query: Vec<(&str, String)> = base_query.to_vec();
            query.push(("per_page", per_page.to_string()));
            query.push(("page", page.to_string()));

            let data = self.get_with_query(path, &query).await?;
            let Some(batch) = data.as_array() else { break };
            let received = batch.len();
            items.extend(batch.iter().cloned());

            if received < per_page as usize {
                break;
            }
            page += 1;
        }

        items.truncate(limit as usize);
        Ok(items)
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ToolError> {
        self.request(reqwest::Method::POST, path, &[], Some(body))
            .await
    }

    pub async fn put(&self, path: &str, body: Option<&Value>) -> Result<Value, ToolError> {
        self.request(reqwest::Method::PUT, path, &[], body).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value, ToolError> {
        self.request(reqwest::Method::PATCH, path, &[], Some(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ToolError> {
        self.request(reqwest::Method::DELETE, path, &[], None).await
    }

    pub async fn delete_with_body(&self, path: &str, body: &Value) -> Result<Value, ToolError> {
        self.request(reqwest::Method::DELETE, path, &[], Some(body))
            .await
    }

    async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, ToolError> {
        let token = self.token()?;
        let url = format!("{GITHUB_API_BASE}{path}");
        debug!(method = %method, path, "GitHub API request");

        let mut request = self
            .client
            .request(method, &url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

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
        let text = response
            .text()
            .await
            .map_err(|e| ToolError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(ToolError::Api {
                status_code: status,
                message: text,
            });
        }

        // 204 No Content and friends
        if text.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ToolError::Network(e.to_string()))
    }
}

/// Clamp a requested list size to a sane window.
pub(crate) fn clamp_limit(limit: Option<u32>, default: u32, max: u32) -> u32 {
    limit.unwrap_or(default).clamp(1, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(default_owner: Option<&str>) -> GithubClient {
        GithubClient::new(&GithubConfig {
            token: Some("ghp_test".into()),
            default_owner: default_owner.map(String::from),
        })
    }

    #[test]
    fn missing_token_is_graceful() {
        let client = GithubClient::new(&GithubConfig::default());
        let err = client.token().unwrap_err();
        assert_eq!(err.to_string(), "GITHUB_TOKEN is not set.");
    }

    #[test]
    fn full_name_passes_through() {
        let client = client_with(None);
        assert_eq!(
            client.resolve_repo(None, "octocat/hello-world").unwrap(),
            "octocat/hello-world"
        );
        // An explicit owner does not override a full name
        assert_eq!(
            client.resolve_repo(Some("other"), "octocat/hello-world").unwrap(),
            "octocat/hello-world"
        );
    }

    #[test]
    fn bare_name_uses_explicit_owner_first() {
        let client = client_with(Some("default-org"));
        assert_eq!(
            client.resolve_repo(Some("octocat"), "hello-world").unwrap(),
            "octocat/hello-world"
        );
        assert_eq!(
            client.resolve_repo(None, "hello-world").unwrap(),
            "default-org/hello-world"
        );
    }

    #[test]
    fn bare_name_without_any_owner_fails() {
        let client = client_with(None);
        let err = client.resolve_repo(None, "hello-world").unwrap_err();
        assert_eq!(
            err.to_string(),
            "owner is required if repo is not in 'owner/name' form."
        );
    }

    #[test]
    fn limits_are_clamped() {
        assert_eq!(clamp_limit(None, 20, 100), 20);
        assert_eq!(clamp_limit(Some(0), 20, 100), 1);
        assert_eq!(clamp_limit(Some(5000), 20, 100), 100);
        assert_eq!(clamp_limit(Some(42), 20, 100), 42);
    }

    #[tokio::test]
    async fn requests_without_token_never_hit_the_network() {
        let client = GithubClient::new(&GithubConfig::default());
        let err = client.get("/user").await.unwrap_err();
        assert!(matches!(err, ToolError::NotConfigured(_)));
    }
}
