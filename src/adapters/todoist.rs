//! Todoist REST API client.
//!
//! Endpoints used:
//! - GET  /projects
//! - GET  /sections?project_id=<id>
//! - POST /tasks
//!
//! Auth: Bearer token, held by the client and attached to every request.

use std::collections::HashMap;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::domain::TaskPayload;

/// Errors returned by the Todoist client
#[derive(Debug, Error)]
pub enum TodoistError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Todoist API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    #[error("Project \"{0}\" not found.")]
    ProjectNotFound(String),
}

/// IDs arrive as strings from the REST API, but older payloads used numbers
fn flexible_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

/// A project as returned by GET /projects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub name: String,
}

/// A section as returned by GET /sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub name: String,
}

/// The parts of a created task we report back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTask {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub content: String,
}

/// Todoist REST client
pub struct TodoistClient {
    /// API root, e.g. https://api.todoist.com/rest/v2
    api_url: String,
    /// Personal API token
    token: String,
    /// HTTP client
    client: reqwest::Client,
}

impl TodoistClient {
    /// Create a new client
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build API URL
    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    /// Turn a non-success response into an error carrying its body
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, TodoistError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TodoistError::Api { status, body })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TodoistError> {
        let response = self
            .client
            .get(self.api_url(path))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    /// List all projects
    pub async fn list_projects(&self) -> Result<Vec<Project>, TodoistError> {
        self.get_json("projects", &[]).await
    }

    /// Find a project by exact name
    pub async fn find_project(&self, name: &str) -> Result<Project, TodoistError> {
        self.list_projects()
            .await?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| TodoistError::ProjectNotFound(name.to_string()))
    }

    /// List the sections of a project
    pub async fn list_sections(&self, project_id: &str) -> Result<Vec<Section>, TodoistError> {
        self.get_json("sections", &[("project_id", project_id)]).await
    }

    /// Section name → section ID for a project
    pub async fn section_map(&self, project_id: &str) -> Result<HashMap<String, String>, TodoistError> {
        let sections = self.list_sections(project_id).await?;
        debug!(project_id, count = sections.len(), "Loaded sections");
        Ok(sections.into_iter().map(|s| (s.name, s.id)).collect())
    }

    /// Create a task
    pub async fn create_task(&self, payload: &TaskPayload) -> Result<CreatedTask, TodoistError> {
        let response = self
            .client
            .post(self.api_url("tasks"))
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await?;

        match Self::check(response).await {
            Ok(response) => Ok(response.json().await?),
            Err(TodoistError::Api { status, body }) => {
                error!("Failed to create task: {}", body);
                Err(TodoistError::Api { status, body })
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        let client = TodoistClient::new("https://api.todoist.com/rest/v2/", "TOKEN");
        assert_eq!(
            client.api_url("projects"),
            "https://api.todoist.com/rest/v2/projects"
        );
    }

    #[test]
    fn test_ids_accept_strings_and_numbers() {
        let projects: Vec<Project> = serde_json::from_str(
            r#"[{"id": "2203306141", "name": "Course"}, {"id": 42, "name": "Inbox", "color": "grey"}]"#,
        )
        .unwrap();

        assert_eq!(projects[0].id, "2203306141");
        assert_eq!(projects[1].id, "42");
    }

    #[test]
    fn test_project_not_found_message() {
        let err = TodoistError::ProjectNotFound("Course".to_string());
        assert_eq!(err.to_string(), "Project \"Course\" not found.");
    }
}
