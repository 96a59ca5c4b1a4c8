//! REST client for the tracker API.

use crate::config::TuiConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use trackboard_core::api::endpoints;
use trackboard_core::entities::{ErrorBody, SummaryResponse};
use trackboard_core::{
    ApiError, ApiResult, KpiSnapshot, Milestone, MilestoneId, MilestoneInput, Project, ProjectId,
    ProjectInput, Risk, RiskId, RiskInput, TrackerApi,
};

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> ApiResult<Self> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport)?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut request = self.client.get(self.url(path));
        if let Some(query) = query {
            request = request.query(query);
        }
        let response = request.send().await.map_err(transport)?;
        parse_response(response).await
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        parse_response(response).await
    }

    async fn put_json<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        parse_response(response).await
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.map_err(transport)?;
        Err(status_error(status.as_u16(), &text))
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// Build a status error, preferring the server's `{ "error": .. }` message.
fn status_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|body| body.error)
        .unwrap_or_else(|_| body.trim().to_string());
    ApiError::Status { status, message }
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let text = response.text().await.map_err(transport)?;
    if status.is_success() {
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    } else {
        Err(status_error(status.as_u16(), &text))
    }
}

#[async_trait]
impl TrackerApi for RestClient {
    async fn fetch_kpis(&self) -> ApiResult<KpiSnapshot> {
        self.get_json::<_, ()>(endpoints::KPIS, None).await
    }

    async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.get_json::<_, ()>(endpoints::PROJECTS, None).await
    }

    async fn create_project(&self, input: &ProjectInput) -> ApiResult<Project> {
        self.post_json(endpoints::PROJECTS, input).await
    }

    async fn update_project(&self, id: ProjectId, input: &ProjectInput) -> ApiResult<Project> {
        self.put_json(&endpoints::project(id), input).await
    }

    async fn delete_project(&self, id: ProjectId) -> ApiResult<()> {
        self.delete(&endpoints::project(id)).await
    }

    async fn list_milestones(&self, project_id: ProjectId) -> ApiResult<Vec<Milestone>> {
        self.get_json(endpoints::MILESTONES, Some(&endpoints::project_scope(project_id)))
            .await
    }

    async fn create_milestone(&self, input: &MilestoneInput) -> ApiResult<Milestone> {
        self.post_json(endpoints::MILESTONES, input).await
    }

    async fn update_milestone(&self, id: MilestoneId, input: &MilestoneInput) -> ApiResult<Milestone> {
        self.put_json(&endpoints::milestone(id), input).await
    }

    async fn delete_milestone(&self, id: MilestoneId) -> ApiResult<()> {
        self.delete(&endpoints::milestone(id)).await
    }

    async fn list_risks(&self, project_id: ProjectId) -> ApiResult<Vec<Risk>> {
        self.get_json(endpoints::RISKS, Some(&endpoints::project_scope(project_id)))
            .await
    }

    async fn create_risk(&self, input: &RiskInput) -> ApiResult<Risk> {
        self.post_json(endpoints::RISKS, input).await
    }

    async fn update_risk(&self, id: RiskId, input: &RiskInput) -> ApiResult<Risk> {
        self.put_json(&endpoints::risk(id), input).await
    }

    async fn delete_risk(&self, id: RiskId) -> ApiResult<()> {
        self.delete(&endpoints::risk(id)).await
    }

    async fn summarize_project(&self, project_id: ProjectId) -> ApiResult<String> {
        let response: SummaryResponse = self
            .post_json(&endpoints::summarize(project_id), &serde_json::json!({}))
            .await?;
        Ok(response.summary)
    }

    fn export_csv_url(&self) -> String {
        self.url(endpoints::EXPORT_CSV)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_prefers_server_message() {
        let err = status_error(404, r#"{"error": "Project not found"}"#);
        assert_eq!(
            err,
            ApiError::Status {
                status: 404,
                message: "Project not found".into()
            }
        );
        let err = status_error(502, "Bad Gateway\n");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }
}
