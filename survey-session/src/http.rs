//! `SurveyApi` over the survey backend's JSON HTTP interface.
//!
//! - `GET  {base}/surveys/{id}` (bearer credential in preview mode)
//! - `GET  {base}/responses/{slug}`
//! - `POST {base}/responses` with `{ surveyId, selections }`, answering `{ slug }`

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use survey_session_types::{
    ApiError, Credential, NewResponse, PostedResponse, RecordedResponse, ResponseSlug, Survey,
    SurveyApi, SurveyId,
};
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for `HttpSurveyApi`.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL of the backend API, e.g. `https://api.example.com/v1/`.
    pub base_url: Url,
    pub timeout: Duration,
}

impl HttpConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Survey backend client.
#[derive(Debug, Clone)]
pub struct HttpSurveyApi {
    http: Client,
    base_url: Url,
}

impl HttpSurveyApi {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::new(format!("Invalid API base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| ApiError::new(format!("Request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status, &body));
        }

        response
            .json()
            .await
            .map_err(|err| ApiError::new(format!("Failed to parse response: {err}")))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Turn a non-success response into an `ApiError`, keeping the backend's message
/// when the body carries one.
fn error_from_body(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|body| body.message)
        .unwrap_or_else(|_| {
            let reason = status.canonical_reason().unwrap_or("Request failed");
            format!("{reason} ({})", status.as_u16())
        });
    ApiError::new(message).with_status(status.as_u16())
}

#[async_trait]
impl SurveyApi for HttpSurveyApi {
    async fn fetch_survey(
        &self,
        survey_id: &SurveyId,
        credential: Option<&Credential>,
    ) -> Result<Survey, ApiError> {
        let url = self.endpoint(&["surveys", survey_id.as_str()])?;
        tracing::debug!(%url, credentialed = credential.is_some(), "fetching survey");

        let mut request = self.http.get(url);
        if let Some(credential) = credential {
            request = request.bearer_auth(credential.token());
        }
        self.send(request).await
    }

    async fn fetch_response(&self, slug: &ResponseSlug) -> Result<RecordedResponse, ApiError> {
        let url = self.endpoint(&["responses", slug.as_str()])?;
        tracing::debug!(%url, "fetching response");

        self.send(self.http.get(url)).await
    }

    async fn post_response(&self, response: &NewResponse) -> Result<PostedResponse, ApiError> {
        let url = self.endpoint(&["responses"])?;
        tracing::debug!(%url, survey_id = %response.survey_id, "posting response");

        self.send(self.http.post(url).json(response)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpSurveyApi {
        HttpSurveyApi::new(HttpConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn endpoint_appends_segments() {
        let api = api("https://api.example.test/v1/");
        let url = api.endpoint(&["surveys", "S1"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.test/v1/surveys/S1");
    }

    #[test]
    fn endpoint_encodes_slugs() {
        let api = api("https://api.example.test");
        let url = api.endpoint(&["responses", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.test/responses/a%2Fb%20c");
    }

    #[test]
    fn error_body_message_is_kept() {
        let err = error_from_body(StatusCode::NOT_FOUND, r#"{"message":"Survey not found"}"#);
        assert_eq!(err.message, "Survey not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn error_without_body_uses_status() {
        let err = error_from_body(StatusCode::FORBIDDEN, "<html>nope</html>");
        assert_eq!(err.message, "Forbidden (403)");
        assert_eq!(err.status, Some(403));
    }
}
