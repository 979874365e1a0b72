use std::fmt;

use async_trait::async_trait;

use crate::{
    ApiError, CollaboratorError, NewResponse, PostedResponse, Question, RecordedResponse,
    ResponseSlug, Survey, SurveyId,
};

/// Bearer credential for privileged (owner/preview) requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the raw token.
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Encoded shareable artifact for a response link (e.g. a QR code image).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareImage {
    /// Media type of `data`, e.g. `image/svg+xml`.
    pub media_type: String,
    pub data: Vec<u8>,
}

/// The survey backend a session talks to.
///
/// Transport is the implementor's concern. Every failure, including transport
/// failures, is reported as an `ApiError`.
#[async_trait]
pub trait SurveyApi: Send + Sync {
    /// Fetch a survey. `credential` is only passed in privileged mode.
    async fn fetch_survey(
        &self,
        survey_id: &SurveyId,
        credential: Option<&Credential>,
    ) -> Result<Survey, ApiError>;

    /// Fetch a previously recorded response.
    async fn fetch_response(&self, slug: &ResponseSlug) -> Result<RecordedResponse, ApiError>;

    /// Record a response, returning its identity.
    async fn post_response(&self, response: &NewResponse) -> Result<PostedResponse, ApiError>;
}

/// Source of bearer credentials. Only consulted when loading in privileged mode.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn obtain_credential(&self) -> Result<Credential, CollaboratorError>;
}

/// The respondent-visible address (browser location, printed link, ...).
pub trait LocationUpdater: Send + Sync {
    /// Replace the current address with `address` (a path plus query, relative to
    /// the current origin) without navigating away.
    fn replace(&self, address: &str);

    /// The full current address.
    fn href(&self) -> String;
}

/// Turns a shareable URL into an image. Best-effort: failures are never fatal.
#[async_trait]
pub trait ShareEncoder: Send + Sync {
    async fn encode(&self, url: &str) -> Result<ShareImage, CollaboratorError>;
}

/// Trait for frontends that present a single question to the respondent.
///
/// Renderers receive the question, its current selection and whether it should
/// be flagged as unanswered, and return the respondent's new selection.
pub trait QuestionRenderer {
    /// The error type for this renderer.
    type Error: Into<anyhow::Error>;

    /// Present question `index` and collect a selection.
    ///
    /// # Returns
    /// * `Ok(Some(option))` with the chosen option index
    /// * `Ok(None)` if the respondent skipped the question
    /// * `Err` on cancellation or renderer failure
    fn render(
        &self,
        index: usize,
        question: &Question,
        selection: Option<usize>,
        flagged: bool,
    ) -> Result<Option<usize>, Self::Error>;
}
