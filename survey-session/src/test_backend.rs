//! Test backend for driving sessions without a server.
//!
//! `TestApi` is an in-memory `SurveyApi` that serves pre-configured surveys and
//! responses, records every call, and stores posted responses so they can be
//! resumed by slug afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use survey_session::{LoadRequest, Session, SessionContext, TestApi};
//!
//! let api = Arc::new(TestApi::new().with_survey(survey).with_post_slug("R9"));
//! let session = Session::new(SessionContext::new(api.clone(), location), LoadRequest::by_id("S1"));
//! session.load().await?;
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use survey_session_types::{
    ApiError, Credential, NewResponse, PostedResponse, RecordedResponse, ResponseSlug, Survey,
    SurveyApi, SurveyId,
};

/// Calls received by a `TestApi`, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calls {
    /// Survey fetches, with whether a credential was attached.
    pub survey_fetches: Vec<(SurveyId, bool)>,
    pub response_fetches: Vec<ResponseSlug>,
    pub posts: Vec<NewResponse>,
}

#[derive(Debug, Default)]
struct TestApiState {
    surveys: HashMap<SurveyId, Survey>,
    responses: HashMap<ResponseSlug, RecordedResponse>,
    post_slugs: VecDeque<ResponseSlug>,
    survey_error: Option<ApiError>,
    post_error: Option<ApiError>,
    calls: Calls,
}

/// A test backend that serves pre-configured data.
///
/// Unpublished surveys are only served to credentialed fetches, as the real
/// backend does. `post_response` yields to the scheduler once before answering,
/// so a second submit can observe the first one in flight.
#[derive(Debug, Default)]
pub struct TestApi {
    state: Mutex<TestApiState>,
}

impl TestApi {
    /// Create a new empty test backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `survey` under its id.
    pub fn with_survey(mut self, survey: Survey) -> Self {
        let state = self.state_mut();
        state.surveys.insert(survey.id().clone(), survey);
        self
    }

    /// Serve a recorded response under `slug`.
    pub fn with_response(
        mut self,
        slug: impl Into<ResponseSlug>,
        response: RecordedResponse,
    ) -> Self {
        self.state_mut().responses.insert(slug.into(), response);
        self
    }

    /// Queue the slug returned by the next successful post.
    ///
    /// When the queue is empty, posts get `R1`, `R2`, ... by post count.
    pub fn with_post_slug(mut self, slug: impl Into<ResponseSlug>) -> Self {
        self.state_mut().post_slugs.push_back(slug.into());
        self
    }

    /// Fail every survey fetch with `message`.
    pub fn failing_survey_fetch(mut self, message: impl Into<String>) -> Self {
        self.state_mut().survey_error = Some(ApiError::new(message).with_status(500));
        self
    }

    /// Fail every post with `message`, until `recover_posts` is called.
    pub fn failing_posts(mut self, message: impl Into<String>) -> Self {
        self.state_mut().post_error = Some(ApiError::new(message).with_status(503));
        self
    }

    /// Let posts succeed again.
    pub fn recover_posts(&self) {
        self.state().post_error = None;
    }

    /// Snapshot of the calls received so far.
    pub fn calls(&self) -> Calls {
        self.state().calls.clone()
    }

    /// The response stored under `slug`, including posted ones.
    pub fn response(&self, slug: &ResponseSlug) -> Option<RecordedResponse> {
        self.state().responses.get(slug).cloned()
    }

    fn state(&self) -> MutexGuard<'_, TestApiState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut TestApiState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SurveyApi for TestApi {
    async fn fetch_survey(
        &self,
        survey_id: &SurveyId,
        credential: Option<&Credential>,
    ) -> Result<Survey, ApiError> {
        let mut state = self.state();
        state
            .calls
            .survey_fetches
            .push((survey_id.clone(), credential.is_some()));

        if let Some(err) = &state.survey_error {
            return Err(err.clone());
        }

        let survey = state
            .surveys
            .get(survey_id)
            .ok_or_else(|| ApiError::new("Survey not found").with_status(404))?;
        if credential.is_none() && !survey.status().is_published() {
            return Err(ApiError::new("Survey is not published").with_status(403));
        }
        Ok(survey.clone())
    }

    async fn fetch_response(&self, slug: &ResponseSlug) -> Result<RecordedResponse, ApiError> {
        let mut state = self.state();
        state.calls.response_fetches.push(slug.clone());

        state
            .responses
            .get(slug)
            .cloned()
            .ok_or_else(|| ApiError::new("Response not found").with_status(404))
    }

    async fn post_response(&self, response: &NewResponse) -> Result<PostedResponse, ApiError> {
        self.state().calls.posts.push(response.clone());

        tokio::task::yield_now().await;

        let mut state = self.state();
        if let Some(err) = &state.post_error {
            return Err(err.clone());
        }

        let slug = match state.post_slugs.pop_front() {
            Some(slug) => slug,
            None => ResponseSlug::new(format!("R{}", state.calls.posts.len())),
        };
        state.responses.insert(
            slug.clone(),
            RecordedResponse {
                survey_id: response.survey_id.clone(),
                selections: response.selections.clone(),
            },
        );
        Ok(PostedResponse { slug })
    }
}
