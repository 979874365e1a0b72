use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use survey_session_types::{
    ApiError, CredentialProvider, LocationUpdater, Selections, ShareEncoder, Survey, SurveyApi,
};
use tracing::Instrument;

use crate::{
    Event, LoadError, LoadRequest, Loaded, Phase, QrShareEncoder, ResponseRecord, SessionConfig,
    SessionState, SubmitOutcome, TransitionError, loader, submit,
};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// The collaborators and settings a session is driven through.
#[derive(Clone)]
pub struct SessionContext {
    pub api: Arc<dyn SurveyApi>,
    pub location: Arc<dyn LocationUpdater>,
    pub credentials: Option<Arc<dyn CredentialProvider>>,
    pub encoder: Arc<dyn ShareEncoder>,
    pub config: SessionConfig,
}

impl SessionContext {
    /// Create a context with the default QR encoder, no credentials and default settings.
    pub fn new(api: Arc<dyn SurveyApi>, location: Arc<dyn LocationUpdater>) -> Self {
        Self {
            api,
            location,
            credentials: None,
            encoder: Arc::new(QrShareEncoder::new()),
            config: SessionConfig::default(),
        }
    }

    /// Set the credential provider used in preview mode.
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set the share image encoder.
    pub fn with_encoder(mut self, encoder: Arc<dyn ShareEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("credentials", &self.credentials.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// One respondent's attempt at a survey, from load to recorded response.
///
/// A session is created per attempt and discarded on navigation. All of its
/// state lives in the instance, so operations still running on a discarded
/// session can never write into a newer one.
pub struct Session {
    id: u64,
    request: LoadRequest,
    context: SessionContext,
    state: Mutex<SessionState>,
    load_started: AtomicBool,
    posting: AtomicBool,
    span: tracing::Span,
}

impl Session {
    /// Create a session in the `Loading` phase. Call `load` to resolve the survey.
    pub fn new(context: SessionContext, request: LoadRequest) -> Self {
        let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
        let span = tracing::info_span!(
            "session",
            id,
            mode = request.mode(),
            preview = context.config.preview
        );
        Self {
            id,
            request,
            context,
            state: Mutex::new(SessionState::new()),
            load_started: AtomicBool::new(false),
            posting: AtomicBool::new(false),
            span,
        }
    }

    /// Load the survey and enter `Ready`, or `Error` on failure.
    ///
    /// Runs once per session; later calls return `LoadError::AlreadyStarted`
    /// without touching the state.
    pub async fn load(&self) -> Result<(), LoadError> {
        if self.load_started.swap(true, Ordering::AcqRel) {
            return Err(LoadError::AlreadyStarted);
        }

        let result = loader::load(
            self.context.api.as_ref(),
            self.context.credentials.as_deref(),
            &self.request,
            self.context.config.preview,
        )
        .instrument(self.span.clone())
        .await;

        let _entered = self.span.enter();
        match result {
            Ok(loaded) => {
                tracing::info!(
                    survey_id = %loaded.survey().id(),
                    questions = loaded.survey().len(),
                    resumed = matches!(loaded, Loaded::Resumed { .. }),
                    "survey loaded"
                );
                let (survey, selections, resumed_from) = loaded.into_parts();
                self.advance(Event::Loaded {
                    survey,
                    selections,
                    resumed_from,
                });
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, request = %self.request, "failed to load survey");
                self.advance(Event::LoadFailed {
                    message: err.message(),
                });
                Err(err)
            }
        }
    }

    /// Set (or clear) the selection of question `index`.
    ///
    /// Refused with `TransitionError::SubmitInFlight` while a submit is posting,
    /// so the recorded response always matches the session's selections.
    pub fn select(&self, index: usize, selection: Option<usize>) -> Result<(), TransitionError> {
        self.apply(Event::Selected { index, selection }).map(drop)
    }

    /// Validate and post the response. See `SubmitOutcome`.
    pub async fn submit(&self) -> SubmitOutcome {
        submit::submit(self).instrument(self.span.clone()).await
    }

    /// Leave the recorded view and edit the recorded selections again.
    pub fn view_response(&self) -> Result<(), TransitionError> {
        self.apply(Event::ViewResponse).map(drop)
    }

    /// Hide the last post error.
    pub fn dismiss_post_error(&self) -> Result<(), TransitionError> {
        self.apply(Event::DismissPostError).map(drop)
    }

    /// Apply `event` to the session state and return the new phase.
    pub fn apply(&self, event: Event) -> Result<Phase, TransitionError> {
        let event_name = event.name();
        let mut state = self.state();
        // Checked under the state lock: a submit snapshots under the same lock
        // after raising the flag.
        if matches!(event, Event::Selected { .. }) && self.is_posting() {
            tracing::debug!(parent: &self.span, "edit refused while submitting");
            return Err(TransitionError::SubmitInFlight);
        }
        let phase = state.apply(event)?.clone();
        tracing::debug!(parent: &self.span, event = event_name, %phase, "transition");
        Ok(phase)
    }

    /// Apply an event produced by the session itself. Rejections are bugs; log them.
    pub(crate) fn advance(&self, event: Event) {
        if let Err(err) = self.apply(event) {
            tracing::error!(parent: &self.span, %err, "session rejected its own event");
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn request(&self) -> &LoadRequest {
        &self.request
    }

    pub fn is_preview(&self) -> bool {
        self.context.config.preview
    }

    /// Whether a submit is currently in flight.
    pub fn is_posting(&self) -> bool {
        self.posting.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> Phase {
        self.state().phase().clone()
    }

    /// A copy of the whole session state, for rendering.
    pub fn snapshot(&self) -> SessionState {
        self.state().clone()
    }

    pub fn survey(&self) -> Option<Arc<Survey>> {
        self.state().survey().cloned()
    }

    pub fn selections(&self) -> Selections {
        self.state().selections().clone()
    }

    pub fn is_validated(&self) -> bool {
        self.state().is_validated()
    }

    /// Whether question `index` should be flagged as unanswered.
    pub fn is_flagged(&self, index: usize) -> bool {
        self.state().is_flagged(index)
    }

    pub fn post_error(&self) -> Option<ApiError> {
        self.state().post_error().cloned()
    }

    pub fn record(&self) -> Option<ResponseRecord> {
        self.state().record().cloned()
    }

    pub(crate) fn context(&self) -> &SessionContext {
        &self.context
    }

    pub(crate) fn posting_flag(&self) -> &AtomicBool {
        &self.posting
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("request", &self.request)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}
