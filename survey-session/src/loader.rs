//! Resolving the survey a session works on.

use std::fmt;
use std::sync::Arc;

use survey_session_types::{
    ApiError, CollaboratorError, CredentialProvider, ResponseSlug, SelectionError, Selections,
    Survey, SurveyApi, SurveyId,
};

/// How a session finds its survey. Fixed when the session is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    /// Take the survey identified by id, starting with no selections.
    ById(SurveyId),

    /// Resume a recorded response: its survey, seeded with its selections.
    BySlug(ResponseSlug),
}

impl LoadRequest {
    pub fn by_id(survey_id: impl Into<SurveyId>) -> Self {
        Self::ById(survey_id.into())
    }

    pub fn by_slug(slug: impl Into<ResponseSlug>) -> Self {
        Self::BySlug(slug.into())
    }

    /// Short name of the entry mode, for logs.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::ById(_) => "by_id",
            Self::BySlug(_) => "by_slug",
        }
    }
}

impl fmt::Display for LoadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ById(id) => write!(f, "survey {id}"),
            Self::BySlug(slug) => write!(f, "response {slug}"),
        }
    }
}

/// A successfully loaded survey, ready to seed a session.
#[derive(Debug, Clone)]
pub enum Loaded {
    Fresh {
        survey: Arc<Survey>,
    },
    Resumed {
        survey: Arc<Survey>,
        slug: ResponseSlug,
        selections: Selections,
    },
}

impl Loaded {
    pub fn survey(&self) -> &Arc<Survey> {
        match self {
            Self::Fresh { survey } | Self::Resumed { survey, .. } => survey,
        }
    }

    /// Split into the survey, its initial selections and the slug resumed from.
    pub fn into_parts(self) -> (Arc<Survey>, Selections, Option<ResponseSlug>) {
        match self {
            Self::Fresh { survey } => {
                let selections = Selections::unanswered(survey.len());
                (survey, selections, None)
            }
            Self::Resumed {
                survey,
                slug,
                selections,
            } => (survey, selections, Some(slug)),
        }
    }
}

/// Error type for loading a survey.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Fetching the recorded response by slug failed.
    #[error("Failed to load response: {0}")]
    Response(ApiError),

    /// Fetching the survey failed.
    #[error("Failed to load survey: {0}")]
    Survey(ApiError),

    /// Privileged load without a credential provider.
    #[error("Preview requires a credential provider")]
    NoCredentialProvider,

    /// The credential provider failed.
    #[error("Failed to obtain credential: {0}")]
    Credential(#[source] CollaboratorError),

    /// The recorded selections do not fit the survey.
    #[error(transparent)]
    Selections(#[from] SelectionError),

    /// `load` was already called on this session.
    #[error("Session is already loading or loaded")]
    AlreadyStarted,
}

impl LoadError {
    /// The message shown to the respondent. Backend messages are passed through.
    pub fn message(&self) -> String {
        match self {
            Self::Response(err) | Self::Survey(err) => err.message.clone(),
            other => other.to_string(),
        }
    }
}

/// Resolve `request` into a survey (and prior selections, when resuming).
///
/// In privileged mode a credential is obtained from `credentials` and attached to
/// the survey fetch; otherwise the fetch is unauthenticated.
pub async fn load(
    api: &dyn SurveyApi,
    credentials: Option<&dyn CredentialProvider>,
    request: &LoadRequest,
    privileged: bool,
) -> Result<Loaded, LoadError> {
    let (survey_id, prior) = match request {
        LoadRequest::ById(survey_id) => (survey_id.clone(), None),
        LoadRequest::BySlug(slug) => {
            let recorded = api
                .fetch_response(slug)
                .await
                .map_err(LoadError::Response)?;
            tracing::debug!(%slug, survey_id = %recorded.survey_id, "fetched recorded response");
            (recorded.survey_id, Some((slug.clone(), recorded.selections)))
        }
    };

    let credential = if privileged {
        let provider = credentials.ok_or(LoadError::NoCredentialProvider)?;
        Some(
            provider
                .obtain_credential()
                .await
                .map_err(LoadError::Credential)?,
        )
    } else {
        None
    };

    let survey = api
        .fetch_survey(&survey_id, credential.as_ref())
        .await
        .map_err(LoadError::Survey)?;
    let survey = Arc::new(survey);

    match prior {
        None => Ok(Loaded::Fresh { survey }),
        Some((slug, recorded)) => {
            let selections = Selections::resume(recorded, &survey)?;
            Ok(Loaded::Resumed {
                survey,
                slug,
                selections,
            })
        }
    }
}
