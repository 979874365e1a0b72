//! The session lifecycle as a pure transition function.
//!
//! `SessionState::apply` is the only place session data changes. It performs no
//! I/O; the loader and the submission coordinator run the asynchronous steps and
//! feed their results back in as `Event`s.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use survey_session_types::{
    ApiError, ResponseSlug, SelectionError, Selections, ShareImage, Survey, check_option,
};

/// Lifecycle phase of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Initial phase, until the loader reports back.
    Loading,

    /// Loading failed. Terminal for the session instance.
    Error { message: String },

    /// The survey is on screen and selections can be edited and submitted.
    Ready,

    /// A response was recorded. The respondent can go back to view/edit it.
    Recorded,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::Error { .. } => "Error",
            Self::Ready => "Ready",
            Self::Recorded => "Recorded",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something that happened to a session.
#[derive(Debug, Clone)]
pub enum Event {
    /// The survey (and, when resuming, the prior response) was fetched.
    Loaded {
        survey: Arc<Survey>,
        selections: Selections,
        resumed_from: Option<ResponseSlug>,
    },

    /// Fetching the survey or the prior response failed.
    LoadFailed { message: String },

    /// The respondent picked (or cleared) the option for a question.
    Selected {
        index: usize,
        selection: Option<usize>,
    },

    /// A submit attempt started; the previous post error is dropped.
    SubmitStarted,

    /// Validation ran as part of a submit attempt.
    Validated { missing: BTreeSet<usize> },

    /// The response post failed.
    PostFailed(ApiError),

    /// The response was recorded and the address now references it.
    Recorded {
        slug: ResponseSlug,
        share_url: String,
        share_image: Option<ShareImage>,
    },

    /// The respondent chose to view/edit the recorded response.
    ViewResponse,

    /// The respondent dismissed the post error message.
    DismissPostError,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loaded { .. } => "Loaded",
            Self::LoadFailed { .. } => "LoadFailed",
            Self::Selected { .. } => "Selected",
            Self::SubmitStarted => "SubmitStarted",
            Self::Validated { .. } => "Validated",
            Self::PostFailed(_) => "PostFailed",
            Self::Recorded { .. } => "Recorded",
            Self::ViewResponse => "ViewResponse",
            Self::DismissPostError => "DismissPostError",
        }
    }
}

/// Error type for rejected transitions.
///
/// A rejected transition leaves the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Event {event} is not accepted in phase {phase}")]
    NotAccepted {
        phase: &'static str,
        event: &'static str,
    },

    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Selections are locked while their submit is posting.
    #[error("Selections cannot change while the response is being submitted")]
    SubmitInFlight,
}

/// The recorded response, as shown after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    pub slug: ResponseSlug,

    /// Full address that resumes this response.
    pub share_url: String,

    /// Best-effort encoding of `share_url`, e.g. a QR code.
    pub share_image: Option<ShareImage>,
}

/// Everything a session knows, independent of any rendering layer.
#[derive(Debug, Clone)]
pub struct SessionState {
    phase: Phase,
    survey: Option<Arc<Survey>>,
    selections: Selections,
    validated: bool,
    missing: BTreeSet<usize>,
    post_error: Option<ApiError>,
    resumed_from: Option<ResponseSlug>,
    record: Option<ResponseRecord>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// A fresh state in the `Loading` phase.
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            survey: None,
            selections: Selections::default(),
            validated: false,
            missing: BTreeSet::new(),
            post_error: None,
            resumed_from: None,
            record: None,
        }
    }

    /// Apply an event, returning the new phase.
    pub fn apply(&mut self, event: Event) -> Result<&Phase, TransitionError> {
        let not_accepted = TransitionError::NotAccepted {
            phase: self.phase.name(),
            event: event.name(),
        };

        let loading = matches!(self.phase, Phase::Loading);
        let ready = self.phase.is_ready();
        let recorded = matches!(self.phase, Phase::Recorded);

        match event {
            Event::Loaded {
                survey,
                selections,
                resumed_from,
            } if loading => {
                self.selections = Selections::resume(selections, &survey)?;
                self.survey = Some(survey);
                self.resumed_from = resumed_from;
                self.phase = Phase::Ready;
            }
            Event::LoadFailed { message } if loading => {
                self.phase = Phase::Error { message };
            }
            Event::Selected { index, selection } if ready => {
                let question = self.survey.as_ref().and_then(|survey| survey.question(index));
                if let (Some(question), Some(option)) = (question, selection) {
                    check_option(question, index, option)?;
                }
                self.selections.set(index, selection)?;
                self.validated = false;
                self.missing.clear();
            }
            Event::SubmitStarted if ready => {
                self.post_error = None;
            }
            Event::Validated { missing } if ready => {
                self.validated = true;
                self.missing = missing;
            }
            Event::PostFailed(error) if ready => {
                self.post_error = Some(error);
            }
            Event::DismissPostError if ready => {
                self.post_error = None;
            }
            Event::Recorded {
                slug,
                share_url,
                share_image,
            } if ready => {
                self.post_error = None;
                self.record = Some(ResponseRecord {
                    slug,
                    share_url,
                    share_image,
                });
                self.phase = Phase::Recorded;
            }
            Event::ViewResponse if recorded => {
                self.phase = Phase::Ready;
            }
            _ => return Err(not_accepted),
        }

        Ok(&self.phase)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The loaded survey. `None` while loading or after a load error.
    pub fn survey(&self) -> Option<&Arc<Survey>> {
        self.survey.as_ref()
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    /// Whether a submit attempt has validated the current selections.
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// Questions the last validation found unanswered. Cleared by any edit.
    pub fn missing(&self) -> &BTreeSet<usize> {
        &self.missing
    }

    /// Whether question `index` should be flagged as unanswered.
    pub fn is_flagged(&self, index: usize) -> bool {
        self.missing.contains(&index)
    }

    /// Error of the last failed post, until dismissed or retried.
    pub fn post_error(&self) -> Option<&ApiError> {
        self.post_error.as_ref()
    }

    /// Slug the session was resumed from, if any.
    pub fn resumed_from(&self) -> Option<&ResponseSlug> {
        self.resumed_from.as_ref()
    }

    /// The most recently recorded response of this session.
    pub fn record(&self) -> Option<&ResponseRecord> {
        self.record.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use survey_session_types::Question;

    use super::*;

    fn two_question_survey() -> Arc<Survey> {
        Arc::new(Survey::new(
            "S1",
            "Lunch",
            vec![
                Question::new("Soup?", ["Yes", "No"]),
                Question::new("Bread?", ["White", "Rye", "None"]),
            ],
        ))
    }

    fn ready_state() -> SessionState {
        let mut state = SessionState::new();
        state
            .apply(Event::Loaded {
                survey: two_question_survey(),
                selections: Selections::unanswered(2),
                resumed_from: None,
            })
            .unwrap();
        state
    }

    fn recorded(slug: &str) -> Event {
        Event::Recorded {
            slug: ResponseSlug::new(slug),
            share_url: format!("https://example.test/survey/response?slug={slug}"),
            share_image: None,
        }
    }

    #[test]
    fn starts_loading_without_a_store() {
        let state = SessionState::new();
        assert_eq!(state.phase(), &Phase::Loading);
        assert!(state.survey().is_none());
        assert!(state.selections().is_empty());
    }

    #[test]
    fn load_success_enters_ready() {
        let state = ready_state();
        assert_eq!(state.phase(), &Phase::Ready);
        assert_eq!(state.selections().as_slice(), &[None, None]);
    }

    #[test]
    fn load_failure_is_terminal() {
        let mut state = SessionState::new();
        state
            .apply(Event::LoadFailed {
                message: "Survey not found".into(),
            })
            .unwrap();

        assert_eq!(
            state.phase(),
            &Phase::Error {
                message: "Survey not found".into()
            }
        );

        for event in [
            Event::Selected {
                index: 0,
                selection: Some(0),
            },
            Event::SubmitStarted,
            Event::ViewResponse,
        ] {
            assert!(matches!(
                state.apply(event),
                Err(TransitionError::NotAccepted { phase: "Error", .. })
            ));
        }
    }

    #[test]
    fn loading_rejects_selection_edits() {
        let mut state = SessionState::new();
        let result = state.apply(Event::Selected {
            index: 0,
            selection: Some(1),
        });

        assert_eq!(
            result.unwrap_err(),
            TransitionError::NotAccepted {
                phase: "Loading",
                event: "Selected"
            }
        );
        assert!(state.selections().is_empty());
    }

    #[test]
    fn loaded_selections_must_match_question_count() {
        let mut state = SessionState::new();
        let result = state.apply(Event::Loaded {
            survey: two_question_survey(),
            selections: Selections::unanswered(3),
            resumed_from: None,
        });

        assert!(matches!(
            result,
            Err(TransitionError::Selection(SelectionError::LengthMismatch { .. }))
        ));
        assert_eq!(state.phase(), &Phase::Loading);
    }

    #[test]
    fn validation_flags_missing_until_next_edit() {
        let mut state = ready_state();
        state
            .apply(Event::Selected {
                index: 0,
                selection: Some(1),
            })
            .unwrap();
        state
            .apply(Event::Validated {
                missing: BTreeSet::from([1]),
            })
            .unwrap();

        assert!(state.is_validated());
        assert_eq!(state.missing(), &BTreeSet::from([1]));
        assert!(!state.is_flagged(0));
        assert!(state.is_flagged(1));

        state
            .apply(Event::Selected {
                index: 0,
                selection: Some(0),
            })
            .unwrap();
        assert!(!state.is_validated());
        assert!(state.missing().is_empty());
        assert!(!state.is_flagged(1));
    }

    #[test]
    fn unknown_option_is_rejected_without_change() {
        let mut state = ready_state();
        let result = state.apply(Event::Selected {
            index: 1,
            selection: Some(3),
        });

        assert_eq!(
            result.unwrap_err(),
            TransitionError::Selection(SelectionError::OptionOutOfRange {
                index: 1,
                option: 3,
                options: 3
            })
        );
        assert_eq!(state.selections().as_slice(), &[None, None]);
    }

    #[test]
    fn loaded_selections_must_name_existing_options() {
        let mut state = SessionState::new();
        let result = state.apply(Event::Loaded {
            survey: two_question_survey(),
            selections: Selections::from(vec![Some(7), Some(0)]),
            resumed_from: Some(ResponseSlug::new("R9")),
        });

        assert!(matches!(
            result,
            Err(TransitionError::Selection(SelectionError::OptionOutOfRange { option: 7, .. }))
        ));
        assert_eq!(state.phase(), &Phase::Loading);
        assert!(state.survey().is_none());
    }

    #[test]
    fn post_failure_keeps_selections() {
        let mut state = ready_state();
        state
            .apply(Event::Selected {
                index: 1,
                selection: Some(2),
            })
            .unwrap();
        state
            .apply(Event::PostFailed(ApiError::new("Service unavailable")))
            .unwrap();

        assert_eq!(state.phase(), &Phase::Ready);
        assert_eq!(state.selections().as_slice(), &[None, Some(2)]);
        assert_eq!(
            state.post_error().map(|e| e.message.as_str()),
            Some("Service unavailable")
        );

        state.apply(Event::SubmitStarted).unwrap();
        assert!(state.post_error().is_none());
    }

    #[test]
    fn recorded_returns_to_ready_on_view() {
        let mut state = ready_state();
        state.apply(recorded("R9")).unwrap();

        assert_eq!(state.phase(), &Phase::Recorded);
        assert_eq!(state.record().unwrap().slug.as_str(), "R9");

        let edit = state.apply(Event::Selected {
            index: 0,
            selection: Some(0),
        });
        assert!(edit.is_err());

        state.apply(Event::ViewResponse).unwrap();
        assert_eq!(state.phase(), &Phase::Ready);
        assert_eq!(state.record().unwrap().slug.as_str(), "R9");
    }

    #[test]
    fn out_of_bounds_selection_is_rejected_without_change() {
        let mut state = ready_state();
        let result = state.apply(Event::Selected {
            index: 5,
            selection: Some(0),
        });

        assert!(matches!(
            result,
            Err(TransitionError::Selection(SelectionError::IndexOutOfBounds {
                index: 5,
                len: 2
            }))
        ));
        assert_eq!(state.selections().len(), 2);
    }
}
