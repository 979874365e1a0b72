//! The submission coordinator.
//!
//! Order within one submit: validate, post, replace the address, encode the
//! share image, transition to `Recorded`. At most one submit per session is in
//! flight; a second one is refused rather than queued.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

use survey_session_types::{ApiError, NewResponse, ResponseSlug, validate};

use crate::{Event, Session};

/// What became of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The response was recorded under `slug`; the session is `Recorded`.
    Recorded { slug: ResponseSlug },

    /// Some questions are unanswered. Nothing was posted.
    Invalid { missing: BTreeSet<usize> },

    /// The post failed. Selections are kept; submitting again retries.
    PostError(ApiError),

    /// Another submit of this session is still in flight.
    Busy,

    /// Preview sessions never submit.
    PreviewOnly,

    /// The session is not in the `Ready` phase.
    NotReady { phase: &'static str },
}

impl SubmitOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded { .. })
    }
}

/// Marks a submit as in flight until dropped.
struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub(crate) async fn submit(session: &Session) -> SubmitOutcome {
    if session.is_preview() {
        return SubmitOutcome::PreviewOnly;
    }

    let Some(_in_flight) = InFlight::acquire(session.posting_flag()) else {
        tracing::debug!("submit already in flight");
        return SubmitOutcome::Busy;
    };

    let snapshot = session.snapshot();
    let survey = match snapshot.survey() {
        Some(survey) if snapshot.phase().is_ready() => survey,
        _ => {
            return SubmitOutcome::NotReady {
                phase: snapshot.phase().name(),
            };
        }
    };

    session.advance(Event::SubmitStarted);
    let verdict = validate(snapshot.selections());
    session.advance(Event::Validated {
        missing: verdict.missing().clone(),
    });
    if !verdict.is_complete() {
        tracing::info!(missing = ?verdict.missing(), "submit blocked by unanswered questions");
        return SubmitOutcome::Invalid {
            missing: verdict.into_missing(),
        };
    }

    let response = NewResponse {
        survey_id: survey.id().clone(),
        selections: snapshot.selections().clone(),
    };
    let context = session.context();

    let slug = match context.api.post_response(&response).await {
        Ok(posted) => posted.slug,
        Err(err) => {
            tracing::warn!(%err, "failed to post response");
            session.advance(Event::PostFailed(err.clone()));
            return SubmitOutcome::PostError(err);
        }
    };

    context
        .location
        .replace(&context.config.response_address(&slug));
    let share_url = context.location.href();

    let share_image = match context.encoder.encode(&share_url).await {
        Ok(image) => Some(image),
        Err(err) => {
            tracing::warn!(%err, %share_url, "failed to encode share image");
            None
        }
    };

    session.advance(Event::Recorded {
        slug: slug.clone(),
        share_url,
        share_image,
    });
    tracing::info!(%slug, "response recorded");

    SubmitOutcome::Recorded { slug }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_is_exclusive_until_dropped() {
        let flag = AtomicBool::new(false);

        let first = InFlight::acquire(&flag);
        assert!(first.is_some());
        assert!(InFlight::acquire(&flag).is_none());

        drop(first);
        assert!(InFlight::acquire(&flag).is_some());
    }
}
