//! Driving a loaded session through a terminal frontend.

use anyhow::{Context, Result, bail};
use survey_session::{
    Phase, QuestionRenderer, ResponseRecord, ResponseSlug, Session, SessionState,
    SubmitOutcome, terminal_qr,
};

/// A `QuestionRenderer` that can also talk to the respondent between questions.
pub trait Frontend: QuestionRenderer {
    /// Ask a yes/no question.
    fn confirm(&self, message: &str, default: bool) -> Result<bool, Self::Error>;

    /// Show a message.
    fn notify(&self, message: &str);
}

/// How a terminal session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespondOutcome {
    /// The response is recorded under this slug.
    Recorded(ResponseSlug),

    /// Preview sessions show the questions and stop.
    Previewed,

    /// The respondent gave up after a post failure.
    Abandoned,
}

/// Which questions to present on the next pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    All,
    Flagged,
    None,
}

/// Answer, submit and view a loaded session until it is recorded or given up.
pub async fn respond<F: Frontend>(session: &Session, frontend: &F) -> Result<RespondOutcome> {
    let mut pass = Pass::All;

    loop {
        match session.phase() {
            Phase::Loading => bail!("Survey is not loaded yet"),
            Phase::Error { message } => bail!("Failed to load survey: {message}"),
            Phase::Ready => {
                ask(session, frontend, pass)?;

                if session.is_preview() {
                    frontend.notify("Preview only: responses are not submitted.");
                    return Ok(RespondOutcome::Previewed);
                }

                pass = match session.submit().await {
                    SubmitOutcome::Recorded { .. } => Pass::None,
                    SubmitOutcome::Invalid { missing } => {
                        frontend.notify(&format!(
                            "Please answer the highlighted questions ({} unanswered).",
                            missing.len()
                        ));
                        Pass::Flagged
                    }
                    SubmitOutcome::PostError(err) => {
                        frontend.notify(&format!("Failed to post response: {err}"));
                        let retry = frontend
                            .confirm("Try again?", true)
                            .map_err(Into::<anyhow::Error>::into)?;
                        if !retry {
                            return Ok(RespondOutcome::Abandoned);
                        }
                        session.dismiss_post_error()?;
                        Pass::None
                    }
                    SubmitOutcome::Busy => Pass::None,
                    SubmitOutcome::PreviewOnly => return Ok(RespondOutcome::Previewed),
                    SubmitOutcome::NotReady { phase } => {
                        bail!("Cannot submit while the session is {phase}")
                    }
                };
            }
            Phase::Recorded => {
                let record = session
                    .record()
                    .context("Recorded session has no response record")?;
                frontend.notify(&recorded_message(&record));

                let view = frontend
                    .confirm("View my response?", false)
                    .map_err(Into::<anyhow::Error>::into)?;
                if !view {
                    return Ok(RespondOutcome::Recorded(record.slug));
                }
                session.view_response()?;
                pass = Pass::All;
            }
        }
    }
}

/// Present the questions selected by `pass` and store the answers.
fn ask<F: Frontend>(session: &Session, frontend: &F, pass: Pass) -> Result<()> {
    if pass == Pass::None {
        return Ok(());
    }

    // Flags are taken before asking; each edit clears the validated flag.
    let state: SessionState = session.snapshot();
    let survey = state
        .survey()
        .context("Ready session has no survey")?
        .clone();

    if !session.is_preview() && pass == Pass::All {
        frontend.notify(survey.title());
    }

    for (index, question) in survey.questions().iter().enumerate() {
        let flagged = state.is_flagged(index);
        if pass == Pass::Flagged && !flagged {
            continue;
        }

        let current = state.selections().get(index);
        let selection = frontend
            .render(index, question, current, flagged)
            .map_err(Into::<anyhow::Error>::into)?;
        session.select(index, selection)?;
    }

    Ok(())
}

/// Confirmation text for a recorded response, with a QR code when it fits.
pub fn recorded_message(record: &ResponseRecord) -> String {
    let mut message = format!(
        "Your response is recorded!\nResponse id: {}\nResume it at: {}",
        record.slug, record.share_url
    );

    match terminal_qr(&record.share_url) {
        Ok(qr) => {
            message.push('\n');
            message.push_str(&qr);
        }
        Err(err) => tracing::warn!(%err, "failed to render QR code"),
    }

    message
}
