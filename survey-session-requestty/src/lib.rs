//! Requestty frontend for survey-session.
//!
//! Presents a loaded [`Session`](survey_session::Session) on the command line:
//! one select prompt per question, re-asking only the flagged questions after
//! an incomplete submit, and showing the response id and a QR code once the
//! response is recorded.
//!
//! # Example
//!
//! ```ignore
//! use survey_session::{LoadRequest, Session};
//! use survey_session_requestty::{RequesttyRenderer, respond};
//!
//! let session = Session::new(context, LoadRequest::by_id("S1"));
//! session.load().await?;
//! let outcome = respond(&session, &RequesttyRenderer::new()).await?;
//! ```

pub mod logging;

mod renderer;
mod respond;

pub use renderer::{RequesttyError, RequesttyRenderer, SKIP_CHOICE};
pub use respond::{Frontend, RespondOutcome, recorded_message, respond};
