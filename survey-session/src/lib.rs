//! # survey-session
//!
//! The respondent-side lifecycle of taking a survey: load it (fresh, or by
//! resuming a recorded response), track selections, validate, submit exactly
//! once, and move into a view/edit mode for the recorded response.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use survey_session::{
//!     HttpConfig, HttpSurveyApi, LoadRequest, MemoryLocation, Session, SessionContext,
//!     SubmitOutcome,
//! };
//!
//! let api = Arc::new(HttpSurveyApi::new(HttpConfig::new(api_url))?);
//! let location = Arc::new(MemoryLocation::parse("https://surveys.example.com/survey/S1")?);
//! let session = Session::new(SessionContext::new(api, location), LoadRequest::by_id("S1"));
//!
//! session.load().await?;
//! session.select(0, Some(1))?;
//! match session.submit().await {
//!     SubmitOutcome::Recorded { slug } => println!("Recorded as {slug}"),
//!     SubmitOutcome::Invalid { missing } => println!("Please answer {missing:?}"),
//!     other => println!("{other:?}"),
//! }
//! ```
//!
//! ## Lifecycle
//!
//! `Loading → Ready | Error`, `Ready → Ready` (edits, failed validation, post
//! errors), `Ready → Recorded` (successful submit), `Recorded → Ready` (view/edit
//! the recorded response). `Error` is terminal for the session.
//!
//! ## Collaborators
//!
//! Sessions are driven through the traits in `survey-session-types`:
//! - `SurveyApi` - `HttpSurveyApi`, or `TestApi` in tests
//! - `LocationUpdater` - `MemoryLocation`
//! - `ShareEncoder` - `QrShareEncoder`
//! - `CredentialProvider` - `StaticCredentials`, only used in preview mode

// Re-export all types from survey-session-types
pub use survey_session_types::*;

mod config;
pub use config::{DEFAULT_RESPONSE_PATH, DEFAULT_SLUG_PARAM, SessionConfig};

mod credentials;
pub use credentials::StaticCredentials;

mod http;
pub use http::{HttpConfig, HttpSurveyApi};

mod loader;
pub use loader::{LoadError, LoadRequest, Loaded, load};

mod location;
pub use location::MemoryLocation;

mod session;
pub use session::{Session, SessionContext};

mod share;
pub use share::{QrShareEncoder, data_url, terminal_qr};

mod state;
pub use state::{Event, Phase, ResponseRecord, SessionState, TransitionError};

mod submit;
pub use submit::SubmitOutcome;

// Test backend for driving sessions without a server
mod test_backend;
pub use test_backend::{Calls, TestApi};
