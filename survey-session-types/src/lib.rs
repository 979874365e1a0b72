//! Core types for the survey-session crate.
//!
//! This crate provides the foundational types for taking a survey:
//! - `Survey`, `SurveyStatus` and `Question` - The loaded survey definition
//! - `Selections` - The per-question answer store
//! - `Validation` - Completeness verdict over a `Selections` store
//! - `ResponseSlug`, `RecordedResponse`, `NewResponse` - Response identity and wire payloads
//! - `SurveyApi`, `CredentialProvider`, `LocationUpdater`, `ShareEncoder`,
//!   `QuestionRenderer` - The collaborators a session is driven through

mod survey;
pub use survey::{Survey, SurveyId, SurveyStatus};

mod question;
pub use question::Question;

mod selections;
pub use selections::{SelectionError, Selections, check_option};

mod validation;
pub use validation::{Validation, validate};

mod response;
pub use response::{NewResponse, PostedResponse, RecordedResponse, ResponseSlug};

mod error;
pub use error::{ApiError, CollaboratorError};

mod traits;
pub use traits::{
    Credential, CredentialProvider, LocationUpdater, QuestionRenderer, ShareEncoder, ShareImage,
    SurveyApi,
};
