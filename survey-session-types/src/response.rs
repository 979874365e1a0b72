use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Selections, SurveyId};

/// Opaque identity of a recorded response, issued by the backend.
///
/// Used to resume, view and edit the same response later. Never derived locally.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSlug(String);

impl ResponseSlug {
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Get the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResponseSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResponseSlug {
    fn from(slug: &str) -> Self {
        Self::new(slug)
    }
}

impl From<String> for ResponseSlug {
    fn from(slug: String) -> Self {
        Self(slug)
    }
}

/// A previously recorded response, as fetched by slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedResponse {
    pub survey_id: SurveyId,
    pub selections: Selections,
}

/// Body of a response post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResponse {
    pub survey_id: SurveyId,
    pub selections: Selections,
}

/// Result of a successful response post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedResponse {
    pub slug: ResponseSlug,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_response_uses_backend_field_names() {
        let body = NewResponse {
            survey_id: SurveyId::new("S1"),
            selections: Selections::from(vec![Some(1), Some(0)]),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "surveyId": "S1", "selections": [1, 0] })
        );
    }

    #[test]
    fn recorded_response_keeps_unanswered_slots() {
        let json = r#"{ "surveyId": "S1", "selections": [null, 2] }"#;
        let recorded: RecordedResponse = serde_json::from_str(json).unwrap();

        assert_eq!(recorded.survey_id, SurveyId::new("S1"));
        assert_eq!(recorded.selections.as_slice(), &[None, Some(2)]);
    }
}
