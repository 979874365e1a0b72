use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Question;

/// Identifier of a survey, as issued by the survey-authoring backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyId(String);

impl SurveyId {
    /// Create a new survey identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurveyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurveyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SurveyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Publication status of a survey.
///
/// Owned by the survey-authoring domain. Only published surveys can be fetched
/// without a credential; the backend enforces that, not this crate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurveyStatus {
    #[default]
    Draft,
    Published,
    Unpublished,
}

impl SurveyStatus {
    /// Check if respondents can take the survey.
    pub fn is_published(self) -> bool {
        self == Self::Published
    }
}

/// A survey as loaded into a session.
///
/// Immutable once loaded: sessions share it read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    #[serde(alias = "_id")]
    id: SurveyId,

    #[serde(rename = "surveyTitle")]
    title: String,

    #[serde(default)]
    status: SurveyStatus,

    questions: Vec<Question>,
}

impl Survey {
    /// Create a new survey with the given questions.
    pub fn new(id: impl Into<SurveyId>, title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: SurveyStatus::Draft,
            questions,
        }
    }

    /// Set the publication status.
    pub fn with_status(mut self, status: SurveyStatus) -> Self {
        self.status = status;
        self
    }

    pub fn id(&self) -> &SurveyId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> SurveyStatus {
        self.status
    }

    /// Get the questions, in index order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Get the question at `index`, if any.
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Check if the survey has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }
}
