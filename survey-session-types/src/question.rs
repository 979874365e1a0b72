use serde::{Deserialize, Serialize};

/// A single question in a survey.
///
/// The session only cares that a question has a set of selectable options;
/// a selection is the index of the chosen option. Rendering is left to a
/// `QuestionRenderer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// The prompt text shown to the respondent.
    #[serde(rename = "questionTitle")]
    title: String,

    /// The options to choose from, in display order.
    options: Vec<String>,
}

impl Question {
    /// Create a new question.
    pub fn new<I, S>(title: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the prompt text.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the selectable options.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Get the option label for a selection, if the selection is in range.
    pub fn option(&self, selection: usize) -> Option<&str> {
        self.options.get(selection).map(String::as_str)
    }
}
