//! Requestty implementation of the terminal frontend.

use survey_session::{Question, QuestionRenderer};
use thiserror::Error;

use crate::respond::Frontend;

/// Label of the extra choice that leaves a question unanswered.
pub const SKIP_CHOICE: &str = "(leave unanswered)";

/// Failures of a terminal prompt.
#[derive(Debug, Error)]
pub enum RequesttyError {
    /// The respondent interrupted a prompt. Nothing further is submitted.
    #[error("Response abandoned at the prompt")]
    Cancelled,

    /// The terminal could not be driven (I/O, not a tty).
    #[error("Terminal prompt failed: {0}")]
    Terminal(String),

    /// The prompt answered with a different kind than it was asked for.
    #[error("Prompt answered with {got} where {expected} was asked")]
    UnexpectedAnswer { expected: &'static str, got: String },
}

impl From<requestty::ErrorKind> for RequesttyError {
    fn from(err: requestty::ErrorKind) -> Self {
        if matches!(err, requestty::ErrorKind::Interrupted) {
            Self::Cancelled
        } else {
            Self::Terminal(err.to_string())
        }
    }
}

/// Requestty frontend for interactive CLI prompts.
///
/// Each question becomes a select prompt over its options, followed by a
/// choice that leaves it unanswered.
#[derive(Debug, Default, Clone)]
pub struct RequesttyRenderer;

impl RequesttyRenderer {
    /// Create a new Requestty renderer.
    pub const fn new() -> Self {
        Self
    }
}

/// Prompt text for question `index`, marked when it was left unanswered.
fn prompt_message(index: usize, question: &Question, flagged: bool) -> String {
    let number = index + 1;
    if flagged {
        format!("{number}. {} (required, please answer)", question.title())
    } else {
        format!("{number}. {}", question.title())
    }
}

/// Choice labels: the options, then `SKIP_CHOICE`.
fn choices(question: &Question) -> Vec<String> {
    question
        .options()
        .iter()
        .cloned()
        .chain(std::iter::once(SKIP_CHOICE.to_string()))
        .collect()
}

/// The choice highlighted when the prompt opens: the current selection, or the
/// skip choice when there is none or it names no option.
fn default_choice(question: &Question, selection: Option<usize>) -> usize {
    selection
        .filter(|&option| question.option(option).is_some())
        .unwrap_or(question.options().len())
}

/// Map a picked choice back to a selection. The trailing skip choice clears it.
fn selection_for(question: &Question, picked: usize) -> Option<usize> {
    (picked < question.options().len()).then_some(picked)
}

impl QuestionRenderer for RequesttyRenderer {
    type Error = RequesttyError;

    fn render(
        &self,
        index: usize,
        question: &Question,
        selection: Option<usize>,
        flagged: bool,
    ) -> Result<Option<usize>, Self::Error> {
        let q = requestty::Question::select(format!("question_{index}"))
            .message(prompt_message(index, question, flagged))
            .choices(choices(question))
            .default(default_choice(question, selection));

        let result = requestty::prompt_one(q.build())?;

        match result {
            requestty::Answer::ListItem(item) => Ok(selection_for(question, item.index)),
            other => Err(RequesttyError::UnexpectedAnswer {
                expected: "a list item",
                got: format!("{other:?}"),
            }),
        }
    }
}

impl Frontend for RequesttyRenderer {
    fn confirm(&self, message: &str, default: bool) -> Result<bool, Self::Error> {
        let q = requestty::Question::confirm("confirm")
            .message(message)
            .default(default)
            .build();

        match requestty::prompt_one(q)? {
            requestty::Answer::Bool(b) => Ok(b),
            other => Err(RequesttyError::UnexpectedAnswer {
                expected: "yes or no",
                got: format!("{other:?}"),
            }),
        }
    }

    fn notify(&self, message: &str) {
        println!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::new("Favourite colour?", ["Red", "Green"])
    }

    #[test]
    fn choices_end_with_skip() {
        assert_eq!(choices(&question()), ["Red", "Green", SKIP_CHOICE]);
    }

    #[test]
    fn skip_choice_clears_selection() {
        let question = question();
        assert_eq!(selection_for(&question, 1), Some(1));
        assert_eq!(selection_for(&question, 2), None);
    }

    #[test]
    fn default_choice_follows_current_selection() {
        let question = question();
        assert_eq!(default_choice(&question, Some(1)), 1);
        assert_eq!(default_choice(&question, None), 2);
    }

    #[test]
    fn unknown_selection_defaults_to_skip() {
        let question = question();
        let default = default_choice(&question, Some(7));

        assert_eq!(default, 2);
        assert_eq!(choices(&question)[default], SKIP_CHOICE);
    }

    #[test]
    fn flagged_questions_are_marked() {
        let question = question();
        assert_eq!(prompt_message(0, &question, false), "1. Favourite colour?");
        assert_eq!(
            prompt_message(2, &question, true),
            "3. Favourite colour? (required, please answer)"
        );
    }

    #[test]
    fn interrupted_prompt_is_cancellation() {
        let err = RequesttyError::from(requestty::ErrorKind::Interrupted);
        assert!(matches!(err, RequesttyError::Cancelled));
        assert_eq!(err.to_string(), "Response abandoned at the prompt");
    }

    #[test]
    fn unexpected_answer_display() {
        let err = RequesttyError::UnexpectedAnswer {
            expected: "a list item",
            got: "Bool(true)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Prompt answered with Bool(true) where a list item was asked"
        );
    }
}
