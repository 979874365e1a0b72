use serde::{Deserialize, Serialize};

use crate::{Question, Survey};

/// Error type for selection store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Question index {index} is out of bounds for a survey of {len} questions")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Recorded selections have {actual} slots but the survey has {expected} questions")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Option {option} does not exist for question {index}, which has {options} options")]
    OptionOutOfRange {
        index: usize,
        option: usize,
        options: usize,
    },
}

/// Check that `option` is one of the options of `question` (at `index`).
pub fn check_option(
    question: &Question,
    index: usize,
    option: usize,
) -> Result<(), SelectionError> {
    match question.option(option) {
        Some(_) => Ok(()),
        None => Err(SelectionError::OptionOutOfRange {
            index,
            option,
            options: question.options().len(),
        }),
    }
}

/// The per-question answer store of a session.
///
/// One slot per question, index-aligned with `Survey::questions`. A slot is
/// `None` until the respondent picks an option. The length is fixed at
/// construction; `set` never grows or shrinks the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selections {
    slots: Vec<Option<usize>>,
}

impl Selections {
    /// Create a store with `len` unanswered slots.
    pub fn unanswered(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Seed a store from previously recorded selections.
    ///
    /// The recorded slots must match the survey's question count, and every
    /// answered slot must name one of its question's options.
    pub fn resume(recorded: Selections, survey: &Survey) -> Result<Self, SelectionError> {
        if recorded.len() != survey.len() {
            return Err(SelectionError::LengthMismatch {
                expected: survey.len(),
                actual: recorded.len(),
            });
        }
        for (question, (index, selection)) in survey.questions().iter().zip(recorded.iter()) {
            if let Some(option) = selection {
                check_option(question, index, option)?;
            }
        }
        Ok(recorded)
    }

    /// Get the selection at `index`. Out-of-range indices read as unanswered.
    pub fn get(&self, index: usize) -> Option<usize> {
        self.slots.get(index).copied().flatten()
    }

    /// Set (or clear, with `None`) the selection at `index`.
    pub fn set(&mut self, index: usize, value: Option<usize>) -> Result<(), SelectionError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SelectionError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Get the slots as a slice.
    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.slots
    }

    /// Get an iterator over `(index, selection)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<usize>)> + '_ {
        self.slots.iter().copied().enumerate()
    }

    /// Get the number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the store has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl From<Vec<Option<usize>>> for Selections {
    fn from(slots: Vec<Option<usize>>) -> Self {
        Self { slots }
    }
}

impl<'a> IntoIterator for &'a Selections {
    type Item = &'a Option<usize>;
    type IntoIter = std::slice::Iter<'a, Option<usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lunch() -> Survey {
        Survey::new(
            "S1",
            "Lunch",
            vec![
                Question::new("Soup?", ["Yes", "No"]),
                Question::new("Bread?", ["White", "Rye", "None"]),
            ],
        )
    }

    #[test]
    fn starts_unanswered() {
        let selections = Selections::unanswered(3);
        assert_eq!(selections.as_slice(), &[None, None, None]);
    }

    #[test]
    fn set_only_touches_its_slot() {
        let mut selections = Selections::unanswered(3);
        selections.set(1, Some(4)).unwrap();

        assert_eq!(selections.as_slice(), &[None, Some(4), None]);
        assert_eq!(selections.len(), 3);

        selections.set(1, None).unwrap();
        assert_eq!(selections.get(1), None);
    }

    #[test]
    fn set_out_of_bounds_is_rejected() {
        let mut selections = Selections::unanswered(2);
        let result = selections.set(2, Some(0));

        assert_eq!(
            result,
            Err(SelectionError::IndexOutOfBounds { index: 2, len: 2 })
        );
        assert_eq!(selections.len(), 2);
    }

    #[test]
    fn resume_rejects_length_mismatch() {
        let recorded = Selections::from(vec![Some(1), Some(0), None]);
        let result = Selections::resume(recorded, &lunch());

        assert_eq!(
            result,
            Err(SelectionError::LengthMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn resume_rejects_unknown_options() {
        let recorded = Selections::from(vec![Some(7), Some(0)]);
        let result = Selections::resume(recorded, &lunch());

        assert_eq!(
            result,
            Err(SelectionError::OptionOutOfRange {
                index: 0,
                option: 7,
                options: 2
            })
        );
    }

    #[test]
    fn resume_keeps_valid_and_unanswered_slots() {
        let recorded = Selections::from(vec![None, Some(2)]);
        let resumed = Selections::resume(recorded, &lunch()).unwrap();
        assert_eq!(resumed.as_slice(), &[None, Some(2)]);
    }

    #[test]
    fn last_option_is_in_range() {
        let survey = lunch();
        let bread = survey.question(1).unwrap();
        assert_eq!(check_option(bread, 1, 2), Ok(()));
        assert!(check_option(bread, 1, 3).is_err());
    }

    #[test]
    fn serializes_as_nullable_array() {
        let selections = Selections::from(vec![Some(1), None, Some(0)]);
        let json = serde_json::to_string(&selections).unwrap();
        assert_eq!(json, "[1,null,0]");
    }
}
