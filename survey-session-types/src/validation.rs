use std::collections::BTreeSet;

use crate::Selections;

/// Completeness verdict over a `Selections` store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    missing: BTreeSet<usize>,
}

impl Validation {
    /// Check if every question has a selection.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Indices of questions without a selection, ascending.
    pub fn missing(&self) -> &BTreeSet<usize> {
        &self.missing
    }

    /// Check if the question at `index` is missing a selection.
    pub fn is_missing(&self, index: usize) -> bool {
        self.missing.contains(&index)
    }

    pub fn into_missing(self) -> BTreeSet<usize> {
        self.missing
    }
}

/// Validate a selection store.
///
/// Pure: the store is complete iff every slot is answered, and `missing` is
/// exactly the set of unanswered indices.
pub fn validate(selections: &Selections) -> Validation {
    let missing = selections
        .iter()
        .filter(|(_, selection)| selection.is_none())
        .map(|(index, _)| index)
        .collect();
    Validation { missing }
}
