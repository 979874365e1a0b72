use std::sync::{Mutex, PoisonError};

use survey_session_types::LocationUpdater;
use url::Url;

/// A `LocationUpdater` that keeps the address in memory.
///
/// Used by frontends without a browser location (terminal, tests). Replacing
/// the address resolves it against the current one, like `history.replaceState`.
#[derive(Debug)]
pub struct MemoryLocation {
    current: Mutex<Url>,
}

impl MemoryLocation {
    /// Start at `initial`.
    pub fn new(initial: Url) -> Self {
        Self {
            current: Mutex::new(initial),
        }
    }

    /// Parse `initial` and start there.
    pub fn parse(initial: &str) -> Result<Self, url::ParseError> {
        Url::parse(initial).map(Self::new)
    }

    /// The current address.
    pub fn current(&self) -> Url {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LocationUpdater for MemoryLocation {
    fn replace(&self, address: &str) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match current.join(address) {
            Ok(next) => *current = next,
            Err(err) => tracing::warn!(%address, %err, "ignoring unparsable address"),
        }
    }

    fn href(&self) -> String {
        self.current().to_string()
    }
}
