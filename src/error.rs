//! Error types for configuration loading and highlighting

use thiserror::Error;

/// Errors surfaced by the highlight entry points
///
/// `Clone` so that one failed construction can be reported to every caller
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighlightError {
    /// A non-generic profile resolved, but its configuration could not be built
    #[error("language configuration unavailable for {profile}: {reason}")]
    ConfigurationUnavailable { profile: String, reason: String },
}

impl HighlightError {
    pub fn unavailable(profile: impl Into<String>, reason: impl Into<String>) -> Self {
        HighlightError::ConfigurationUnavailable {
            profile: profile.into(),
            reason: reason.into(),
        }
    }
}
