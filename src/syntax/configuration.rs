//! Language configurations: a profile plus its compiled queries

use std::fmt;

use super::engine::CompiledQueries;
use super::profile::LanguageProfile;

/// Profile plus compiled highlight queries, ready to execute
///
/// Built once per document type by the store and shared read-only.
pub struct LanguageConfiguration {
    profile: &'static LanguageProfile,
    queries: Box<dyn CompiledQueries>,
}

impl LanguageConfiguration {
    pub fn new(profile: &'static LanguageProfile, queries: Box<dyn CompiledQueries>) -> Self {
        Self { profile, queries }
    }

    pub fn profile(&self) -> &'static LanguageProfile {
        self.profile
    }

    pub fn queries(&self) -> &dyn CompiledQueries {
        self.queries.as_ref()
    }
}

impl fmt::Debug for LanguageConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageConfiguration")
            .field("profile", &self.profile.name())
            .finish_non_exhaustive()
    }
}
