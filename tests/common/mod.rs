//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hue::syntax::{
    CompiledQueries, ConfigurationLoader, LanguageConfiguration, LanguageProfile, LanguageStore,
    NestedRegion, QueryEvent, StyledText, Token,
};
use hue::HighlightError;

/// Query engine stand-in returning fixed events
#[derive(Debug, Clone, Default)]
pub struct StubQueries(pub Vec<QueryEvent>);

impl CompiledQueries for StubQueries {
    fn execute(&self, _source: &str) -> Vec<QueryEvent> {
        self.0.clone()
    }
}

/// Loader that counts constructions, optionally sleeping and failing
#[derive(Debug, Default)]
pub struct CountingLoader {
    constructions: AtomicUsize,
    failures_remaining: AtomicUsize,
    delay: Duration,
    events: Vec<QueryEvent>,
}

impl CountingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every construction
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail the next `count` constructions
    pub fn failing(self, count: usize) -> Self {
        self.failures_remaining.store(count, Ordering::SeqCst);
        self
    }

    /// Events returned by every constructed configuration
    pub fn with_events(mut self, events: Vec<QueryEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }
}

impl ConfigurationLoader for CountingLoader {
    fn construct(
        &self,
        profile: &'static LanguageProfile,
    ) -> Result<LanguageConfiguration, HighlightError> {
        self.constructions.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let fail = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Err(HighlightError::unavailable(
                profile.name(),
                "simulated failure",
            ));
        }

        Ok(LanguageConfiguration::new(
            profile,
            Box::new(StubQueries(self.events.clone())),
        ))
    }
}

/// A store over `loader`, keeping a handle to inspect the loader
pub fn store_with(loader: CountingLoader) -> (LanguageStore, Arc<CountingLoader>) {
    let loader = Arc::new(loader);
    (LanguageStore::new(loader.clone()), loader)
}

pub fn token(name: &str, range: Range<usize>, depth: u32) -> QueryEvent {
    QueryEvent::Token(Token::new(name, range).with_depth(depth))
}

pub fn region(range: Range<usize>, hint: &str) -> QueryEvent {
    QueryEvent::Nested(NestedRegion::new(range, hint))
}

/// (text, capture) pairs of every styled range
pub fn styled_slices(text: &StyledText) -> Vec<(&str, &str)> {
    text.ranges
        .iter()
        .map(|styled| (&text.text[styled.range.clone()], styled.capture.as_str()))
        .collect()
}
