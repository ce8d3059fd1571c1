//! Language configuration store
//!
//! Process-lifetime cache of [`LanguageConfiguration`]s keyed by document
//! type. Construction of an entry happens at most once at a time: concurrent
//! requests for the same key join the in-flight construction and observe the
//! same outcome.
//!
//! ```text
//! request(doc_type) → resolve profile → generic? → None
//!                   → slot Ready    → clone Arc
//!                   → slot Loading  → wait on watch channel
//!                   → no slot       → insert Loading, spawn construction
//!                                     → spawn_blocking(loader.construct)
//!                                     → Ready on success / remove on failure
//!                                     → publish outcome to every waiter
//!                   → task dropped  → guard removes the slot, waiters retry
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use async_trait::async_trait;
use tokio::sync::{watch, Notify, Semaphore};

use super::bundle::{default_search_dirs, QueryBundle};
use super::configuration::LanguageConfiguration;
use super::document_type::DocumentType;
use super::engine::TreeSitterQueries;
use super::pipeline::LanguageProvider;
use super::profile::LanguageProfile;
use crate::error::HighlightError;

/// Builds a configuration for a non-generic profile
///
/// Runs on the blocking pool; may do file I/O and query compilation.
pub trait ConfigurationLoader: Send + Sync {
    fn construct(
        &self,
        profile: &'static LanguageProfile,
    ) -> Result<LanguageConfiguration, HighlightError>;
}

/// Loads query bundles from disk or the grammar crates and compiles them
#[derive(Debug, Clone, Default)]
pub struct BundleLoader {
    search_dirs: Vec<PathBuf>,
}

impl BundleLoader {
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    pub fn with_default_dirs() -> Self {
        Self::new(default_search_dirs())
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }
}

impl ConfigurationLoader for BundleLoader {
    fn construct(
        &self,
        profile: &'static LanguageProfile,
    ) -> Result<LanguageConfiguration, HighlightError> {
        let (Some(grammar), Some(key)) = (profile.grammar(), profile.bundle()) else {
            return Err(HighlightError::unavailable(
                profile.name(),
                "profile has no grammar",
            ));
        };

        let bundle = QueryBundle::locate(key, &self.search_dirs)?;
        let queries = TreeSitterQueries::compile(profile, grammar, &bundle)?;
        Ok(LanguageConfiguration::new(profile, Box::new(queries)))
    }
}

type Outcome = Result<Arc<LanguageConfiguration>, HighlightError>;
type Slots = Arc<Mutex<HashMap<String, Slot>>>;

/// Joins of a construction that vanished before publishing, per request
const MAX_JOIN_ATTEMPTS: usize = 3;

enum Slot {
    Ready(Arc<LanguageConfiguration>),
    Loading(Pending),
}

/// An in-flight construction
struct Pending {
    rx: watch::Receiver<Option<Outcome>>,
    /// Lifts the background throttle once a foreground request joins
    promote: Arc<Notify>,
}

/// Clears the `Loading` slot of a construction task that is dropped before
/// publishing, e.g. when its runtime shuts down
struct LoadingGuard {
    key: String,
    slots: Slots,
    rx: watch::Receiver<Option<Outcome>>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if remove_if_loading(&self.slots, &self.key, &self.rx) {
            tracing::debug!("Construction of {} dropped before publishing", self.key);
        }
    }
}

/// Remove `key` only while it still holds the construction behind `rx`
fn remove_if_loading(slots: &Slots, key: &str, rx: &watch::Receiver<Option<Outcome>>) -> bool {
    let mut slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
    let stale = matches!(
        slots.get(key),
        Some(Slot::Loading(pending)) if pending.rx.same_channel(rx)
    );
    if stale {
        slots.remove(key);
    }
    stale
}

/// Async, single-flight configuration cache
#[derive(Clone)]
pub struct LanguageStore {
    loader: Arc<dyn ConfigurationLoader>,
    slots: Slots,
    background_permits: Arc<Semaphore>,
}

static GLOBAL: OnceLock<LanguageStore> = OnceLock::new();

impl LanguageStore {
    pub fn new(loader: Arc<dyn ConfigurationLoader>) -> Self {
        Self {
            loader,
            slots: Arc::new(Mutex::new(HashMap::new())),
            background_permits: Arc::new(Semaphore::new(1)),
        }
    }

    /// The process-wide store, backed by a [`BundleLoader`] on the default
    /// search directories
    pub fn global() -> &'static LanguageStore {
        GLOBAL.get_or_init(|| LanguageStore::new(Arc::new(BundleLoader::with_default_dirs())))
    }

    /// Load (or join the loading of) the configuration for `doc_type`
    ///
    /// `Ok(None)` means the type resolves to the generic profile.
    pub async fn load_language_configuration(
        &self,
        doc_type: &DocumentType,
    ) -> Result<Option<Arc<LanguageConfiguration>>, HighlightError> {
        self.load(doc_type, false).await
    }

    /// Provider entry point; failures are logged and reported as `None`
    ///
    /// `background` throttles construction behind other background loads
    /// until a foreground request joins it. It never changes the result.
    pub async fn language_configuration(
        &self,
        doc_type: &DocumentType,
        background: bool,
    ) -> Option<Arc<LanguageConfiguration>> {
        match self.load(doc_type, background).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }

    /// Number of ready entries
    pub fn cached_count(&self) -> usize {
        self.lock_slots()
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    async fn load(
        &self,
        doc_type: &DocumentType,
        background: bool,
    ) -> Result<Option<Arc<LanguageConfiguration>>, HighlightError> {
        let profile = LanguageProfile::resolve(doc_type);
        if profile.is_generic() {
            return Ok(None);
        }

        let key = doc_type.identifier().to_lowercase();
        for _ in 0..MAX_JOIN_ATTEMPTS {
            let mut rx = {
                let mut slots = self.lock_slots();
                match slots.get(&key) {
                    Some(Slot::Ready(config)) => return Ok(Some(config.clone())),
                    Some(Slot::Loading(pending)) => {
                        if !background {
                            pending.promote.notify_one();
                        }
                        pending.rx.clone()
                    }
                    None => {
                        let (tx, rx) = watch::channel(None);
                        let promote = Arc::new(Notify::new());
                        slots.insert(
                            key.clone(),
                            Slot::Loading(Pending {
                                rx: rx.clone(),
                                promote: promote.clone(),
                            }),
                        );
                        self.spawn_construction(&key, profile, background, tx, promote);
                        rx
                    }
                }
            };

            let outcome = match rx.wait_for(Option::is_some).await {
                Ok(outcome) => outcome.clone(),
                Err(_) => None,
            };
            if let Some(result) = outcome {
                return result.map(Some);
            }

            // The construction task went away without publishing
            remove_if_loading(&self.slots, &key, &rx);
            tracing::debug!("Retrying construction of {}", key);
        }

        Err(HighlightError::unavailable(
            profile.name(),
            "construction ended without a result",
        ))
    }

    fn spawn_construction(
        &self,
        key: &str,
        profile: &'static LanguageProfile,
        background: bool,
        tx: watch::Sender<Option<Outcome>>,
        promote: Arc<Notify>,
    ) {
        let loader = self.loader.clone();
        let slots = self.slots.clone();
        let permits = self.background_permits.clone();
        let guard = LoadingGuard {
            key: key.to_string(),
            slots: slots.clone(),
            rx: tx.subscribe(),
        };

        tokio::spawn(async move {
            let key = &guard.key;
            let _permit = if background {
                tokio::select! {
                    permit = permits.acquire_owned() => permit.ok(),
                    _ = promote.notified() => {
                        tracing::debug!("Foreground request joined {}, skipping throttle", key);
                        None
                    }
                }
            } else {
                None
            };

            tracing::debug!("Constructing {} configuration for {}", profile.name(), key);
            let outcome: Outcome =
                match tokio::task::spawn_blocking(move || loader.construct(profile)).await {
                    Ok(result) => result.map(Arc::new),
                    Err(e) => Err(HighlightError::unavailable(
                        profile.name(),
                        format!("loader task failed: {}", e),
                    )),
                };

            {
                let mut slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
                match &outcome {
                    Ok(config) => {
                        slots.insert(key.clone(), Slot::Ready(config.clone()));
                    }
                    Err(e) => {
                        tracing::warn!("Configuration for {} unavailable: {}", key, e);
                        slots.remove(key);
                    }
                }
            }

            tx.send_replace(Some(outcome));
        });
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for LanguageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageStore")
            .field("cached", &self.cached_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LanguageProvider for LanguageStore {
    async fn language_configuration(
        &self,
        doc_type: &DocumentType,
    ) -> Option<Arc<LanguageConfiguration>> {
        LanguageStore::language_configuration(self, doc_type, false).await
    }
}
