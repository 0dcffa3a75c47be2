//! Request deduplication for asset fetches.

use std::collections::HashMap;
use std::sync::{
    Mutex,
    PoisonError,
};

use futures::FutureExt;
use futures::future::{
    BoxFuture,
    Shared,
};

use crate::error::LoadError;
use crate::types::{
    Asset,
    Translation,
};

/// A fetch that can be awaited by any number of callers.
pub type SharedLoad = Shared<BoxFuture<'static, Result<Translation, LoadError>>>;

/// Memoizes asset fetches by `(language, asset)`.
///
/// The entry is stored before the fetch is first awaited, so callers racing
/// for the same pair share one in-flight future instead of triggering
/// duplicate loads. Entries live for the lifetime of the owning
/// [`SpeakContext`](crate::state::SpeakContext): no eviction, no TTL. A failed
/// fetch stays cached and is handed out again, never retried. Acceptable
/// because asset/language combinations are a small, bounded set.
#[derive(Default)]
pub struct MemoCache {
    entries: Mutex<HashMap<String, SharedLoad>>,
}

impl std::fmt::Debug for MemoCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache").field("entries", &self.len()).finish()
    }
}

impl MemoCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized fetch for `(language, asset)`, creating it with
    /// `fetch` on first use.
    ///
    /// The lock is held only across the map lookup, never across an await.
    pub fn get_or_insert(
        &self,
        language: &str,
        asset: &Asset,
        fetch: impl FnOnce() -> BoxFuture<'static, Result<Translation, LoadError>>,
    ) -> SharedLoad {
        let key = canonical_key(language, asset);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.entry(key).or_insert_with(|| fetch().shared()).clone()
    }

    /// Number of distinct `(language, asset)` pairs seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no fetch has been memoized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Canonical JSON encoding of the argument pair.
///
/// `Translation` is an ordered map, so two equal inline assets always encode
/// to the same key.
fn canonical_key(language: &str, asset: &Asset) -> String {
    serde_json::to_string(&(language, asset))
        .unwrap_or_else(|_| format!("{language}\u{1f}{asset}"))
}
