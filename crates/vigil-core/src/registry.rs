//! Banned keyword registry with copy-on-refresh snapshots.
//!
//! The registry is loaded once from the persisted keyword list and is
//! read-only during scoring. Refresh builds a whole new map and swaps
//! the shared reference atomically, so in-flight scoring calls keep a
//! consistent view of the snapshot they started with.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::types::{KeywordScope, Severity};

/// A single banned keyword with its classification metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    /// The match key. Lower-cased at construction; lookups lower-case
    /// the input text, so matching is case-insensitive.
    pub keyword: String,
    /// Violation taxonomy label recorded on a hit.
    pub category: String,
    /// Severity of a hit on this keyword.
    pub severity: Severity,
    /// Which content types this keyword applies to.
    pub scope: KeywordScope,
}

impl KeywordEntry {
    /// Creates a new entry, lower-casing the keyword.
    pub fn new(
        keyword: impl Into<String>,
        category: impl Into<String>,
        severity: Severity,
        scope: KeywordScope,
    ) -> Self {
        Self {
            keyword: keyword.into().to_lowercase(),
            category: category.into(),
            severity,
            scope,
        }
    }
}

/// Immutable snapshot of the banned keyword list.
///
/// Keyed by the lower-cased keyword string; duplicate keywords keep
/// the last entry loaded.
#[derive(Debug, Clone, Default)]
pub struct KeywordRegistry {
    entries: HashMap<String, KeywordEntry>,
}

impl KeywordRegistry {
    /// Creates an empty registry. Scoring against it degrades to
    /// heuristics-only.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a registry from a list of entries.
    pub fn from_entries(entries: impl IntoIterator<Item = KeywordEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| (e.keyword.clone(), e))
            .collect();
        Self { entries }
    }

    /// Number of keywords in the registry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the registry holds no keywords.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries.
    pub fn entries(&self) -> impl Iterator<Item = &KeywordEntry> {
        self.entries.values()
    }

    /// Looks up an entry by its (lower-cased) keyword.
    pub fn get(&self, keyword: &str) -> Option<&KeywordEntry> {
        self.entries.get(keyword)
    }
}

/// Clonable handle to the current registry snapshot.
///
/// Readers take a cheap `Arc` clone of the snapshot; `replace` swaps
/// the reference wholesale. There is no in-place mutation, so a
/// refresh racing with scoring is safe: the scoring call finishes
/// against the snapshot it captured.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<Arc<KeywordRegistry>>>,
}

impl SharedRegistry {
    /// Creates a handle holding an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle holding the given registry.
    pub fn with_registry(registry: KeywordRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<KeywordRegistry> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replaces the snapshot wholesale.
    pub fn replace(&self, registry: KeywordRegistry) {
        let next = Arc::new(registry);
        match self.inner.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}
