//! Answer cache keyed by normalized question text
//!
//! Provides an `AnswerCache` that serves repeated questions from memory and
//! falls back to an `AnswerSource` on a miss. Failed fetches are never stored.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::remote::FetchError;

/// Something that can answer a question over the network
#[async_trait]
pub trait AnswerSource: Send + Sync {
    /// Answer payload; the cache stores and clones it without looking inside
    type Answer: Clone + Send + Sync;

    /// Fetches an answer for `question`, sent as-is
    async fn fetch(&self, question: &str) -> Result<Self::Answer, FetchError>;
}

/// Result of an answer lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOutcome<T> {
    /// The answer payload
    pub answer: T,
    /// Whether the answer came from the cache rather than the network
    pub from_cache: bool,
}

/// Snapshot of the cache contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of cached answers
    pub size: usize,
    /// Normalized keys, in insertion order
    pub keys: Vec<String>,
}

/// Canonical cache key for a question: lowercased, surrounding whitespace removed
pub fn normalize(question: &str) -> String {
    question.to_lowercase().trim().to_string()
}

/// Cached answers with their insertion order
struct Entries<T> {
    answers: HashMap<String, T>,
    order: Vec<String>,
}

impl<T> Entries<T> {
    fn new() -> Self {
        Self {
            answers: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Stores an answer; an existing key keeps its position and takes the new value
    fn insert(&mut self, key: String, answer: T) {
        match self.answers.entry(key) {
            Entry::Occupied(mut slot) => {
                slot.insert(answer);
            }
            Entry::Vacant(slot) => {
                self.order.push(slot.key().clone());
                slot.insert(answer);
            }
        }
    }

    fn clear(&mut self) {
        self.answers.clear();
        self.order.clear();
    }
}

/// Caches answers from an `AnswerSource`, keyed by normalized question
///
/// The map lock is held only while checking or storing, never across the
/// remote call. Two concurrent misses for the same key both reach the source
/// and the later store wins.
pub struct AnswerCache<S: AnswerSource> {
    source: S,
    entries: Mutex<Entries<S::Answer>>,
}

impl<S: AnswerSource> AnswerCache<S> {
    /// Creates an empty cache in front of `source`
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: Mutex::new(Entries::new()),
        }
    }

    /// The underlying answer source
    pub fn source(&self) -> &S {
        &self.source
    }

    fn lock(&self) -> MutexGuard<'_, Entries<S::Answer>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self, key: &str) -> Option<S::Answer> {
        self.lock().answers.get(key).cloned()
    }

    /// Returns the answer for `question`, from the cache when possible
    ///
    /// # Returns
    /// * `Ok(FetchOutcome)` - The answer and whether it was served from cache
    /// * `Err(FetchError)` - The source failed; nothing was cached
    pub async fn get_answer(&self, question: &str) -> Result<FetchOutcome<S::Answer>, FetchError> {
        let key = normalize(question);

        if let Some(answer) = self.lookup(&key) {
            debug!(key = %key, "answer cache hit");
            return Ok(FetchOutcome {
                answer,
                from_cache: true,
            });
        }

        debug!(key = %key, "answer cache miss");
        let answer = self.source.fetch(question).await?;

        self.lock().insert(key.clone(), answer.clone());
        debug!(key = %key, "answer cached");

        Ok(FetchOutcome {
            answer,
            from_cache: false,
        })
    }

    /// Removes every cached answer
    pub fn clear_cache(&self) {
        self.lock().clear();
        debug!("answer cache cleared");
    }

    /// Current size and keys of the cache
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        CacheStats {
            size: entries.order.len(),
            keys: entries.order.clone(),
        }
    }
}
