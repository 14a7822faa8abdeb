//! In-memory answer cache
//!
//! This module provides an `AnswerCache` that sits in front of a remote answer
//! source. Questions are keyed by a normalized form (lowercased, trimmed) so
//! that trivially different phrasings share one entry, while the remote source
//! always receives the question exactly as the caller typed it.

mod answer_cache;

pub use answer_cache::{normalize, AnswerCache, AnswerSource, CacheStats, FetchOutcome};
