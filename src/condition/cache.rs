//! Parsed-condition cache with fast hashing
//!
//! Surveys repeat the same condition text across prompts and sessions, so
//! each distinct string is parsed once and shared.

use crate::condition::parser::Condition;
use crate::condition::response::Responses;
use crate::error::Result;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

/// Global condition cache keyed by the raw condition text
static CONDITION_CACHE: Lazy<RwLock<AHashMap<String, Arc<Condition>>>> = Lazy::new(|| {
    let map = AHashMap::with_capacity(256);
    RwLock::new(map)
});

/// Get or parse a condition string, using cache for repeated conditions
#[inline]
pub fn get_or_parse(condition: &str) -> Result<Arc<Condition>> {
    // Fast path: check read lock first
    {
        let cache = CONDITION_CACHE.read();
        if let Some(parsed) = cache.get(condition) {
            return Ok(Arc::clone(parsed));
        }
    }

    // Slow path: parse and cache. Parse failures are not cached.
    let parsed = Arc::new(Condition::parse(condition)?);

    {
        let mut cache = CONDITION_CACHE.write();
        cache
            .entry(condition.to_string())
            .or_insert_with(|| Arc::clone(&parsed));
    }

    Ok(parsed)
}

/// Check a condition string against the responses, using the cached tree
///
/// Blank condition text means the prompt is always displayed.
#[inline]
pub fn check_condition(condition: &str, responses: &Responses) -> Result<bool> {
    if condition.trim().is_empty() {
        return Ok(true);
    }

    let parsed = get_or_parse(condition)?;
    parsed.evaluate(responses)
}

/// Clear the condition cache (useful for testing)
pub fn clear_cache() {
    let mut cache = CONDITION_CACHE.write();
    cache.clear();
}

/// Get cache statistics
pub fn cache_size() -> usize {
    let cache = CONDITION_CACHE.read();
    cache.len()
}
