//! Holes whose value is a [`LiteralValue`] are spliced in as plain text and
//! never become structured arguments.

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::value::LiteralValue;

/// Double every brace so `text` survives as literal template text.
pub fn escape_braces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            other => out.push(other),
        }
    }
    out
}

/// Concurrent insert-if-absent store of escaped literal payloads.
#[derive(Debug, Default)]
pub struct LiteralCache {
    entries: DashMap<String, Arc<str>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl LiteralCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Escaped form of `payload`, built once per distinct payload.
    pub fn intern(&self, payload: &str) -> Arc<str> {
        if let Some(existing) = self.entries.get(payload) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(existing.value());
        }
        let mut inserted = false;
        let escaped = {
            let entry = self
                .entries
                .entry(payload.to_string())
                .or_insert_with(|| {
                    inserted = true;
                    Arc::from(escape_braces(payload))
                });
            Arc::clone(entry.value())
        };
        if inserted {
            self.misses.fetch_add(1, Ordering::Relaxed);
            log::debug!("cached literal payload of {} bytes", payload.len());
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        escaped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }
}

/// Literal text contributed by a literal-valued hole.
#[derive(Clone, Debug, PartialEq)]
pub struct Splice {
    /// Text for the display message.
    pub text: String,
    /// Brace-escaped text for the structured template.
    pub escaped: Arc<str>,
}

/// Resolve a literal-valued hole, going through `cache` only when the
/// literal allows it.
pub fn splice(literal: &LiteralValue, cache: Option<&LiteralCache>) -> Splice {
    let escaped = match cache {
        Some(cache) if literal.is_cacheable() => cache.intern(literal.payload()),
        _ => Arc::from(escape_braces(literal.payload())),
    };
    Splice {
        text: literal.payload().to_string(),
        escaped,
    }
}
