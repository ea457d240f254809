//! Cache backend trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Cache serialization error: {0}")]
    Serialization(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value service backing the redirect cache.
///
/// Implementations report failures honestly; the fail-open policy lives in
/// [`crate::infrastructure::cache::RedirectCache`], which also bounds every
/// call with a timeout.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, expiring after `ttl`.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Resets the expiry of an existing key. Returns false if the key is absent.
    async fn expire(&self, key: &str, ttl: Duration) -> CacheResult<bool>;

    /// Removes `key`. Returns false if it did not exist.
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Removes every key matching a glob `pattern`. Returns the number removed.
    async fn delete_matching(&self, pattern: &str) -> CacheResult<usize>;

    /// Lists keys matching a glob `pattern`.
    async fn scan_keys(&self, pattern: &str) -> CacheResult<Vec<String>>;

    /// Returns the remaining time to live of `key`, or `None` if absent or
    /// without expiry.
    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>>;

    /// Checks if the cache backend is reachable.
    async fn ping(&self) -> CacheResult<()>;
}

/// Matches `key` against a glob pattern with Redis `MATCH` semantics.
///
/// `*` spans any run of characters, `?` matches exactly one, `[...]` is a
/// character class (`^` negates, `a-z` is a range) and `\` escapes the next
/// character. An unterminated class ends at the end of the pattern.
pub fn glob_match(pattern: &str, key: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let k: Vec<char> = key.chars().collect();
    match_from(&p, &k)
}

fn match_from(p: &[char], k: &[char]) -> bool {
    match p {
        [] => k.is_empty(),
        ['*', ..] => {
            let rest = match p.iter().position(|&c| c != '*') {
                Some(i) => &p[i..],
                None => return true,
            };
            (0..=k.len()).any(|i| match_from(rest, &k[i..]))
        }
        ['?', rest @ ..] => !k.is_empty() && match_from(rest, &k[1..]),
        ['[', class @ ..] => match k.split_first() {
            Some((&c, tail)) => {
                let (matched, rest) = match_class(class, c);
                matched && match_from(rest, tail)
            }
            None => false,
        },
        ['\\', escaped, rest @ ..] => k.first() == Some(escaped) && match_from(rest, &k[1..]),
        [literal, rest @ ..] => k.first() == Some(literal) && match_from(rest, &k[1..]),
    }
}

/// Tests `c` against the class body after `[`. Returns the outcome and the
/// pattern following the closing `]`.
fn match_class(class: &[char], c: char) -> (bool, &[char]) {
    let (negate, mut p) = match class {
        ['^', rest @ ..] => (true, rest),
        _ => (false, class),
    };
    let mut matched = false;

    loop {
        match p {
            [] => break,
            [']', rest @ ..] => {
                p = rest;
                break;
            }
            ['\\', escaped, rest @ ..] => {
                matched |= *escaped == c;
                p = rest;
            }
            [lo, '-', hi, rest @ ..] => {
                let (lo, hi) = if lo <= hi { (*lo, *hi) } else { (*hi, *lo) };
                matched |= (lo..=hi).contains(&c);
                p = rest;
            }
            [literal, rest @ ..] => {
                matched |= *literal == c;
                p = rest;
            }
        }
    }

    (matched != negate, p)
}
