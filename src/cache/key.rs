//! Cache keys.

use std::fmt;

use md5::{Digest, Md5};

/// Hex MD5 digest of the user's input text.
///
/// Only the user text goes into the key; the system message does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_text(text: &str) -> Self {
        let mut hasher = Md5::new();
        hasher.update(text.as_bytes());
        let key = Self(format!("{:x}", hasher.finalize()));
        tracing::info!(key = %key, "generated prompt hash");
        key
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
