//! Response Cache — flat directory of raw provider responses.
//!
//! Each entry is `<dir>/<key>.json` holding the verbatim provider document.
//! Entries are never expired. Every I/O failure degrades to "no cache":
//! reads return `None`, writes report `false`, and both log the cause.

use std::path::PathBuf;

use serde_json::Value;

use super::key::CacheKey;

/// Disk-backed key → JSON document store.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    /// Create a cache rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the entry for `key`.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Look up the document stored under `key`.
    ///
    /// Missing, unreadable, corrupt, and empty (`null`, `{}`, `[]`) entries
    /// are all reported as a miss.
    pub fn read(&self, key: &CacheKey) -> Option<Value> {
        let path = self.path_for(key);
        if !path.exists() {
            tracing::info!(key = %key, "cache miss");
            return None;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "failed to read response from cache"
                );
                return None;
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(doc) if is_empty_document(&doc) => {
                tracing::info!(key = %key, "cache entry is empty, treating as miss");
                None
            }
            Ok(doc) => {
                tracing::info!(key = %key, "cache hit");
                Some(doc)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "failed to parse cached response, treating as miss"
                );
                None
            }
        }
    }

    /// Store `document` under `key`, replacing any existing entry.
    ///
    /// Returns whether the entry was persisted. Failures are logged and
    /// otherwise ignored.
    pub fn write(&self, key: &CacheKey, document: &Value) -> bool {
        let path = self.path_for(key);

        let content = match serde_json::to_string(document) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response for cache");
                return false;
            }
        };

        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            tracing::error!(
                error = %e,
                dir = %self.dir.display(),
                "failed to create cache directory"
            );
            return false;
        }

        // Write to temp file, then rename so readers never see a partial entry
        let tmp_path = path.with_extension("json.tmp");
        if let Err(e) = std::fs::write(&tmp_path, &content) {
            tracing::error!(error = %e, "failed to write response to cache");
            return false;
        }
        if let Err(e) = std::fs::rename(&tmp_path, &path) {
            tracing::error!(error = %e, "failed to move cache entry into place");
            let _ = std::fs::remove_file(&tmp_path);
            return false;
        }

        tracing::info!(path = %path.display(), "response cached");
        true
    }
}

fn is_empty_document(doc: &Value) -> bool {
    match doc {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let tmp = TempDir::new().unwrap();
        let cache = ResponseCache::new(tmp.path());
        let key = CacheKey::for_text("What is 2+2?");
        let doc = json!({"id": "chatcmpl-1", "choices": [{"message": {"content": "4"}}]});

        assert!(cache.write(&key, &doc));
        assert_eq!(cache.read(&key), Some(doc));
    }

    #[test]
    fn test_read_unwritten_key_is_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = ResponseCache::new(tmp.path());
        assert_eq!(cache.read(&CacheKey::for_text("never asked")), None);
    }

    #[test]
    fn test_read_missing_directory_is_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = ResponseCache::new(tmp.path().join("does/not/exist"));
        assert_eq!(cache.read(&CacheKey::for_text("x")), None);
    }

    #[test]
    fn test_corrupt_entry_is_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = ResponseCache::new(tmp.path());
        let key = CacheKey::for_text("corrupt");
        std::fs::write(cache.path_for(&key), "{\"choices\": [").unwrap();

        assert_eq!(cache.read(&key), None);
    }

    #[test]
    fn test_empty_document_is_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = ResponseCache::new(tmp.path());
        let key = CacheKey::for_text("empty");

        assert!(cache.write(&key, &json!({})));
        assert_eq!(cache.read(&key), None);
    }

    #[test]
    fn test_write_creates_nested_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("utilities").join("cache");
        let cache = ResponseCache::new(&dir);
        let key = CacheKey::for_text("nested");

        assert!(cache.write(&key, &json!([{"generated_text": "ok"}])));
        assert!(dir.join(format!("{key}.json")).exists());
        assert!(!dir.join(format!("{key}.json.tmp")).exists());
    }

    #[test]
    fn test_write_overwrites_silently() {
        let tmp = TempDir::new().unwrap();
        let cache = ResponseCache::new(tmp.path());
        let key = CacheKey::for_text("same");

        assert!(cache.write(&key, &json!({"v": 1})));
        assert!(cache.write(&key, &json!({"v": 2})));
        assert_eq!(cache.read(&key), Some(json!({"v": 2})));
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let tmp = TempDir::new().unwrap();
        // A regular file where the cache directory should be.
        let blocker = tmp.path().join("cache");
        std::fs::write(&blocker, "not a directory").unwrap();
        let cache = ResponseCache::new(&blocker);
        let key = CacheKey::for_text("blocked");

        assert!(!cache.write(&key, &json!({"v": 1})));
        assert_eq!(cache.read(&key), None);
    }

    #[test]
    fn test_path_depends_only_on_key() {
        let cache = ResponseCache::new("utilities/cache");
        let key = CacheKey::for_text("What is 2+2?");
        assert_eq!(
            cache.path_for(&key),
            PathBuf::from("utilities/cache").join(format!("{}.json", key.as_str()))
        );
    }
}
