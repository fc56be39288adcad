//! Response caching keyed by a digest of the user's prompt text.

pub mod key;
pub mod store;

pub use key::CacheKey;
pub use store::ResponseCache;
