pub mod descriptor_cache;
pub(crate) mod query_trace;

pub use descriptor_cache::{CacheStats, DescriptorCache};

/// Target of the descriptor cache build events.
pub const CACHE_TARGET: &str = "ducktype::cache";
/// Target of the structured per-check query trace.
pub const QUERY_TARGET: &str = "ducktype::query_json";
