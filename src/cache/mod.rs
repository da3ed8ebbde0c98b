//! Hydra attribute cache.
//!
//! Serves document attributes and file-system metadata out of a shared
//! ephemeral key/value cache:
//!
//! - **Attribute cache**: one main entry per document holding short values
//!   inline, plus one entry per long value tied to the reload that wrote it
//! - **Stat cache**: `is_file`/`is_directory` records for content paths
//!
//! Every entry is written with a TTL equal to the staleness window, so a
//! document edited on disk is picked up by the first request after the
//! window has elapsed.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! check_interval_ms = 5000
//! inline_value_limit = 120
//! capacity = 4096
//! ```

mod attributes;
mod clock;
mod config;
mod entry;
mod error;
pub mod keys;
mod request;
mod stat;
mod store;

pub use attributes::AttributeCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    CacheConfig, DEFAULT_CAPACITY, DEFAULT_CHECK_INTERVAL_MS, DEFAULT_INLINE_VALUE_LIMIT,
};
pub use entry::{LongValueEntry, MainEntry, StatRecord};
pub use error::ContentError;
pub use request::{Attribute, AttributeRequest, AttributeSet, Resolution};
pub use stat::StatCache;
pub use store::{CacheClientError, MemoryCache, SharedCache};
