// Cache module for in-process caching.
// Holds the latest documentation bundle, statistics and versions between GitHub refreshes.

pub mod clock;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use store::{CacheSlot, CachedData, DEFAULT_TTL, SlotState};
