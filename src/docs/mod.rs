// Documentation module.
// Assembles and caches the content the documentation site renders.

pub mod assembler;
pub mod service;
pub mod types;

pub use assembler::{Assembly, DEFAULT_PACKAGE_PATH, DocsAssembler};
pub use service::{CacheKey, CacheTtls, DocsService};
pub use types::*;
