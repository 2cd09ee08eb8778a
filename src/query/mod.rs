// Submodules for separation of concerns
mod compile;
mod eval;
mod types;

// Public API re-exports
pub use compile::parse_query_json;
pub use types::{Predicate, Query};
