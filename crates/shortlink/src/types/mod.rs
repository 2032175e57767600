//! Validated value types.
//!
//! These types check their invariants at construction time so that
//! malformed values never reach the backend.

mod alias;
mod backend_url;
mod long_url;

pub use alias::{Alias, MAX_ALIAS_LEN};
pub use backend_url::BackendUrl;
pub use long_url::LongUrl;
