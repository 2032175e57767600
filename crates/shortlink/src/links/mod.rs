//! Short link types.
//!
//! The operations themselves are methods on
//! [`ShortlinkClient`](crate::ShortlinkClient).

mod types;

pub use types::{DEFAULT_PAGE_LIMIT, DashboardSummary, NewShortUrl, ShortUrl, UrlPage, UrlQuery};
