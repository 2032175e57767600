//! shortlink - Client library for the shortlink URL-shortening service
//!
//! Every request goes through one [`Transport`] that attaches the stored
//! bearer token, normalizes failures into [`Error`], and recovers once from
//! an expired token by refreshing it and replaying the request.
//! [`ShortlinkClient`] layers the typed backend operations on top.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use shortlink::{BackendUrl, FileTokenStore, LoginCredentials, ShortlinkClient, Transport};
//!
//! # async fn example() -> Result<(), shortlink::Error> {
//! let transport = Transport::builder(BackendUrl::new("http://localhost:3001")?)
//!     .token_store(Arc::new(FileTokenStore::open("/tmp/shortlink/token.json")))
//!     .build()?;
//! let client = ShortlinkClient::with_transport(transport);
//!
//! client.login(LoginCredentials::new("ada", "correct horse")).await?;
//! let summary = client.dashboard().await?;
//! println!("{} links, {} clicks", summary.total_links, summary.total_clicks);
//! # Ok(())
//! # }
//! ```

pub mod auth;
mod client;
pub mod error;
mod format;
pub mod http;
pub mod links;
pub mod pagination;
pub mod types;

// Re-export primary types at crate root for convenience
pub use auth::{
    Credential, FileTokenStore, LoginCredentials, MemoryTokenStore, Registration, TokenStore,
};
pub use client::ShortlinkClient;
pub use error::Error;
pub use format::{INVALID_DATE, format_timestamp};
pub use http::{Method, RequestDescriptor, Transport, TransportBuilder};
pub use links::{DashboardSummary, NewShortUrl, ShortUrl, UrlPage, UrlQuery};
pub use types::{Alias, BackendUrl, LongUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
