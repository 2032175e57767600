//! Authentication primitives.
//!
//! Credentials are held by a [`TokenStore`] injected into the transport;
//! nothing in the crate keeps a hidden global token.

mod credentials;
mod store;
mod tokens;

pub use credentials::{LoginCredentials, MIN_PASSWORD_LEN, Registration};
pub use store::{ACCESS_TOKEN_KEY, FileTokenStore, MemoryTokenStore, TokenStore};
pub use tokens::{AccessToken, Credential, RefreshToken};
