//! HTTP transport for the shortener backend.
//!
//! Every request goes through [`Transport`], which attaches the stored
//! credential and handles the single refresh-and-replay on 401.

mod client;
pub mod endpoints;
mod refresh;
mod request;

pub use client::{Transport, TransportBuilder};
pub use request::{Method, RequestDescriptor};
