//! API layer
//!
//! HTTP client for the relay-fronted script service.

mod client;

pub use client::*;
