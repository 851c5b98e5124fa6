//! HTTP client for the NS1 API.
//!
//! This crate provides [`Ns1Client`] for pulling account activity reports,
//! either as structured records or as a server-rendered export file.

#![doc(html_root_url = "https://docs.rs/nsone-client/0.1.0")]

mod client;
pub mod api;

pub use client::{Ns1Client, Ns1ClientBuilder, DEFAULT_BASE_URL};
pub use nsone_core::{Ns1Error, Result};
