//! Core types for NS1 account activity reports.
//!
//! This crate provides the foundational types shared by the client and the CLI:
//!
//! - **Types**: [`ActivityRecord`], [`TimeWindow`], [`ExportFormat`] and friends
//! - **Errors**: Error handling with [`Ns1Error`]
//!
//! # Example
//!
//! ```rust,ignore
//! use nsone_core::{Result, TimeUnit, TimeWindow};
//!
//! fn last_day() -> Result<TimeWindow> {
//!     let window = TimeWindow::ending_now(TimeUnit::Days, 1)?;
//!     println!("{} .. {}", window.start_timestamp(), window.end_timestamp());
//!     Ok(window)
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/nsone-core/0.1.0")]

mod error;
pub mod types;

pub use error::{Ns1Error, Result};
pub use types::*;
