//! API endpoint modules.

mod activity;

pub use activity::{ActivityApi, ActivityRequestBuilder};
