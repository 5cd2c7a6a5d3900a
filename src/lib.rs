// Library module for clinic-client
// The binary and the integration tests both build on it

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod ui;

pub use api::{ApiClient, RequestOptions};
pub use error::{ClientError, Result};
