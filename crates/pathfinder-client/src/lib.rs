//! pathfinder-client: HTTP access to the Pathfinder back end.
//!
//! Implements the `GuidanceApi` trait over reqwest, plus the configuration
//! that decides where requests go and a mock for tests.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;

pub use config::{load_config, ClientConfig};
pub use error::ApiError;
pub use http::HttpGuidanceClient;
pub use mock::MockGuidanceApi;
