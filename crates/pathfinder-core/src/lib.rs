//! pathfinder-core: Quiz model, progression tracking, and recommendations.
//!
//! This crate defines the data model, the quiz progression tracker, the
//! `GuidanceApi` trait implemented by `pathfinder-client`, and the
//! assessment submission flow built on top of them.

pub mod error;
pub mod model;
pub mod parser;
pub mod recommendations;
pub mod submit;
pub mod tracker;
pub mod traits;
