//! LearnHub: client-side state synchronization for a personal bookmark
//! curation service.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod gateway;
pub mod managers;
pub mod platform;
pub mod services;
pub mod telemetry;
pub mod types;
