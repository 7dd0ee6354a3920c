// LearnHub shared type definitions
// Each submodule defines types used across the client.

pub mod analysis;
pub mod bookmark;
pub mod errors;
pub mod session;
pub mod settings;
