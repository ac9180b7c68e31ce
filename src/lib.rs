// ABOUTME: Library root for docker-nginx - exposes the controller and its seams for testing.
// ABOUTME: The main binary is in main.rs.

pub mod assets;
pub mod charm;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fetch;
pub mod host;
pub mod output;
pub mod runtime;
pub mod store;
pub mod types;
