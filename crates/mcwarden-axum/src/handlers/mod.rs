//! HTTP request handlers for the Axum web server.
//!
//! Handlers are thin wrappers: check the passcode, delegate to
//! `ServerManager`, shape the response.

pub mod access;
pub mod auth;
pub mod events;
pub mod server;
pub mod status;
