//! Event stream HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for the streaming endpoint.
//! The broker, registry and message types live in the `sse` crate.

pub mod handler;
