//! Courier - minimal HTTP/1.1 server
//!
//! Hand-written request parsing and response serialization over raw TCP,
//! with echo, user-agent and flat file-store endpoints.

pub mod config;
pub mod files;
pub mod http;
pub mod server;
