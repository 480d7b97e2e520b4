//! File storage behind the `/files` endpoint
//!
//! This module maps request paths onto a flat directory of files and turns
//! every filesystem outcome into a response.

pub mod store;

pub use store::FileStore;
