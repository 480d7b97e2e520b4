//! Server plumbing
//!
//! The listener accepts connections and spawns one task per connection; the
//! router maps each parsed request to the endpoint that answers it.

pub mod listener;
pub mod router;

pub use router::Router;
