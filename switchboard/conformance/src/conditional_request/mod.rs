//! Conditional request headers: ETags and HTTP dates.

mod client;
mod fake;

pub use client::*;
pub use fake::ConditionalRequestServer;
