//! Datetime payloads encoded as RFC 3339 JSON strings.

mod client;
mod fake;

pub use client::*;
pub use fake::DatetimeServer;
