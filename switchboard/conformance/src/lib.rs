//! Switchboard Conformance
//!
//! Generated clients and fake servers for a handful of REST test groups,
//! each built on the `switchboard` runtime.
//!
//! ## Groups
//!
//! - [`datetime`] - RFC 3339 timestamps in JSON bodies
//! - [`multiple_responses`] - Payloads whose shape depends on the status code
//! - [`xml`] - XML bodies served by two clients behind one router
//! - [`conditional_request`] - ETag and HTTP date request headers
//!
//! Every group exposes its operation table as `OPERATIONS`, the client, and
//! a `*Server` fake whose fields are optional responders.

pub mod conditional_request;
pub mod datetime;
pub mod multiple_responses;
pub mod time;
pub mod xml;
