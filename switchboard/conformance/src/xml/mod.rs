//! XML payloads served by two clients behind one transport.

mod client;
mod fake;
mod models;

pub use client::*;
pub use fake::{XmlModelWithAttributesValueServer, XmlServer, XmlSimpleModelValueServer};
pub use models::{ModelWithAttributes, SimpleModel};
