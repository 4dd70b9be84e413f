//! Operations whose payload shape depends on the response status.

mod client;
mod fake;
mod models;

pub use client::*;
pub use fake::MultipleResponsesServer;
pub use models::{MyException, MyExceptionOrB, B};
