//! datakit-cqrs
//!
//! Minimal command/query contracts: a handler receives one request and
//! returns `Ok(payload)` or a typed failure. Dispatch/mediation is the
//! caller's concern, not this crate's.

mod command;
mod query;

pub use command::{Command, CommandHandler};
pub use query::{Query, QueryHandler};
