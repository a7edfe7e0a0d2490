//! Data models for host assignment.
//!
//! Wire names match the event type form payload (camelCase fields, upper-case enums).

mod form;
mod host;
mod member;

pub use form::*;
pub use host::*;
pub use member::*;
