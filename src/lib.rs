//! Host assignment for team event types.
//!
//! Reconciles the hosts of an event type with its scheduling strategy:
//! collective (fixed hosts), round robin (fixed plus rotating hosts with
//! priorities) or managed (delegation to children event types).

pub mod config;
pub mod delegation;
pub mod directory;
pub mod engine;
pub mod errors;
pub mod form;
pub mod i18n;
pub mod models;
pub mod priority;
pub mod reconciler;
pub mod replay;
pub mod router;

pub use engine::{AssignmentEngine, Intent};
pub use errors::AppError;
pub use form::{FormStore, InMemoryForm};
