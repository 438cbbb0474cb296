//! Domain layer: aggregates, value objects, and chat policy.
//!
//! Pure business logic with no I/O. Ports and adapters build on these types.

pub mod chat;
pub mod conversation;
pub mod foundation;
pub mod retrieval;
