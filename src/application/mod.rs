//! Application layer: services and command handlers composing the domain with
//! the ports.

pub mod classifier;
pub mod handlers;
