//! Docpilot - Conversational Document Assistant
//!
//! A retrieval-augmented chat backend: each user message is classified for
//! intent, optionally grounded in context retrieved from a vector index,
//! graded for relevance, and answered through a strategy-specific generation
//! call. Conversations are durable, append-only logs.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
