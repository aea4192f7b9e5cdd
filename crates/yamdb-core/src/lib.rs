//! Shared service plumbing: tracing setup, request ids, health probes,
//! serde helpers and SeaORM query extensions.

pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
