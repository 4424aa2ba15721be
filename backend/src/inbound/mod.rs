//! Inbound adapters translating external requests into domain service calls.
//!
//! The REST API under [`http`] is the only transport; framework details stay
//! at this edge.

pub mod http;
