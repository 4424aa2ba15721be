//! Request middleware.
//!
//! [`Trace`] gives every request a correlation identifier and a tracing span.

pub mod trace;

pub use trace::Trace;
