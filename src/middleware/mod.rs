//! Request-scoped middleware shared across HTTP routes.

pub mod trace;

pub use trace::{Trace, TraceId};
