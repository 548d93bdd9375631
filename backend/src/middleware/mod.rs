//! Request middleware for lifecycle concerns such as tracing.

pub mod trace;

pub use trace::{TRACE_ID_HEADER, Trace, TraceId};
