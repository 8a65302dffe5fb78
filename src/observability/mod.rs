//! Observability subsystem.
//!
//! Structured logging goes through `tracing` at the call sites; this module
//! carries the metrics surface. The subscriber and the exporter are both
//! initialized by the binary, never by the library.

pub mod metrics;
