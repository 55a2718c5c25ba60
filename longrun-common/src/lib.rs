//! Shared plumbing for the Long Run binaries.
//!
//! Currently this is the [`observability`] module: one place that installs
//! the `tracing` subscriber so every entrypoint logs to the same rolling file.
pub mod observability;
