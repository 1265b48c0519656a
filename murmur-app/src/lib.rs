//! Wiring for the `murmur` binary: command-line flags and the per-URL run loop.
pub mod cli;
pub mod run;
