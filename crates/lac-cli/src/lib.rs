//! Library side of the `lac-validator` binary.
//!
//! Kept separate from `main.rs` so ingress and rendering can be tested
//! without spawning the binary.

pub mod ingest;
pub mod logging;
pub mod render;
