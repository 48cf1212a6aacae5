//! High-level operations that correspond to CLI commands
//!
//! These modules contain the core logic for each rebrand command, separated
//! from CLI concerns like argument parsing, subprocesses and exit codes.

pub mod run;
pub mod verify;

pub use run::{rebrand_operation, RunReport};
pub use verify::verify_operation;
