//! Use case orchestration for passgate.
//!
//! The application layer ties the policy, the check engine, the renderers and the
//! confirmation protocol together. Stores and notifiers are handed in as trait objects;
//! the CLI picks the concrete adapters.

#![forbid(unsafe_code)]

mod clean;
mod gate;

pub use clean::{ScriptCleaner, UnknownPlatform, cleaner_for};
pub use gate::{Decision, GateInput, GateOutcome, decision_exit_code, run_gate};
