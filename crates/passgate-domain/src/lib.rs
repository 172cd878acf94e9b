//! Pure authorization engine (no IO).
//!
//! Input: constructed checks and an in-memory whitelist.
//! Output: one result per check + the aggregate verdict.

#![forbid(unsafe_code)]

pub mod checks;
pub mod clock;
pub mod whitelist;

mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use checks::Check;
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{Evaluation, compute_verdict, evaluate};
pub use whitelist::{FingerprintError, Whitelist};
