//! HashiCorp Vault adapter.
//!
//! Reads policies and whitelists, and implements the secret store used for confirmations.

#![forbid(unsafe_code)]

mod client;
mod paths;
mod store;

pub use client::{VaultAuth, VaultClient};
pub use paths::{VaultPaths, default_role};
