//! Shared utilities.
//!
//! Output tree hashing and test helpers.

pub mod hash;

#[cfg(test)]
pub mod testutil;
