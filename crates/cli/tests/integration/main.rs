//! End-to-end runs of the anglebuild binary against fake tools.

#![cfg(unix)]

mod build_tests;
mod common;
