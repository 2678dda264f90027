//! anglebuild-lib: fetch, build and package a pinned ANGLE revision
//!
//! The pipeline is a fixed sequence of external tool invocations:
//! - `fetch`: bootstrap depot_tools and sync the ANGLE checkout to the pinned revision
//! - `build`: generate ninja files with `gn` and compile the EGL/GLES libraries
//! - `package`: copy the allow-listed headers and built libraries into `angle.out`
//!
//! Every external tool runs through a [`execute::CommandRunner`], so the sequencing
//! can be driven by [`execute::RecordingRunner`] without touching the network.

pub mod build;
pub mod config;
pub mod consts;
pub mod execute;
pub mod fetch;
pub mod layout;
pub mod package;
pub mod pipeline;
pub mod platform;
pub mod util;
