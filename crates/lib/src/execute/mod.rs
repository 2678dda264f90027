//! External command execution.
//!
//! All pipeline stages describe their work as [`Invocation`]s and hand them to
//! a [`CommandRunner`] together with an explicit [`ExecContext`]:
//! - [`SystemRunner`] spawns real processes
//! - [`RecordingRunner`] records calls and returns scripted exit codes

pub mod recording;
pub mod runner;
pub mod types;

pub use recording::{RecordedCall, RecordingRunner};
pub use runner::{CommandRunner, SystemRunner, run_checked};
pub use types::{ExecContext, ExecError, ExitStatus, Invocation};
