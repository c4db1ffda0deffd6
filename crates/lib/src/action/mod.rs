//! Action execution.
//!
//! An action is a composed command run as an external process: one
//! invocation per call, with no retries and no timeouts. Callers that want
//! either wrap [`run_command`] themselves.

mod exec;

pub use exec::*;
