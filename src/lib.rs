//! Server-side post-receive hook that triggers CI builds for accepted pushes.
//!
//! The hook runs once per push, decides whether CI should run at all, gathers
//! commit metadata from the pushed revision, and notifies each configured CI
//! backend independently. A misconfigured or unreachable backend never fails
//! the push and never suppresses the other backends; the pusher sees one
//! outcome line per backend on their terminal.

pub mod backends;
pub mod config;
pub mod error;
pub mod git;
pub mod metadata;
pub mod options;
pub mod pipeline;
pub mod report;

pub use error::{HookError, Result};
