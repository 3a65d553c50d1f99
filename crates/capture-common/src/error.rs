//! Error types for deferred tasks.
//!
//! Errors are reported through miette so the `capture` binary can render them
//! with codes and help text before exiting with a non-zero status.

use miette::Diagnostic;
use std::any::Any;
use thiserror::Error;

/// Result type for deferred task operations.
pub type Result<T> = std::result::Result<T, TaskError>;

/// Errors that can reach the thread waiting on a deferred task.
#[derive(Debug, Error, Diagnostic)]
pub enum TaskError {
    /// The task body panicked while running.
    #[error("deferred task panicked: {message}")]
    #[diagnostic(code(capture::task::panicked))]
    Panicked { message: String },

    /// The operating system refused to start a worker thread.
    #[error("failed to start worker thread")]
    #[diagnostic(
        code(capture::task::spawn),
        help("the process may have hit its thread limit")
    )]
    Spawn(#[source] std::io::Error),

    /// The result was already moved out of the handle.
    #[error("deferred result was already taken")]
    #[diagnostic(code(capture::task::consumed))]
    Consumed,
}

impl TaskError {
    /// Build a `Panicked` error from the payload returned by `JoinHandle::join`
    /// or `catch_unwind`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        TaskError::Panicked {
            message: panic_message(payload.as_ref()),
        }
    }
}

/// Extract the text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}
