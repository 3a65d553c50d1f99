//! Deferred work that outlives the frame that created it.
//!
//! A [`Work`] holder hands out [`Deferred`] tasks that return its value. Each
//! task owns what it reads, so destroying the holder right after spawning
//! does not change the result:
//!
//! ```
//! use capture_runtime::{Launch, Work};
//!
//! let work = Work::new();
//! let task = work.spawn_with(Launch::Lazy)?;
//! drop(work);
//! assert_eq!(task.wait()?, 42);
//! # Ok::<(), capture_runtime::TaskError>(())
//! ```
//!
//! There are three ways to hand data to a task:
//!
//! - [`Work::spawn`] copies the field.
//! - [`Work::spawn_self`] clones the whole holder.
//! - [`Work::spawn_shared`] moves a strong `Arc` reference into the task.

mod deferred;
mod holder;
mod scenario;

pub use capture_common::{Result, TaskError};
pub use deferred::{Deferred, Launch};
pub use holder::{Work, DEFAULT_VALUE};
pub use scenario::{spawn_from_scope, spawn_self_from_scope, Scenario};
