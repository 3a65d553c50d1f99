//! The three holder lifetimes exercised by the `capture` driver.

use crate::deferred::{Deferred, Launch};
use crate::holder::Work;
use capture_common::Result;
use std::fmt;

/// Build a holder, spawn from it, and return only the task.
///
/// The holder is dropped when this function returns, possibly before the
/// task has run.
pub fn spawn_from_scope(launch: Launch) -> Result<Deferred<i32>> {
    let work = Work::new();
    work.spawn_with(launch)
}

/// Like [`spawn_from_scope`], but the task owns a clone of the whole holder.
pub fn spawn_self_from_scope(launch: Launch) -> Result<Deferred<i32>> {
    let work = Work::new();
    work.spawn_self_with(launch)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Holder in the caller's scope, dropped before the wait.
    Direct,
    /// Holder local to [`spawn_from_scope`].
    Helper,
    /// Holder local to [`spawn_self_from_scope`].
    HelperSelf,
}

impl Scenario {
    /// Every scenario, in driver order.
    pub const ALL: [Scenario; 3] = [Scenario::Direct, Scenario::Helper, Scenario::HelperSelf];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Direct => "direct",
            Scenario::Helper => "helper",
            Scenario::HelperSelf => "helper-self",
        }
    }

    /// Run the scenario to completion and return the task's result.
    pub fn run(self, launch: Launch) -> Result<i32> {
        let task = match self {
            Scenario::Direct => {
                let work = Work::new();
                let task = work.spawn_with(launch)?;
                drop(work);
                task
            }
            Scenario::Helper => spawn_from_scope(launch)?,
            Scenario::HelperSelf => spawn_self_from_scope(launch)?,
        };

        log::debug!("scenario {}: waiting on task {}", self, task.id());
        task.wait()
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
