//! Deferred computations backed by worker threads.
//!
//! A [`Deferred`] is a handle to work whose result is retrieved later by a
//! blocking wait. Work launched with [`Launch::Eager`] starts on its own OS
//! thread as soon as the handle is created; [`Launch::Lazy`] work runs on the
//! waiting thread the first time the result is requested.
//!
//! Task closures must be `'static`, so they can only hold owned data. A
//! closure that borrows from the frame creating it does not compile.

use capture_common::{Result, TaskError};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

/// Task ID counter used to name worker threads.
static TASK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// When a deferred task runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Launch {
    /// Start immediately on a dedicated thread.
    #[default]
    Eager,
    /// Run on the waiting thread at the first wait.
    Lazy,
}

impl Launch {
    pub fn as_str(self) -> &'static str {
        match self {
            Launch::Eager => "eager",
            Launch::Lazy => "lazy",
        }
    }
}

impl fmt::Display for Launch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Launch {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "eager" => Ok(Launch::Eager),
            "lazy" => Ok(Launch::Lazy),
            other => Err(format!("unknown launch policy: {}", other)),
        }
    }
}

type Task<T> = Box<dyn FnOnce() -> T + Send + 'static>;

enum State<T> {
    /// Eager task still owned by its worker thread.
    Running(JoinHandle<T>),
    /// Lazy task not yet run.
    Pending(Task<T>),
    Done(T),
    /// The task panicked; the message is kept so every waiter sees it.
    Failed(String),
    /// The result was moved out.
    Taken,
}

/// Handle to a computation whose result is available through a blocking wait.
pub struct Deferred<T> {
    id: u64,
    launch: Launch,
    state: State<T>,
}

impl<T: Send + 'static> Deferred<T> {
    /// Create a deferred computation under the given launch policy.
    ///
    /// Fails only if an eager task cannot get a worker thread.
    pub fn spawn<F>(launch: Launch, task: F) -> Result<Self>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let id = TASK_ID_COUNTER.fetch_add(1, Ordering::SeqCst);

        let state = match launch {
            Launch::Eager => {
                let handle = thread::Builder::new()
                    .name(format!("capture-task-{}", id))
                    .spawn(task)
                    .map_err(TaskError::Spawn)?;
                State::Running(handle)
            }
            Launch::Lazy => State::Pending(Box::new(task)),
        };

        log::debug!("created task {} ({})", id, launch);
        Ok(Self { id, launch, state })
    }
}

impl<T> Deferred<T> {
    /// A handle whose result is already available.
    pub fn ready(value: T) -> Self {
        Self {
            id: TASK_ID_COUNTER.fetch_add(1, Ordering::SeqCst),
            launch: Launch::Eager,
            state: State::Done(value),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn launch(&self) -> Launch {
        self.launch
    }

    /// Whether waiting would return without blocking on the task body.
    pub fn is_ready(&self) -> bool {
        match &self.state {
            State::Running(handle) => handle.is_finished(),
            State::Pending(_) | State::Taken => false,
            State::Done(_) | State::Failed(_) => true,
        }
    }

    /// Block until the task has finished and its outcome is stored.
    fn resolve(&mut self) -> Result<()> {
        let outcome = match std::mem::replace(&mut self.state, State::Taken) {
            State::Running(handle) => handle.join(),
            State::Pending(task) => panic::catch_unwind(AssertUnwindSafe(task)),
            State::Done(value) => Ok(value),
            State::Failed(message) => {
                self.state = State::Failed(message.clone());
                return Err(TaskError::Panicked { message });
            }
            State::Taken => return Err(TaskError::Consumed),
        };

        match outcome {
            Ok(value) => {
                log::trace!("task {} finished", self.id);
                self.state = State::Done(value);
                Ok(())
            }
            Err(payload) => {
                let err = TaskError::from_panic(payload);
                log::warn!("task {} failed: {}", self.id, err);
                if let TaskError::Panicked { message } = &err {
                    self.state = State::Failed(message.clone());
                }
                Err(err)
            }
        }
    }

    /// Consume the handle and return the owned result.
    pub fn wait(mut self) -> Result<T> {
        self.resolve()?;
        match std::mem::replace(&mut self.state, State::Taken) {
            State::Done(value) => Ok(value),
            _ => Err(TaskError::Consumed),
        }
    }
}

impl<T: Clone> Deferred<T> {
    /// Block until the result is available and return a copy of it.
    ///
    /// The result is cached, so repeated calls return the same value.
    pub fn get(&mut self) -> Result<T> {
        self.resolve()?;
        match &self.state {
            State::Done(value) => Ok(value.clone()),
            _ => Err(TaskError::Consumed),
        }
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            State::Running(_) => "running",
            State::Pending(_) => "pending",
            State::Done(_) => "done",
            State::Failed(_) => "failed",
            State::Taken => "taken",
        };
        f.debug_struct("Deferred")
            .field("id", &self.id)
            .field("launch", &self.launch)
            .field("state", &state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    #[test]
    fn test_launch_parse() {
        assert_eq!("eager".parse::<Launch>(), Ok(Launch::Eager));
        assert_eq!("lazy".parse::<Launch>(), Ok(Launch::Lazy));
        assert!("async".parse::<Launch>().is_err());
        assert_eq!(Launch::default(), Launch::Eager);
        assert_eq!(Launch::Lazy.to_string(), "lazy");
    }

    #[test]
    fn test_eager_wait() {
        let task = Deferred::spawn(Launch::Eager, || 6 * 7).unwrap();
        assert_eq!(task.launch(), Launch::Eager);
        assert_eq!(task.wait().unwrap(), 42);
    }

    #[test]
    fn test_lazy_runs_on_first_wait() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let mut task = Deferred::spawn(Launch::Lazy, move || {
            flag.store(true, Ordering::SeqCst);
            42
        })
        .unwrap();

        assert!(!task.is_ready());
        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(task.get().unwrap(), 42);
        assert!(ran.load(Ordering::SeqCst));
        assert!(task.is_ready());
    }

    #[test]
    fn test_lazy_runs_on_waiting_thread() {
        let waiter = thread::current().id();
        let task = Deferred::spawn(Launch::Lazy, move || thread::current().id() == waiter).unwrap();
        assert!(task.wait().unwrap());
    }

    #[test]
    fn test_eager_runs_on_named_worker() {
        let task = Deferred::spawn(Launch::Eager, || {
            thread::current().name().map(str::to_owned)
        })
        .unwrap();
        let id = task.id();
        assert_eq!(task.wait().unwrap(), Some(format!("capture-task-{}", id)));
    }

    #[test]
    fn test_get_is_idempotent() {
        let mut task = Deferred::spawn(Launch::Eager, || 42).unwrap();
        assert_eq!(task.get().unwrap(), 42);
        assert_eq!(task.get().unwrap(), 42);
        assert!(task.is_ready());
    }

    #[test]
    fn test_ready() {
        let mut task = Deferred::ready(42);
        assert!(task.is_ready());
        assert_eq!(task.get().unwrap(), 42);
    }

    #[test]
    fn test_panic_reaches_waiter() {
        for launch in [Launch::Eager, Launch::Lazy] {
            let mut task = Deferred::spawn(launch, || -> i32 { panic!("holder was gone") }).unwrap();
            match task.get() {
                Err(TaskError::Panicked { message }) => assert_eq!(message, "holder was gone"),
                other => panic!("expected panic error, got {:?}", other),
            }
            // Later waits report the same failure.
            assert!(matches!(task.get(), Err(TaskError::Panicked { .. })));
        }
    }

    #[test]
    fn test_debug_shows_state() {
        let task = Deferred::spawn(Launch::Lazy, || 1).unwrap();
        let text = format!("{:?}", task);
        assert!(text.contains("pending"));
        assert!(text.contains("Lazy"));
    }
}
