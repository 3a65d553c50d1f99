mod error;

pub use error::{panic_message, Result, TaskError};
