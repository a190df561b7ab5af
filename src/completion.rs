use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{RenderError, Result};

/// Terminal outcome of a task or a whole render call: exactly one of a
/// value, an error, or a cooperative stop.
///
/// `Stopped` is not a failure. Nothing was computed, but nothing went wrong
/// either, and callers usually just drop the frame.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Completion<T> {
    Value(T),
    Error(RenderError),
    Stopped,
}

impl<T> Completion<T> {
    pub fn is_value(&self) -> bool {
        matches!(self, Completion::Value(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Completion::Error(_))
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Completion::Stopped)
    }

    pub fn value(self) -> Option<T> {
        match self {
            Completion::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RenderError> {
        match self {
            Completion::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Completion<U> {
        match self {
            Completion::Value(v) => Completion::Value(f(v)),
            Completion::Error(e) => Completion::Error(e),
            Completion::Stopped => Completion::Stopped,
        }
    }

    /// Folds the stop into [`RenderError::Stopped`] for callers that only
    /// want `?`.
    pub fn into_result(self) -> Result<T> {
        match self {
            Completion::Value(v) => Ok(v),
            Completion::Error(e) => Err(e),
            Completion::Stopped => Err(RenderError::Stopped),
        }
    }
}

impl<T> From<Result<T>> for Completion<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(v) => Completion::Value(v),
            Err(RenderError::Stopped) => Completion::Stopped,
            Err(e) => Completion::Error(e),
        }
    }
}

/// Shared flag polled by running tiles. Cloning shares the flag.
#[derive(Clone, Debug, Default)]
pub struct StopToken {
    stopped: Arc<AtomicBool>,
}

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
