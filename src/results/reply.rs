//! Status plus optional result

use crate::error::{MemlinkError, Result};
use crate::protocol::Status;

/// Outcome of a data-returning command
///
/// Holds a value only when the status is [`Status::Ok`].
#[derive(Debug)]
#[must_use]
pub struct Reply<T> {
    status: Status,
    value: Option<T>,
}

impl<T> Reply<T> {
    pub(crate) fn ok(value: T) -> Self {
        Self {
            status: Status::Ok,
            value: Some(value),
        }
    }

    pub(crate) fn failed(status: Status) -> Self {
        debug_assert!(!status.is_ok(), "failed reply built with OK status");
        Self {
            status,
            value: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// Split into the classic `(status, result-or-none)` pair
    pub fn into_parts(self) -> (Status, Option<T>) {
        (self.status, self.value)
    }

    /// Non-OK statuses become [`MemlinkError::Status`]
    pub fn into_result(self) -> Result<T> {
        match self.value {
            Some(value) => Ok(value),
            None => Err(MemlinkError::Status(self.status)),
        }
    }
}
