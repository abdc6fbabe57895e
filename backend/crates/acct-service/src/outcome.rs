use crate::{Result as ServiceErrorResult, ServiceError};

/// Result of an operation whose primary store step succeeded.
///
/// `desync` carries a cache failure observed afterwards. It never retracts
/// `value`: the store of record stays authoritative.
#[derive(Debug)]
#[must_use]
pub struct Outcome<T> {
    pub value: T,
    pub desync: Option<ServiceError>,
}

impl<T> Outcome<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            desync: None,
        }
    }

    pub fn desynced(value: T, desync: ServiceError) -> Self {
        Self {
            value,
            desync: Some(desync),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.desync.is_none()
    }

    /// Treat drift as an error, dropping the committed value.
    pub fn into_result(self) -> ServiceErrorResult<T> {
        match self.desync {
            None => Ok(self.value),
            Some(desync) => Err(desync),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            desync: self.desync,
        }
    }
}
