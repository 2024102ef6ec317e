// IntStack - Bounded Stack Device Toolkit
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::backend::StackResource;
use crate::device::DeviceError;
use crate::stack::StackError;
use crate::ResourceResult;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("device {path:?} is not present")]
    Unavailable { path: PathBuf },
    #[error("could not open device {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid capacity {0}: size should be > 0")]
    InvalidCapacity(i32),
    #[error("stack is full")]
    StackFull,
    #[error(transparent)]
    Device(DeviceError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("device state is not valid JSON: {0}")]
    State(#[from] serde_json::Error),
}

impl From<DeviceError> for ResourceError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::Stack(StackError::InvalidCapacity(n)) => Self::InvalidCapacity(n),
            DeviceError::Stack(StackError::StackFull { .. }) => Self::StackFull,
            other => Self::Device(other),
        }
    }
}

/// One opened stack resource, owned for the duration of a single command.
///
/// The underlying handle is released when the session is dropped, whichever
/// way the command ended.
#[derive(Debug)]
pub struct Session<R: StackResource> {
    resource: R,
}

impl<R: StackResource> Session<R> {
    pub fn new(resource: R) -> Self {
        tracing::debug!("Session opened on {:?}", resource);
        Self { resource }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn set_size(&mut self, capacity: i32) -> ResourceResult<()> {
        if capacity <= 0 {
            return Err(ResourceError::InvalidCapacity(capacity));
        }
        self.resource.set_size(capacity)
    }

    pub fn push(&mut self, value: i32) -> ResourceResult<()> {
        self.resource.push(value)
    }

    pub fn pop(&mut self) -> ResourceResult<Option<i32>> {
        self.resource.pop()
    }

    pub fn count(&mut self) -> ResourceResult<usize> {
        self.resource.count()
    }

    /// Pops every value present now, top first.
    ///
    /// The count is read once up front; the iterator then pops exactly that
    /// many times and stops early on an empty result or an error.
    pub fn unwind(&mut self) -> ResourceResult<Unwind<'_, R>> {
        let remaining = self.resource.count()?;
        tracing::debug!("Unwinding {} values", remaining);
        Ok(Unwind {
            resource: &mut self.resource,
            remaining,
        })
    }
}

impl<R: StackResource> Drop for Session<R> {
    fn drop(&mut self) {
        tracing::debug!("Session closed");
    }
}

#[derive(Debug)]
pub struct Unwind<'a, R: StackResource> {
    resource: &'a mut R,
    remaining: usize,
}

impl<R: StackResource> Iterator for Unwind<'_, R> {
    type Item = ResourceResult<i32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        match self.resource.pop() {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => {
                tracing::warn!("Stack emptied with {} values still expected", self.remaining);
                self.remaining = 0;
                None
            }
            Err(e) => {
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::{ResourceError, Session};
    use crate::backend::{SimulatedBackend, StackResource};
    use crate::ResourceResult;

    /// Resource whose count overstates its contents, as a racing writer would leave it.
    #[derive(Debug, Default)]
    struct ShrinkingResource {
        items: Vec<i32>,
        reported: usize,
        fail_pop: bool,
    }

    impl StackResource for ShrinkingResource {
        fn set_size(&mut self, _capacity: i32) -> ResourceResult<()> {
            Ok(())
        }

        fn push(&mut self, value: i32) -> ResourceResult<()> {
            self.items.push(value);
            Ok(())
        }

        fn pop(&mut self) -> ResourceResult<Option<i32>> {
            if self.fail_pop {
                return Err(ResourceError::Io(std::io::Error::other("read failed")));
            }
            Ok(self.items.pop())
        }

        fn count(&mut self) -> ResourceResult<usize> {
            Ok(self.reported)
        }
    }

    #[test]
    fn test_set_size_rejects_before_touching_resource() {
        let mut session = Session::new(SimulatedBackend::in_memory());
        session.set_size(3).unwrap();
        let err = session.set_size(0).unwrap_err();
        assert!(matches!(err, ResourceError::InvalidCapacity(0)));
        assert_eq!(session.resource().device().stack().capacity(), 3);
    }

    #[test]
    fn test_unwind_stops_on_early_empty() {
        let mut session = Session::new(ShrinkingResource {
            items: vec![1, 2],
            reported: 5,
            fail_pop: false,
        });
        let values: Vec<i32> = session.unwind().unwrap().map(Result::unwrap).collect();
        assert_eq!(values, vec![2, 1]);
    }

    #[test]
    fn test_unwind_ends_after_error() {
        let mut session = Session::new(ShrinkingResource {
            items: vec![1, 2],
            reported: 2,
            fail_pop: true,
        });
        let results: Vec<_> = session.unwind().unwrap().collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[test]
    fn test_unwind_uses_count_captured_up_front() {
        let mut session = Session::new(ShrinkingResource {
            items: vec![1, 2, 3],
            reported: 2,
            fail_pop: false,
        });
        let values: Vec<i32> = session.unwind().unwrap().map(Result::unwrap).collect();
        assert_eq!(values, vec![3, 2]);
        assert_eq!(session.pop().unwrap(), Some(1));
    }
}
