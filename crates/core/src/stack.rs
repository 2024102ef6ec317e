// IntStack - Bounded Stack Device Toolkit
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::StackResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    #[error("invalid capacity {0}: size should be > 0")]
    InvalidCapacity(i32),
    #[error("stack is full (capacity {capacity})")]
    StackFull { capacity: usize },
    #[error("snapshot holds {count} values but capacity is {capacity}")]
    CorruptSnapshot { count: usize, capacity: usize },
}

/// Serializable state of a [`Stack`], bottom element first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSnapshot {
    pub capacity: usize,
    #[serde(default)]
    pub items: Vec<i32>,
}

/// Bounded LIFO of `i32` values.
///
/// A freshly created stack is unconfigured and behaves as if its capacity
/// were zero: every push fails with [`StackError::StackFull`] until
/// [`Stack::configure`] succeeds.
///
/// Reconfiguring keeps the current contents. Shrinking below the current
/// count truncates from the top, so only the oldest `capacity` values remain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    capacity: usize,
    items: Vec<i32>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: i32) -> StackResult<Self> {
        let mut stack = Self::new();
        stack.configure(capacity)?;
        Ok(stack)
    }

    pub fn configure(&mut self, capacity: i32) -> StackResult<()> {
        if capacity <= 0 {
            return Err(StackError::InvalidCapacity(capacity));
        }

        let capacity = capacity as usize;
        if self.items.len() > capacity {
            tracing::debug!(
                "Shrinking stack to {} discards {} values",
                capacity,
                self.items.len() - capacity
            );
            self.items.truncate(capacity);
        }
        self.capacity = capacity;
        Ok(())
    }

    pub fn push(&mut self, value: i32) -> StackResult<()> {
        if self.is_full() {
            return Err(StackError::StackFull {
                capacity: self.capacity,
            });
        }
        self.items.push(value);
        Ok(())
    }

    /// Removes the top value. `None` is the normal empty result, not a failure.
    pub fn pop(&mut self) -> Option<i32> {
        self.items.pop()
    }

    /// Removes every value present right now, top first.
    ///
    /// The count is captured when the iterator is created. Values are removed
    /// only as they are yielded; dropping the iterator early leaves the rest.
    pub fn drain(&mut self) -> Drain<'_> {
        let remaining = self.items.len();
        Drain {
            stack: self,
            remaining,
        }
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_configured(&self) -> bool {
        self.capacity > 0
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn snapshot(&self) -> StackSnapshot {
        StackSnapshot {
            capacity: self.capacity,
            items: self.items.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: StackSnapshot) -> StackResult<()> {
        if snapshot.items.len() > snapshot.capacity {
            return Err(StackError::CorruptSnapshot {
                count: snapshot.items.len(),
                capacity: snapshot.capacity,
            });
        }
        self.capacity = snapshot.capacity;
        self.items = snapshot.items;
        Ok(())
    }
}

/// Iterator returned by [`Stack::drain`].
#[derive(Debug)]
pub struct Drain<'a> {
    stack: &'a mut Stack,
    remaining: usize,
}

impl Iterator for Drain<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.stack.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Drain<'_> {}

impl std::iter::FusedIterator for Drain<'_> {}
