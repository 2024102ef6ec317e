// IntStack - Bounded Stack Device Toolkit
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Character-device model of the stack.
//!
//! The control plane is a pair of ioctl requests, the data plane moves one
//! native-endian `i32` per read or write. Backends use this to speak the same
//! protocol as the kernel driver without needing the driver loaded.

use crate::stack::{Stack, StackError, StackSnapshot};
use crate::{DeviceResult, WORD_SIZE};

const IOCTL_MAGIC: u32 = b'k' as u32;

/// `_IOW('k', 1, int)`: set the capacity from the argument.
pub const IOCTL_SET_SIZE: u32 = ioc(IOC_WRITE, 1);
/// `_IOR('k', 2, int)`: store the current element count in the argument.
pub const IOCTL_GET_COUNT: u32 = ioc(IOC_READ, 2);

const IOC_WRITE: u32 = 1;
const IOC_READ: u32 = 2;

const fn ioc(dir: u32, nr: u32) -> u32 {
    (dir << 30) | ((WORD_SIZE as u32) << 16) | (IOCTL_MAGIC << 8) | nr
}

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("buffer of {len} bytes is shorter than one word")]
    ShortBuffer { len: usize },
    #[error("unsupported ioctl request {0:#010x}")]
    UnsupportedRequest(u32),
    #[error(transparent)]
    Stack(#[from] StackError),
    #[error("malformed device snapshot: {0}")]
    BadSnapshot(#[from] serde_json::Error),
}

impl DeviceError {
    /// The errno the kernel driver reports for the same condition.
    pub fn errno(&self) -> i32 {
        match self {
            Self::ShortBuffer { .. } => libc::EINVAL,
            Self::UnsupportedRequest(_) => libc::ENOTTY,
            Self::Stack(StackError::StackFull { .. }) => libc::ERANGE,
            Self::Stack(_) => libc::EINVAL,
            Self::BadSnapshot(_) => libc::EINVAL,
        }
    }
}

#[derive(Debug, Default)]
pub struct StackDevice {
    stack: Stack,
}

impl StackDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn ioctl(&mut self, request: u32, arg: &mut i32) -> DeviceResult<()> {
        match request {
            IOCTL_SET_SIZE => {
                self.stack.configure(*arg)?;
                tracing::debug!("int_stack: capacity set to {}", *arg);
                Ok(())
            }
            IOCTL_GET_COUNT => {
                *arg = self.stack.count() as i32;
                Ok(())
            }
            other => Err(DeviceError::UnsupportedRequest(other)),
        }
    }

    /// Pushes the first word of `buf`. Returns the number of bytes consumed.
    pub fn write(&mut self, buf: &[u8]) -> DeviceResult<usize> {
        let word: [u8; WORD_SIZE] = buf
            .get(..WORD_SIZE)
            .and_then(|w| <[u8; WORD_SIZE]>::try_from(w).ok())
            .ok_or(DeviceError::ShortBuffer { len: buf.len() })?;
        self.stack.push(i32::from_ne_bytes(word))?;
        Ok(WORD_SIZE)
    }

    /// Pops into the first word of `buf`. Returns 0 when the stack is empty.
    pub fn read(&mut self, buf: &mut [u8]) -> DeviceResult<usize> {
        let len = buf.len();
        let Some(word) = buf.get_mut(..WORD_SIZE) else {
            return Err(DeviceError::ShortBuffer { len });
        };
        match self.stack.pop() {
            Some(value) => {
                word.copy_from_slice(&value.to_ne_bytes());
                Ok(WORD_SIZE)
            }
            None => Ok(0),
        }
    }

    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self.stack.snapshot()).unwrap_or(serde_json::Value::Null)
    }

    pub fn restore(&mut self, state: serde_json::Value) -> DeviceResult<()> {
        let snapshot: StackSnapshot = serde_json::from_value(state)?;
        self.stack.restore(snapshot)?;
        Ok(())
    }
}
