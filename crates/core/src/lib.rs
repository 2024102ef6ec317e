// IntStack - Bounded Stack Device Toolkit
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod backend;
pub mod device;
pub mod presence;
pub mod session;
pub mod stack;

pub use backend::{SimulatedBackend, StackResource};
#[cfg(unix)]
pub use backend::CharDevBackend;
pub use device::{DeviceError, StackDevice, IOCTL_GET_COUNT, IOCTL_SET_SIZE};
pub use presence::UsbKey;
pub use session::{ResourceError, Session, Unwind};
pub use stack::{Drain, Stack, StackError, StackSnapshot};

/// Name of the device node registered by the kernel driver.
pub const DEVICE_NAME: &str = "int_stack";

/// Size in bytes of one value on the data plane.
pub const WORD_SIZE: usize = std::mem::size_of::<i32>();

pub type StackResult<T> = Result<T, StackError>;
pub type DeviceResult<T> = Result<T, DeviceError>;
pub type ResourceResult<T> = Result<T, ResourceError>;
