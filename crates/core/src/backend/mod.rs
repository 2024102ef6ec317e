// IntStack - Bounded Stack Device Toolkit
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

#[cfg(unix)]
pub mod chardev;
pub mod simulated;

#[cfg(unix)]
pub use chardev::CharDevBackend;
pub use simulated::SimulatedBackend;

use crate::ResourceResult;

/// Typed operations on a stack resource.
///
/// Implementations own the wire encoding; callers only see values.
pub trait StackResource: std::fmt::Debug {
    fn set_size(&mut self, capacity: i32) -> ResourceResult<()>;
    fn push(&mut self, value: i32) -> ResourceResult<()>;
    /// `Ok(None)` when the stack is empty.
    fn pop(&mut self) -> ResourceResult<Option<i32>>;
    fn count(&mut self) -> ResourceResult<usize>;
}
