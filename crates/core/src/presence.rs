// IntStack - Bounded Stack Device Toolkit
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::path::Path;

/// USB key that must be plugged in before the stack may be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsbKey {
    pub vendor_id: u16,
    pub product_id: u16,
}

impl Default for UsbKey {
    fn default() -> Self {
        Self {
            vendor_id: 0x058f,
            product_id: 0x6387,
        }
    }
}

impl UsbKey {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
        }
    }

    /// Scans a sysfs USB device directory (normally `/sys/bus/usb/devices`).
    pub fn is_attached<P: AsRef<Path>>(&self, sysfs_root: P) -> bool {
        let root = sysfs_root.as_ref();
        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Cannot list {:?}: {}", root, e);
                return false;
            }
        };

        entries.flatten().any(|entry| {
            let dir = entry.path();
            read_id(&dir.join("idVendor")) == Some(self.vendor_id)
                && read_id(&dir.join("idProduct")) == Some(self.product_id)
        })
    }
}

impl std::fmt::Display for UsbKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}

fn read_id(path: &Path) -> Option<u16> {
    let text = std::fs::read_to_string(path).ok()?;
    u16::from_str_radix(text.trim(), 16).ok()
}
