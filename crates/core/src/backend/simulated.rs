// IntStack - Bounded Stack Device Toolkit
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::StackResource;
use crate::device::{StackDevice, IOCTL_GET_COUNT, IOCTL_SET_SIZE};
use crate::{ResourceResult, WORD_SIZE};
use std::io;
use std::path::{Path, PathBuf};

/// In-process stand-in for the kernel device.
///
/// With a state file, the device contents survive between invocations the way
/// the real driver keeps them between opens.
#[derive(Debug, Default)]
pub struct SimulatedBackend {
    device: StackDevice,
    state_file: Option<PathBuf>,
}

impl SimulatedBackend {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn open<P: AsRef<Path>>(state_file: P) -> ResourceResult<Self> {
        let path = state_file.as_ref().to_path_buf();
        let mut device = StackDevice::new();

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let state: serde_json::Value = serde_json::from_str(&content)?;
                device.restore(state)?;
                tracing::debug!("Restored simulated device from {:?}", path);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No state at {:?}, starting with an unconfigured device", path);
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            device,
            state_file: Some(path),
        })
    }

    pub fn device(&self) -> &StackDevice {
        &self.device
    }

    fn persist(&self) -> ResourceResult<()> {
        let Some(path) = &self.state_file else {
            return Ok(());
        };

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let data = serde_json::to_vec_pretty(&self.device.snapshot())?;
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl StackResource for SimulatedBackend {
    fn set_size(&mut self, capacity: i32) -> ResourceResult<()> {
        let mut arg = capacity;
        self.device.ioctl(IOCTL_SET_SIZE, &mut arg)?;
        self.persist()
    }

    fn push(&mut self, value: i32) -> ResourceResult<()> {
        self.device.write(&value.to_ne_bytes())?;
        self.persist()
    }

    fn pop(&mut self) -> ResourceResult<Option<i32>> {
        let mut buf = [0u8; WORD_SIZE];
        if self.device.read(&mut buf)? == 0 {
            return Ok(None);
        }
        self.persist()?;
        Ok(Some(i32::from_ne_bytes(buf)))
    }

    fn count(&mut self) -> ResourceResult<usize> {
        let mut arg = 0;
        self.device.ioctl(IOCTL_GET_COUNT, &mut arg)?;
        Ok(arg.max(0) as usize)
    }
}
