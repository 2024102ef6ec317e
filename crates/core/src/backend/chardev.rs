// IntStack - Bounded Stack Device Toolkit
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::StackResource;
use crate::device::{IOCTL_GET_COUNT, IOCTL_SET_SIZE};
use crate::{ResourceError, ResourceResult, WORD_SIZE};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

/// Handle on the `int_stack` device node exposed by the kernel driver.
#[derive(Debug)]
pub struct CharDevBackend {
    file: File,
    path: PathBuf,
}

impl CharDevBackend {
    pub fn open<P: AsRef<Path>>(path: P) -> ResourceResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    ResourceError::Unavailable { path: path.clone() }
                } else {
                    ResourceError::Open {
                        path: path.clone(),
                        source,
                    }
                }
            })?;
        tracing::debug!("Opened {:?}", path);
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ioctl(&self, request: u32, arg: &mut i32) -> io::Result<()> {
        // SAFETY: both requests take a pointer to one `int`, which `arg` outlives.
        let rc = unsafe { libc::ioctl(self.file.as_raw_fd(), request as _, arg as *mut i32) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl StackResource for CharDevBackend {
    fn set_size(&mut self, capacity: i32) -> ResourceResult<()> {
        let mut arg = capacity;
        self.ioctl(IOCTL_SET_SIZE, &mut arg).map_err(|e| {
            if e.raw_os_error() == Some(libc::EINVAL) {
                ResourceError::InvalidCapacity(capacity)
            } else {
                ResourceError::Io(e)
            }
        })
    }

    fn push(&mut self, value: i32) -> ResourceResult<()> {
        let written = self.file.write(&value.to_ne_bytes()).map_err(|e| {
            if e.raw_os_error() == Some(libc::ERANGE) {
                ResourceError::StackFull
            } else {
                ResourceError::Io(e)
            }
        })?;
        if written != WORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("device accepted {} of {} bytes", written, WORD_SIZE),
            )
            .into());
        }
        Ok(())
    }

    fn pop(&mut self) -> ResourceResult<Option<i32>> {
        let mut buf = [0u8; WORD_SIZE];
        match self.file.read(&mut buf)? {
            0 => Ok(None),
            WORD_SIZE => Ok(Some(i32::from_ne_bytes(buf))),
            n => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("device returned {} of {} bytes", n, WORD_SIZE),
            )
            .into()),
        }
    }

    fn count(&mut self) -> ResourceResult<usize> {
        let mut arg = 0;
        self.ioctl(IOCTL_GET_COUNT, &mut arg)?;
        Ok(arg.max(0) as usize)
    }
}
