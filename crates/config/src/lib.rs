// IntStack - Bounded Stack Device Toolkit
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default schema version for YAML configs
fn default_schema_version() -> String {
    "1.0".to_string()
}

fn default_true() -> bool {
    true
}

fn default_device_path() -> PathBuf {
    PathBuf::from("/dev/int_stack")
}

fn default_sysfs_root() -> PathBuf {
    PathBuf::from("/sys/bus/usb/devices")
}

fn default_vendor_id() -> u16 {
    0x058f
}

fn default_product_id() -> u16 {
    0x6387
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the simulated backend needs a state_file")]
    MissingStateFile,
    #[error("unsupported schema version '{0}'")]
    UnsupportedSchema(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The kernel driver's device node.
    #[default]
    #[serde(alias = "device", alias = "kernel")]
    Chardev,
    /// In-process device persisted to a JSON state file.
    #[serde(alias = "sim")]
    Simulated,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "chardev" | "device" | "kernel" => Ok(Self::Chardev),
            "simulated" | "sim" => Ok(Self::Simulated),
            _ => Err(format!(
                "unsupported backend '{}'; supported: chardev, simulated",
                value
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default = "default_device_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub state_file: Option<PathBuf>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            path: default_device_path(),
            state_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbKeyConfig {
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,
    #[serde(default = "default_product_id")]
    pub product_id: u16,
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,
}

impl Default for UsbKeyConfig {
    fn default() -> Self {
        Self {
            required: true,
            vendor_id: default_vendor_id(),
            product_id: default_product_id(),
            sysfs_root: default_sysfs_root(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub usb_key: UsbKeyConfig,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            device: DeviceConfig::default(),
            usb_key: UsbKeyConfig::default(),
        }
    }
}

impl ToolConfig {
    /// Parses `path` without validating it; call [`ToolConfig::validate`]
    /// once any overrides have been applied.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("Failed to open config {:?}", path))?;
        let config: Self =
            serde_yaml::from_reader(f).context("Failed to parse IntStack config YAML")?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reads `path` when given, otherwise falls back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.schema_version.starts_with("1.") {
            return Err(ConfigError::UnsupportedSchema(self.schema_version.clone()));
        }
        if self.device.backend == BackendKind::Simulated && self.device.state_file.is_none() {
            return Err(ConfigError::MissingStateFile);
        }
        Ok(())
    }
}
