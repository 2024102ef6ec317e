// IntStack - Bounded Stack Device Toolkit
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use intstack_config::{BackendKind, ConfigError, ToolConfig};
use std::path::PathBuf;

#[test]
fn test_empty_yaml_gives_defaults() {
    let config: ToolConfig = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config, ToolConfig::default());
    assert_eq!(config.device.backend, BackendKind::Chardev);
    assert_eq!(config.device.path, PathBuf::from("/dev/int_stack"));
    assert!(config.usb_key.required);
    assert_eq!(config.usb_key.vendor_id, 0x058f);
    assert_eq!(config.usb_key.product_id, 0x6387);
}

#[test]
fn test_full_yaml_parses() {
    let yaml = r#"
schema_version: "1.0"
device:
  backend: sim
  path: /dev/other_stack
  state_file: /tmp/stack.json
usb_key:
  required: false
  vendor_id: 0x1d6b
  product_id: 0x0002
  sysfs_root: /tmp/usb
"#;
    let config: ToolConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.device.backend, BackendKind::Simulated);
    assert_eq!(config.device.state_file, Some(PathBuf::from("/tmp/stack.json")));
    assert!(!config.usb_key.required);
    assert_eq!(config.usb_key.vendor_id, 0x1d6b);
    assert_eq!(config.usb_key.product_id, 0x0002);
    assert_eq!(config.usb_key.sysfs_root, PathBuf::from("/tmp/usb"));
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_simulated_without_state_file_is_rejected() {
    let config: ToolConfig = serde_yaml::from_str("device:\n  backend: simulated\n").unwrap();
    assert_eq!(config.validate(), Err(ConfigError::MissingStateFile));
}

#[test]
fn test_unknown_schema_is_rejected() {
    let config: ToolConfig = serde_yaml::from_str("schema_version: \"2.0\"\n").unwrap();
    assert_eq!(
        config.validate(),
        Err(ConfigError::UnsupportedSchema("2.0".to_string()))
    );
}

#[test]
fn test_from_file_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("int-stack.yaml");
    std::fs::write(&path, "usb_key:\n  required: false\n").unwrap();

    let config = ToolConfig::from_file(&path).unwrap();
    assert!(!config.usb_key.required);
    assert_eq!(ToolConfig::load(Some(&path)).unwrap(), config);
    assert_eq!(ToolConfig::load(None).unwrap(), ToolConfig::default());

    assert!(ToolConfig::from_file(dir.path().join("missing.yaml")).is_err());

    std::fs::write(&path, "device:\n  backend: simulated\n").unwrap();
    let config = ToolConfig::from_file(&path).unwrap();
    assert_eq!(config.device.backend, BackendKind::Simulated);
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("state_file"));
}

#[test]
fn test_backend_from_str() {
    assert_eq!("SIM".parse::<BackendKind>(), Ok(BackendKind::Simulated));
    assert_eq!("device".parse::<BackendKind>(), Ok(BackendKind::Chardev));
    assert!("usb".parse::<BackendKind>().is_err());
}
