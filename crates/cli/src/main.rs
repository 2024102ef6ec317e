// IntStack - Bounded Stack Device Toolkit
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

mod dispatch;

use clap::{Parser, Subcommand};
use intstack_config::{BackendKind, ToolConfig};
use intstack_core::{ResourceError, Session, SimulatedBackend, StackResource, UsbKey};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{error, info, warn};

use dispatch::{Action, EXIT_CONFIG_ERROR, EXIT_DEVICE_UNAVAILABLE, EXIT_RUNTIME_ERROR};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Control the int_stack bounded stack device",
    long_about = None
)]
struct Cli {
    /// Path to the tool configuration (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend to drive: chardev or simulated
    #[arg(long, global = true, value_parser = BackendKind::from_str)]
    backend: Option<BackendKind>,

    /// Device node of the kernel driver
    #[arg(long, global = true)]
    device: Option<PathBuf>,

    /// State file of the simulated device (selects the simulated backend)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Skip the USB key presence check
    #[arg(long, global = true)]
    no_usb_check: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Set the stack capacity
    SetSize {
        #[arg(allow_hyphen_values = true)]
        size: Option<String>,
    },
    /// Push a value onto the stack
    Push {
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// Pop the top value, or print NULL when empty
    Pop,
    /// Pop and print every value, top first
    Unwind,
    /// Print the number of stored values
    Count,
    #[command(external_subcommand)]
    Other(Vec<String>),
}

impl From<Commands> for Action {
    fn from(command: Commands) -> Self {
        match command {
            Commands::SetSize { size } => parse_operand(size, Action::SetSize),
            Commands::Push { value } => parse_operand(value, Action::Push),
            Commands::Pop => Action::Pop,
            Commands::Unwind => Action::Unwind,
            Commands::Count => Action::Count,
            Commands::Other(args) => Action::Unknown(args.into_iter().next().unwrap_or_default()),
        }
    }
}

/// Operands are parsed after the device is open, so a bad value is reported
/// on stdout like any other command failure instead of as a usage error.
fn parse_operand(operand: Option<String>, action: fn(i32) -> Action) -> Action {
    match operand {
        None => Action::MissingOperand,
        Some(text) => match text.trim().parse::<i32>() {
            Ok(n) => action(n),
            Err(e) => Action::InvalidOperand(format!("invalid integer '{}': {}", text, e)),
        },
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<ToolConfig> {
    let mut config = ToolConfig::load(cli.config.as_deref())?;

    if let Some(path) = &cli.state {
        config.device.state_file = Some(path.clone());
        if cli.backend.is_none() {
            config.device.backend = BackendKind::Simulated;
        }
    }
    if let Some(backend) = cli.backend {
        config.device.backend = backend;
    }
    if let Some(path) = &cli.device {
        config.device.path = path.clone();
    }
    if cli.no_usb_check {
        config.usb_key.required = false;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries command output only.
    let level = if cli.trace {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    if config.usb_key.required {
        let key = UsbKey::new(config.usb_key.vendor_id, config.usb_key.product_id);
        if !key.is_attached(&config.usb_key.sysfs_root) {
            warn!(
                "USB key {} not found under {:?}",
                key, config.usb_key.sysfs_root
            );
            println!("ERROR: USB key is not inserted");
            return ExitCode::from(EXIT_DEVICE_UNAVAILABLE);
        }
        info!("USB key {} present", key);
    }

    let action = Action::from(cli.command);
    match config.device.backend {
        BackendKind::Chardev => run_chardev(&config, &action),
        BackendKind::Simulated => {
            let Some(state_file) = &config.device.state_file else {
                error!("The simulated backend needs a state file");
                return ExitCode::from(EXIT_CONFIG_ERROR);
            };
            match SimulatedBackend::open(state_file) {
                Ok(backend) => run_session(Session::new(backend), &action),
                Err(e) => open_failed(e),
            }
        }
    }
}

#[cfg(unix)]
fn run_chardev(config: &ToolConfig, action: &Action) -> ExitCode {
    match intstack_core::CharDevBackend::open(&config.device.path) {
        Ok(backend) => run_session(Session::new(backend), action),
        Err(e) => open_failed(e),
    }
}

#[cfg(not(unix))]
fn run_chardev(_config: &ToolConfig, _action: &Action) -> ExitCode {
    error!("The chardev backend is only available on unix");
    ExitCode::from(EXIT_CONFIG_ERROR)
}

fn run_session<R: StackResource>(mut session: Session<R>, action: &Action) -> ExitCode {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match dispatch::execute(&mut session, action, &mut out) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("Failed to write output: {}", e);
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

fn open_failed(err: ResourceError) -> ExitCode {
    match err {
        ResourceError::Unavailable { path } => {
            warn!("Device node {:?} does not exist", path);
            println!("ERROR: USB key is not inserted");
        }
        other => println!("ERROR: Could not open device ({})", other),
    }
    ExitCode::from(EXIT_DEVICE_UNAVAILABLE)
}
