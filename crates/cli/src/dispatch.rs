// IntStack - Bounded Stack Device Toolkit
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use intstack_core::{ResourceError, Session, StackResource};
use std::io::{self, Write};
use tracing::{debug, error};

pub const EXIT_OK: u8 = 0;
/// USB key absent, device node missing, or the device could not be opened.
pub const EXIT_DEVICE_UNAVAILABLE: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;
pub const EXIT_RUNTIME_ERROR: u8 = 3;
/// ERANGE, the errno the driver returns for a push onto a full stack.
pub const EXIT_STACK_FULL: u8 = 34;

/// A command after argument parsing, ready to run against a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetSize(i32),
    Push(i32),
    Pop,
    Unwind,
    Count,
    /// `set-size`/`push` given without a value; nothing is done.
    MissingOperand,
    InvalidOperand(String),
    Unknown(String),
}

/// Runs `action` and writes its user-facing text to `out`. Returns the exit code.
pub fn execute<R: StackResource, W: Write>(
    session: &mut Session<R>,
    action: &Action,
    out: &mut W,
) -> io::Result<u8> {
    debug!("Executing {:?}", action);
    match action {
        Action::SetSize(size) => match session.set_size(*size) {
            Ok(()) => Ok(EXIT_OK),
            Err(ResourceError::InvalidCapacity(_)) => {
                writeln!(out, "ERROR: size should be > 0")?;
                Ok(EXIT_OK)
            }
            Err(e) => runtime_error(out, &e),
        },
        Action::Push(value) => match session.push(*value) {
            Ok(()) => Ok(EXIT_OK),
            Err(ResourceError::StackFull) => {
                writeln!(out, "ERROR: stack is full")?;
                Ok(EXIT_STACK_FULL)
            }
            Err(e) => runtime_error(out, &e),
        },
        Action::Pop => match session.pop() {
            Ok(Some(value)) => {
                writeln!(out, "{}", value)?;
                Ok(EXIT_OK)
            }
            Ok(None) => {
                writeln!(out, "NULL")?;
                Ok(EXIT_OK)
            }
            Err(e) => runtime_error(out, &e),
        },
        Action::Unwind => {
            let unwind = match session.unwind() {
                Ok(unwind) => unwind,
                Err(e) => return runtime_error(out, &e),
            };
            for item in unwind {
                match item {
                    Ok(value) => writeln!(out, "{}", value)?,
                    Err(e) => return runtime_error(out, &e),
                }
            }
            Ok(EXIT_OK)
        }
        Action::Count => match session.count() {
            Ok(count) => {
                writeln!(out, "{}", count)?;
                Ok(EXIT_OK)
            }
            Err(e) => runtime_error(out, &e),
        },
        Action::MissingOperand => Ok(EXIT_OK),
        Action::InvalidOperand(reason) => {
            writeln!(out, "ERROR: {}", reason)?;
            Ok(EXIT_OK)
        }
        Action::Unknown(name) => {
            writeln!(out, "ERROR: Unknown command '{}'", name)?;
            Ok(EXIT_OK)
        }
    }
}

fn runtime_error<W: Write>(out: &mut W, err: &ResourceError) -> io::Result<u8> {
    error!("{}", err);
    writeln!(out, "ERROR: {}", err)?;
    Ok(EXIT_RUNTIME_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use intstack_core::SimulatedBackend;

    fn run(session: &mut Session<SimulatedBackend>, action: Action) -> (u8, String) {
        let mut out = Vec::new();
        let code = execute(session, &action, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_push_pop_and_full() {
        let mut session = Session::new(SimulatedBackend::in_memory());
        assert_eq!(run(&mut session, Action::SetSize(2)), (EXIT_OK, String::new()));
        assert_eq!(run(&mut session, Action::Push(5)).0, EXIT_OK);
        assert_eq!(run(&mut session, Action::Push(7)).0, EXIT_OK);
        assert_eq!(
            run(&mut session, Action::Push(9)),
            (EXIT_STACK_FULL, "ERROR: stack is full\n".to_string())
        );
        assert_eq!(run(&mut session, Action::Pop), (EXIT_OK, "7\n".to_string()));
        assert_eq!(run(&mut session, Action::Pop), (EXIT_OK, "5\n".to_string()));
        assert_eq!(run(&mut session, Action::Pop), (EXIT_OK, "NULL\n".to_string()));
    }

    #[test]
    fn test_invalid_size_keeps_exit_code() {
        let mut session = Session::new(SimulatedBackend::in_memory());
        assert_eq!(
            run(&mut session, Action::SetSize(-4)),
            (EXIT_OK, "ERROR: size should be > 0\n".to_string())
        );
    }

    #[test]
    fn test_unwind_and_count() {
        let mut session = Session::new(SimulatedBackend::in_memory());
        run(&mut session, Action::SetSize(3));
        run(&mut session, Action::Push(1));
        run(&mut session, Action::Push(2));
        assert_eq!(run(&mut session, Action::Count), (EXIT_OK, "2\n".to_string()));
        assert_eq!(run(&mut session, Action::Unwind), (EXIT_OK, "2\n1\n".to_string()));
        assert_eq!(run(&mut session, Action::Unwind), (EXIT_OK, String::new()));
        assert_eq!(run(&mut session, Action::Pop), (EXIT_OK, "NULL\n".to_string()));
    }

    #[test]
    fn test_operand_errors_leave_stack_alone() {
        let mut session = Session::new(SimulatedBackend::in_memory());
        run(&mut session, Action::SetSize(1));
        assert_eq!(
            run(&mut session, Action::InvalidOperand("invalid integer 'abc'".into())),
            (EXIT_OK, "ERROR: invalid integer 'abc'\n".to_string())
        );
        assert_eq!(run(&mut session, Action::MissingOperand), (EXIT_OK, String::new()));
        assert_eq!(run(&mut session, Action::Count), (EXIT_OK, "0\n".to_string()));
    }

    #[test]
    fn test_unknown_command() {
        let mut session = Session::new(SimulatedBackend::in_memory());
        assert_eq!(
            run(&mut session, Action::Unknown("peek".into())),
            (EXIT_OK, "ERROR: Unknown command 'peek'\n".to_string())
        );
    }
}
