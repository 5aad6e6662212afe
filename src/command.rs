//! Boundary commands.
//!
//! Callers outside the crate speak in raw command codes and a small argument
//! record; this module turns them into typed commands before anything
//! reaches the scheduler.

use crate::container::ContainerId;
use crate::errors::{ContainerError, ContainerResult};

/// Scheduler command accepted at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Command {
    /// Leave the caller's container.
    Deregister = 0,
    /// Join or create a container.
    Register = 1,
    /// Pass the turn within the caller's container.
    Yield = 2,
}

impl Command {
    /// Decode a raw command code.
    pub const fn from_raw(raw: u32) -> ContainerResult<Self> {
        match raw {
            0 => Ok(Command::Deregister),
            1 => Ok(Command::Register),
            2 => Ok(Command::Yield),
            other => Err(ContainerError::UnknownCommand(other)),
        }
    }

    pub const fn raw(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for Command {
    type Error = ContainerError;

    fn try_from(raw: u32) -> ContainerResult<Self> {
        Command::from_raw(raw)
    }
}

/// Argument record passed with every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct ContainerCmd {
    pub cid: ContainerId,
}

impl ContainerCmd {
    pub const fn new(cid: ContainerId) -> Self {
        Self { cid }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_codes_are_stable() {
        for cmd in [Command::Deregister, Command::Register, Command::Yield] {
            assert_eq!(Command::from_raw(cmd.raw()), Ok(cmd));
        }
        assert_eq!(Command::Register.raw(), 1);
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(
            Command::try_from(0x4000),
            Err(ContainerError::UnknownCommand(0x4000))
        );
    }
}
