//! Error handling for the container scheduler.
//!
//! Four kinds of failure: allocation failures, protocol misuse
//! by a caller, configured resource limits, and rejected boundary commands.
//! None of them leave the registry in an inconsistent state.

#![allow(clippy::uninlined_format_args)]

use core::fmt;

/// Result type for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;

/// Error type for all container operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerError {
    /// Member or group record could not be allocated
    Memory(MemoryError),
    /// Caller identity was not where the operation expected it
    Protocol(ProtocolError),
    /// A configured limit was reached
    Resource(ResourceError),
    /// Boundary layer received a command code it does not know
    UnknownCommand(u32),
    /// Kernel has not been initialized
    NotInitialized,
    /// Kernel was already initialized
    AlreadyInitialized,
}

/// Memory-related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// Growing the registry or a ring failed
    OutOfMemory,
}

/// Misuse of the register/yield/deregister protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Calling thread is not a member of any container
    NotRegistered,
    /// Calling thread already belongs to a container
    AlreadyRegistered,
}

/// Configured limit errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceError {
    /// Maximum number of live containers reached
    TooManyGroups,
    /// Maximum number of members in one container reached
    TooManyMembers,
}

impl ContainerError {
    /// True for protocol misuse, which the kernel may report as a no-op.
    pub fn is_misuse(&self) -> bool {
        matches!(self, ContainerError::Protocol(_))
    }

    /// Negative errno-style code for the boundary layer.
    pub fn errno(&self) -> i32 {
        match self {
            ContainerError::Memory(_) => -12,        // ENOMEM
            ContainerError::Protocol(ProtocolError::NotRegistered) => -3, // ESRCH
            ContainerError::Protocol(ProtocolError::AlreadyRegistered) => -17, // EEXIST
            ContainerError::Resource(_) => -11,      // EAGAIN
            ContainerError::UnknownCommand(_) => -25, // ENOTTY
            ContainerError::NotInitialized => -19,   // ENODEV
            ContainerError::AlreadyInitialized => -16, // EBUSY
        }
    }
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::Memory(e) => write!(f, "Memory error: {}", e),
            ContainerError::Protocol(e) => write!(f, "Protocol misuse: {}", e),
            ContainerError::Resource(e) => write!(f, "Resource error: {}", e),
            ContainerError::UnknownCommand(cmd) => write!(f, "Unknown command: {:#x}", cmd),
            ContainerError::NotInitialized => write!(f, "Container kernel not initialized"),
            ContainerError::AlreadyInitialized => write!(f, "Container kernel already initialized"),
        }
    }
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::OutOfMemory => write!(f, "Out of memory for container records"),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::NotRegistered => write!(f, "Calling thread is not in any container"),
            ProtocolError::AlreadyRegistered => write!(f, "Calling thread already belongs to a container"),
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::TooManyGroups => write!(f, "Maximum number of containers reached"),
            ResourceError::TooManyMembers => write!(f, "Maximum members per container reached"),
        }
    }
}

impl From<MemoryError> for ContainerError {
    fn from(error: MemoryError) -> Self {
        ContainerError::Memory(error)
    }
}

impl From<ProtocolError> for ContainerError {
    fn from(error: ProtocolError) -> Self {
        ContainerError::Protocol(error)
    }
}

impl From<ResourceError> for ContainerError {
    fn from(error: ResourceError) -> Self {
        ContainerError::Resource(error)
    }
}

impl From<alloc::collections::TryReserveError> for ContainerError {
    fn from(_: alloc::collections::TryReserveError) -> Self {
        ContainerError::Memory(MemoryError::OutOfMemory)
    }
}
