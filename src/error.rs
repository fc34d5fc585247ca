//! Unified error types for the coop door controller.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! dispatch loop's error handling uniform. All variants are `Copy` so they
//! can be passed through handlers without allocation.
//!
//! Error taxonomy:
//! - settings failures are logged and ignored by their callers,
//! - unsupported commands are rejected with a status, never an `Err`,
//! - protocol-stack internal errors are fatal and propagate out of the
//!   dispatch loop.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level controller error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The protocol stack reported an internal error. Unrecoverable.
    Stack(StackError),
    /// The persistent-settings subsystem failed. Recoverable (logged).
    Settings(SettingsError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stack(e) => write!(f, "stack: {e}"),
            Self::Settings(e) => write!(f, "settings: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Protocol stack errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the mesh stack collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    /// The stack cannot honour the request in its current state
    /// (e.g. identify requested while commissioning is in progress).
    InvalidState,
    /// Any other stack-internal failure, with the raw stack return code.
    Internal(i32),
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState => write!(f, "invalid state"),
            Self::Internal(code) => write!(f, "internal error (code {code})"),
        }
    }
}

impl From<StackError> for Error {
    fn from(e: StackError) -> Self {
        Self::Stack(e)
    }
}

// ---------------------------------------------------------------------------
// Settings errors
// ---------------------------------------------------------------------------

/// Errors from the persistent-settings collaborator. Never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsError {
    /// The settings backend could not be initialised.
    InitFailed,
    /// Stored settings exist but could not be read back.
    LoadFailed,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed => write!(f, "initialisation failed"),
            Self::LoadFailed => write!(f, "load failed"),
        }
    }
}

impl From<SettingsError> for Error {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Controller-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
