//! Unified error types for the tank controller firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! binary's start-up error handling uniform.  All variants are `Copy` so
//! they can be handed through the dispatcher and the FSM callbacks without
//! allocation.
//!
//! The control core itself has almost no failure paths: guards return
//! booleans and actions return nothing.  The one fault worth naming is a
//! level-lock acquisition that exceeds its configured timeout.  Operator
//! input errors ([`ModeError`]) stay on the console and never reach
//! `Error`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The level register lock could not be acquired in time.
    Lock(LockError),
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lock(e) => write!(f, "level lock: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Lock errors
// ---------------------------------------------------------------------------

/// Only produced when a lock timeout is configured; the default policy
/// blocks without limit and never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockError {
    Timeout { waited_ms: u32 },
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { waited_ms } => write!(f, "acquisition timed out after {waited_ms} ms"),
        }
    }
}

impl std::error::Error for LockError {}

impl From<LockError> for Error {
    fn from(e: LockError) -> Self {
        Self::Lock(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.  Names the field and the rule.
    ValidationFailed(&'static str),
    /// The JSON document could not be parsed.
    Malformed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Malformed => write!(f, "malformed JSON"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Mode selection errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeError {
    /// Top-level mode outside {0 = manual, 1 = automatic}.
    InvalidMode(i32),
    /// Sub-mode outside {0 = single-shot, 1 = continuous}.
    InvalidSubMode(i32),
    /// Manual mode needs a sub-mode.
    MissingSubMode,
    /// Input was not a list of integers.
    Malformed,
}

impl fmt::Display for ModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMode(v) => write!(f, "mode {v} is not 0 (manual) or 1 (automatic)"),
            Self::InvalidSubMode(v) => {
                write!(f, "sub-mode {v} is not 0 (single-shot) or 1 (continuous)")
            }
            Self::MissingSubMode => write!(f, "manual mode requires a sub-mode"),
            Self::Malformed => write!(f, "expected integers"),
        }
    }
}

impl std::error::Error for ModeError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
