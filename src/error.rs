//! Unified error types for the incubator control core.
//!
//! Port-level errors ([`StoreError`], [`ConfigError`]) live next to the port
//! traits in [`crate::app::ports`].  This module adds the snapshot decode
//! error, the hatch-cycle workflow error, and a top-level `Error` that every
//! subsystem converts into.

use core::fmt;

use crate::app::ports::{ConfigError, StoreError};

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A database read or write failed.
    Store(StoreError),
    /// The local config cache rejected or could not load a config.
    Config(ConfigError),
    /// A snapshot could not be decoded into a domain type.
    Decode(DecodeError),
    /// A hatch-cycle operation was not allowed.
    Hatch(HatchError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "store: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Hatch(e) => write!(f, "hatch cycle: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<HatchError> for Error {
    fn from(e: HatchError) -> Self {
        Self::Hatch(e)
    }
}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Why a database snapshot was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The node is absent (`null`).
    Missing,
    /// The node is not the expected JSON shape.
    WrongType(&'static str),
    /// A required field is absent.
    MissingField(&'static str),
    /// A numeric field holds something that is not a number.
    NotANumber(&'static str),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "node is null"),
            Self::WrongType(expected) => write!(f, "expected {expected}"),
            Self::MissingField(field) => write!(f, "missing field `{field}`"),
            Self::NotANumber(field) => write!(f, "field `{field}` is not a number"),
        }
    }
}

impl std::error::Error for DecodeError {}

// ---------------------------------------------------------------------------
// Hatch-cycle errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HatchError {
    /// Cycle name was empty.
    EmptyName,
    /// Egg count was zero.
    NoEggs,
    /// Another cycle is still in progress.
    AlreadyActive,
    /// There is no cycle in progress.
    NoActiveCycle,
}

impl fmt::Display for HatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NoEggs => write!(f, "number of eggs must be at least 1"),
            Self::AlreadyActive => write!(f, "a cycle is already in progress"),
            Self::NoActiveCycle => write!(f, "no cycle in progress"),
        }
    }
}

impl std::error::Error for HatchError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
