//! Egg-incubator control library.
//!
//! Exposes the auto-mode evaluator, the control service and its ports, and
//! the in-memory adapters used by the binary and the integration tests.

#![deny(unused_must_use)]

pub mod adapters;
pub mod announce;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod hatch;
pub mod model;
pub mod wire;
