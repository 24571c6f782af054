//! Application core — domain orchestration, no direct I/O.
//!
//! This module holds the rules that tie the incubator together: the
//! control service reacting to readings and commands, the snapshot feed
//! that drives it, and the hatch-cycle workflow.  Every backend is reached
//! through the **port traits** in [`ports`], so the whole layer runs in
//! tests against in-memory adapters.

pub mod commands;
pub mod events;
pub mod feed;
pub mod hatch;
pub mod ports;
pub mod service;
pub mod subscription;
