//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock or in-memory adapters.

mod feed_tests;
mod hatch_tests;
mod mock_ports;
