//! Control rules.
//!
//! [`evaluator`] decides actuator states in auto mode; [`deviation`] grades
//! readings against their thresholds for display and telemetry.

pub mod deviation;
pub mod evaluator;

pub use deviation::{DeviationBand, Metric, ReadingBands};
pub use evaluator::{Evaluation, Transition, desired_state, evaluate};
