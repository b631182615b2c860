//! Pipeline entry point: the check cycle and its carried state.

pub mod cycle;

pub use cycle::{TrackerState, run_cycle};
