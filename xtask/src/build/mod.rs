//! Build orchestration
//!
//! Drives configure, build and test over a selection of projects.

mod driver;

pub use driver::{
    default_threads, BuildArgs, BuildOutcome, BuildReport, Driver, FailurePolicy, Phase,
    ProjectFailure, ERROR_FILE, TEST_NAME_MARKER,
};
