//! Attempt tracking and import status watching

mod attempt;
mod import;

pub use attempt::{AttemptCounter, AttemptToken};
pub use import::{poll_import_status, ImportWatcher, WatchOptions, WatchOutcome};
