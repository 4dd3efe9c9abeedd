//! Command-line runner for the logic-analyzer CPU test harness.

use clap as _;
use harness_core::TestOutcome;
#[cfg(test)]
use tempfile as _;

/// Log subscriber setup.
pub mod logging;

/// JSON scenario files.
pub mod scenario_file;
pub use scenario_file::{RunReport, Scenario};

/// Process exit code for a passing run.
pub const EXIT_PASS: u8 = 0;
/// Process exit code for a failing run.
pub const EXIT_FAIL: u8 = 1;
/// Process exit code for harness, scenario or usage errors.
pub const EXIT_ERROR: u8 = 2;

/// Exit code reported for `outcome`.
#[must_use]
pub const fn exit_code(outcome: TestOutcome) -> u8 {
    if outcome.is_pass() {
        EXIT_PASS
    } else {
        EXIT_FAIL
    }
}
