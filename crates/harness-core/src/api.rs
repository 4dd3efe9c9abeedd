//! Host-facing configuration, step results and error types.

use thiserror::Error;

use crate::{Access, PortError, Region, SettleDelay, TestOutcome, DEFAULT_RESET_HALF_CYCLES};

/// Configuration for a harness instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HarnessConfig {
    /// Delay held after every driven clock edge.
    pub settle: SettleDelay,
    /// Clock toggles issued while releasing reset during boot.
    pub reset_half_cycles: u32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            settle: SettleDelay::default(),
            reset_half_cycles: DEFAULT_RESET_HALF_CYCLES,
        }
    }
}

impl HarnessConfig {
    /// Configuration with no settle delay, for scripted requesters.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            settle: SettleDelay::NONE,
            reset_half_cycles: DEFAULT_RESET_HALF_CYCLES,
        }
    }
}

/// Run state of a harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HarnessState {
    /// Serving transactions.
    #[default]
    Running,
    /// ECALL fetched at the contained address.
    Passed(u32),
    /// EBREAK fetched at the contained address.
    Failed(u32),
}

impl HarnessState {
    /// Terminal outcome, if the harness has stopped.
    #[must_use]
    pub const fn outcome(self) -> Option<TestOutcome> {
        match self {
            Self::Running => None,
            Self::Passed(code) => Some(TestOutcome::Pass(code)),
            Self::Failed(code) => Some(TestOutcome::Fail(code)),
        }
    }
}

impl From<TestOutcome> for HarnessState {
    fn from(outcome: TestOutcome) -> Self {
        match outcome {
            TestOutcome::Pass(code) => Self::Passed(code),
            TestOutcome::Fail(code) => Self::Failed(code),
        }
    }
}

/// Result of one harness iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StepOutcome {
    /// `begin` was low; transaction-end was driven low.
    Idle,
    /// An active transaction was served and its response published.
    Responded {
        /// Region the address decoded to.
        region: Region,
        /// Access performed.
        access: Access,
        /// Published response data.
        data_out: u32,
    },
    /// A sentinel was fetched; the outcome was reported and the harness stopped.
    Terminated(TestOutcome),
}

/// Harness malfunction. Pass and fail are outcomes, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum HarnessError {
    /// The sideband port failed.
    #[error("sideband port failure")]
    Port(#[from] PortError),
    /// The harness already reported an outcome.
    #[error("harness already terminated with {0}")]
    AlreadyTerminated(TestOutcome),
}
