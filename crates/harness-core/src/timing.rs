//! Settle delay applied after every driven clock edge.

use std::hint;
use std::thread;
use std::time::Duration;

/// Default busy-wait length after each clock edge, in spin iterations.
pub const DEFAULT_SETTLE_SPINS: u32 = 5;

/// How long to hold a driven edge before touching the bus again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SettleDelay {
    /// Busy-wait for a fixed number of spin iterations.
    Spin(u32),
    /// Block the calling thread for a wall-clock duration.
    Sleep(Duration),
}

impl Default for SettleDelay {
    fn default() -> Self {
        Self::Spin(DEFAULT_SETTLE_SPINS)
    }
}

impl SettleDelay {
    /// No delay at all; used by tests and scripted runs.
    pub const NONE: Self = Self::Spin(0);

    /// Holds for the configured delay. Not cancellable.
    pub fn wait(self) {
        match self {
            Self::Spin(spins) => {
                for _ in 0..spins {
                    hint::spin_loop();
                }
            }
            Self::Sleep(duration) => {
                if !duration.is_zero() {
                    thread::sleep(duration);
                }
            }
        }
    }

    /// Returns `true` when [`Self::wait`] returns immediately.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        match self {
            Self::Spin(spins) => spins == 0,
            Self::Sleep(duration) => duration.is_zero(),
        }
    }
}
