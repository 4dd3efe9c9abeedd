//! Clock and reset generation on the top two bits of the clock/control register.

use tracing::trace;

use crate::{PortError, SettleDelay, SidebandPort};

/// Clock line of the device under test (bit 31).
pub const CLOCK_LINE_BIT: u32 = 1 << 31;
/// Reset line of the device under test (bit 30).
pub const RESET_LINE_BIT: u32 = 1 << 30;
/// Bits of the clock/control register owned by the clock generator.
pub const CLOCK_CONTROL_FIELD: u32 = CLOCK_LINE_BIT | RESET_LINE_BIT;
/// Default number of clock toggles issued while releasing reset.
pub const DEFAULT_RESET_HALF_CYCLES: u32 = 11;

/// Drives the clock and reset lines. Every other bit of the register is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockGenerator {
    level: bool,
    settle: SettleDelay,
    cycles: u64,
}

impl ClockGenerator {
    /// Creates a generator with the clock line considered low.
    #[must_use]
    pub const fn new(settle: SettleDelay) -> Self {
        Self {
            level: false,
            settle,
            cycles: 0,
        }
    }

    /// Last level driven onto the clock line.
    #[must_use]
    pub const fn level(&self) -> bool {
        self.level
    }

    /// Number of full clock periods driven by [`Self::full_cycle`].
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Drives one full clock period: high, settle, low, settle. Reset stays low.
    ///
    /// # Errors
    ///
    /// Propagates [`PortError`] from the clock/control register access.
    pub fn full_cycle<P: SidebandPort + ?Sized>(&mut self, port: &mut P) -> Result<(), PortError> {
        self.drive(port, true, false)?;
        self.settle.wait();
        self.drive(port, false, false)?;
        self.settle.wait();
        self.cycles = self.cycles.saturating_add(1);
        Ok(())
    }

    /// Holds clock and reset high for one settle delay, then toggles the clock
    /// `half_cycles` times with reset released.
    ///
    /// # Errors
    ///
    /// Propagates [`PortError`] from the clock/control register access.
    pub fn reset_sequence<P: SidebandPort + ?Sized>(
        &mut self,
        port: &mut P,
        half_cycles: u32,
    ) -> Result<(), PortError> {
        self.drive(port, true, true)?;
        self.settle.wait();
        for _ in 0..half_cycles {
            let next = !self.level;
            self.drive(port, next, false)?;
            self.settle.wait();
        }
        Ok(())
    }

    fn drive<P: SidebandPort + ?Sized>(
        &mut self,
        port: &mut P,
        clock: bool,
        reset: bool,
    ) -> Result<(), PortError> {
        let mut lines = 0;
        if clock {
            lines |= CLOCK_LINE_BIT;
        }
        if reset {
            lines |= RESET_LINE_BIT;
        }

        let current = port.read_clock_control()?;
        let value = (current & !CLOCK_CONTROL_FIELD) | lines;
        port.write_clock_control(value)?;
        self.level = clock;
        trace!(clock, reset, register = value, "clock edge");
        Ok(())
    }
}
