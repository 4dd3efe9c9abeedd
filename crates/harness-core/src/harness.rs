//! The harness run loop: clock, sample, respond, detect, report.

use tracing::{debug, info, trace, warn};

use crate::outcome::{detect_termination, report_outcome, report_started};
use crate::{
    Access, BusTransaction, ClockGenerator, HarnessConfig, HarnessError, HarnessState,
    HarnessStats, LoadError, MemoryRegion, MemoryResponder, SidebandPort, StepOutcome,
    TestOutcome,
};

/// Bus-responder harness. Owns the backing stores; borrows the port per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Harness {
    config: HarnessConfig,
    clock: ClockGenerator,
    responder: MemoryResponder,
    state: HarnessState,
    stats: HarnessStats,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(HarnessConfig::default())
    }
}

impl Harness {
    /// Creates a harness with zeroed ROM, RAM and response latch.
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            clock: ClockGenerator::new(config.settle),
            responder: MemoryResponder::new(),
            state: HarnessState::Running,
            stats: HarnessStats::new(),
        }
    }

    /// Preloads ROM words starting at word slot `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the words do not fit the ROM window.
    pub fn load_rom(&mut self, offset: u32, words: &[u32]) -> Result<(), LoadError> {
        self.responder.rom_mut().load(offset, words)
    }

    /// Preloads RAM words starting at word slot `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the words do not fit the RAM window.
    pub fn load_ram(&mut self, offset: u32, words: &[u32]) -> Result<(), LoadError> {
        self.responder.ram_mut().load(offset, words)
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Instruction ROM contents.
    #[must_use]
    pub const fn rom(&self) -> &MemoryRegion {
        self.responder.rom()
    }

    /// Data RAM contents.
    #[must_use]
    pub const fn ram(&self) -> &MemoryRegion {
        self.responder.ram()
    }

    /// Current run state.
    #[must_use]
    pub const fn state(&self) -> HarnessState {
        self.state
    }

    /// Run counters.
    #[must_use]
    pub const fn stats(&self) -> &HarnessStats {
        &self.stats
    }

    /// Current response data latch.
    #[must_use]
    pub const fn data_out(&self) -> u32 {
        self.responder.data_out()
    }

    /// Reports the start tag, then drives the reset sequence.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Port`] on a transport failure.
    pub fn boot<P: SidebandPort + ?Sized>(&mut self, port: &mut P) -> Result<(), HarnessError> {
        report_started(port)?;
        self.clock
            .reset_sequence(port, self.config.reset_half_cycles)?;
        info!(
            reset_half_cycles = self.config.reset_half_cycles,
            "harness started"
        );
        Ok(())
    }

    /// Runs exactly one clock cycle and serves the sampled transaction.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::AlreadyTerminated`] after an outcome was
    /// reported, or [`HarnessError::Port`] on a transport failure.
    pub fn step<P: SidebandPort + ?Sized>(
        &mut self,
        port: &mut P,
    ) -> Result<StepOutcome, HarnessError> {
        if let Some(outcome) = self.state.outcome() {
            return Err(HarnessError::AlreadyTerminated(outcome));
        }

        self.clock.full_cycle(port)?;
        self.stats.record_cycle();

        let transaction = BusTransaction::decode(port.sample()?);
        let Some(response) = self.responder.respond(&transaction) else {
            port.write_transaction_end(false)?;
            return Ok(StepOutcome::Idle);
        };

        self.stats.record_access(response.access);
        debug!(
            address = transaction.address,
            region = %response.region,
            write = transaction.write_enable,
            "transaction"
        );
        if response.access == Access::Unmapped {
            warn!(address = transaction.address, "unmapped transaction");
        }

        if let Some(outcome) =
            detect_termination(response.region, response.data_out, transaction.address)
        {
            self.terminate(port, outcome)?;
            return Ok(StepOutcome::Terminated(outcome));
        }

        port.write_response_data(response.data_out)?;
        port.write_transaction_end(response.transaction_end)?;
        trace!(data_out = response.data_out, "response published");

        Ok(StepOutcome::Responded {
            region: response.region,
            access: response.access,
            data_out: response.data_out,
        })
    }

    /// Steps until a sentinel fetch terminates the run. No timeout.
    ///
    /// # Errors
    ///
    /// Propagates the first [`HarnessError`] from [`Self::step`].
    pub fn run_loop<P: SidebandPort + ?Sized>(
        &mut self,
        port: &mut P,
    ) -> Result<TestOutcome, HarnessError> {
        loop {
            if let StepOutcome::Terminated(outcome) = self.step(port)? {
                return Ok(outcome);
            }
        }
    }

    /// Boots the device under test, then runs until termination.
    ///
    /// # Errors
    ///
    /// Propagates the first [`HarnessError`] from boot or the run loop.
    pub fn run<P: SidebandPort + ?Sized>(
        &mut self,
        port: &mut P,
    ) -> Result<TestOutcome, HarnessError> {
        self.boot(port)?;
        self.run_loop(port)
    }

    fn terminate<P: SidebandPort + ?Sized>(
        &mut self,
        port: &mut P,
        outcome: TestOutcome,
    ) -> Result<(), HarnessError> {
        report_outcome(port, outcome)?;
        self.state = HarnessState::from(outcome);
        info!(
            tag = outcome.tag().byte(),
            code = outcome.code(),
            cycles = self.stats.cycles,
            "harness terminated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Harness;
    use crate::{
        BusTransaction, ByteMask, HarnessConfig, HarnessError, HarnessState, PortWrite,
        ScriptedPort, StepOutcome, TestOutcome, CLOCK_LINE_BIT, EBREAK, ECALL, RAM_BASE,
        ROM_BASE,
    };

    fn harness() -> Harness {
        Harness::new(HarnessConfig::immediate())
    }

    #[test]
    fn idle_cycle_drives_transaction_end_low() {
        let mut harness = harness();
        let mut port = ScriptedPort::new();
        port.push_idle(1);

        assert_eq!(harness.step(&mut port), Ok(StepOutcome::Idle));
        assert_eq!(
            port.writes(),
            &[
                PortWrite::ClockControl(CLOCK_LINE_BIT),
                PortWrite::ClockControl(0),
                PortWrite::TransactionEnd(false),
            ]
        );
        assert_eq!(harness.stats().cycles, 1);
        assert_eq!(harness.stats().transactions, 0);
    }

    #[test]
    fn rom_fetch_publishes_data_then_transaction_end() {
        let mut harness = harness();
        harness.load_rom(4, &[0x0210_0f93]).expect("fits");
        let mut port = ScriptedPort::from_transactions([BusTransaction::read(ROM_BASE + 4)]);

        let step = harness.step(&mut port).expect("scripted port never fails");

        assert!(matches!(
            step,
            StepOutcome::Responded {
                data_out: 0x0210_0f93,
                ..
            }
        ));
        assert_eq!(
            &port.writes()[2..],
            &[
                PortWrite::ResponseData(0x0210_0f93),
                PortWrite::TransactionEnd(true),
            ]
        );
    }

    #[test]
    fn sentinel_fetch_reports_without_publishing() {
        let mut harness = harness();
        harness.load_rom(16, &[EBREAK]).expect("fits");
        let mut port = ScriptedPort::from_transactions([BusTransaction::read(ROM_BASE + 16)]);

        let step = harness.step(&mut port).expect("scripted port never fails");

        assert_eq!(step, StepOutcome::Terminated(TestOutcome::Fail(0x410)));
        assert_eq!(harness.state(), HarnessState::Failed(0x410));
        assert!(port.responses().is_empty());
        assert!(port.transaction_end_levels().is_empty());
        assert_eq!(port.last_status(), Some((0x1A, 0x410)));
    }

    #[test]
    fn stepping_after_termination_is_an_error() {
        let mut harness = harness();
        harness.load_rom(0, &[ECALL]).expect("fits");
        let mut port = ScriptedPort::from_transactions([
            BusTransaction::read(ROM_BASE),
            BusTransaction::read(ROM_BASE),
        ]);

        assert_eq!(harness.run_loop(&mut port), Ok(TestOutcome::Pass(0x400)));
        assert_eq!(
            harness.step(&mut port),
            Err(HarnessError::AlreadyTerminated(TestOutcome::Pass(0x400)))
        );
        assert_eq!(port.remaining(), 1);
    }

    #[test]
    fn ram_write_publishes_the_unchanged_latch() {
        let mut harness = harness();
        harness.load_ram(0, &[0x1122_3344]).expect("fits");
        let mut port = ScriptedPort::from_transactions([
            BusTransaction::read(RAM_BASE),
            BusTransaction::write(RAM_BASE, 0xAABB_CCDD, ByteMask::new(0b1000)),
        ]);

        harness.step(&mut port).expect("scripted port never fails");
        harness.step(&mut port).expect("scripted port never fails");

        assert_eq!(port.responses(), vec![0x1122_3344, 0x1122_3344]);
        assert_eq!(harness.ram().read(RAM_BASE), Some(0xAA22_3344));
        assert_eq!(harness.data_out(), 0x1122_3344);
    }

    #[test]
    fn boot_reports_start_then_resets() {
        let mut harness = harness();
        let mut port = ScriptedPort::new();

        harness.boot(&mut port).expect("scripted port never fails");

        assert_eq!(port.writes()[0], PortWrite::Status { tag: 0x18, code: 0 });
        assert_eq!(port.clock_writes().len(), 12);
        assert_eq!(harness.state(), HarnessState::Running);
    }
}
