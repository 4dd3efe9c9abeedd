//! Scripted requester: an in-memory [`SidebandPort`] for scenarios and tests.

use std::collections::VecDeque;

use crate::{BusTransaction, PortError, SidebandInputs, SidebandPort};

/// One output-register write observed on a [`ScriptedPort`], in bus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortWrite {
    /// Clock/reset register write.
    ClockControl(u32),
    /// Response data published for the requester.
    ResponseData(u32),
    /// Transaction-end line level.
    TransactionEnd(bool),
    /// Outcome tag and code.
    Status {
        /// Tag byte.
        tag: u8,
        /// Associated code.
        code: u32,
    },
}

/// Requester that presents one queued input snapshot per sampled cycle and
/// records every write the harness makes.
///
/// Once the queue is empty, [`SidebandPort::sample`] fails with
/// [`PortError::ScriptExhausted`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedPort {
    script: VecDeque<SidebandInputs>,
    clock_control: u32,
    sampled: u64,
    writes: Vec<PortWrite>,
}

impl ScriptedPort {
    /// Creates a port with an empty script and a zeroed clock/control register.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a port that will present `transactions` in order.
    #[must_use]
    pub fn from_transactions(transactions: impl IntoIterator<Item = BusTransaction>) -> Self {
        let mut port = Self::new();
        port.extend(transactions);
        port
    }

    /// Presets the clock/control register, e.g. to check lower bits survive.
    #[must_use]
    pub fn with_clock_control(mut self, value: u32) -> Self {
        self.clock_control = value;
        self
    }

    /// Queues one transaction.
    pub fn push(&mut self, transaction: BusTransaction) {
        self.script.push_back(transaction.inputs());
    }

    /// Queues a raw register snapshot, including bits outside the defined fields.
    pub fn push_inputs(&mut self, inputs: SidebandInputs) {
        self.script.push_back(inputs);
    }

    /// Queues `cycles` idle cycles.
    pub fn push_idle(&mut self, cycles: usize) {
        for _ in 0..cycles {
            self.push(BusTransaction::idle());
        }
    }

    /// Queues every transaction from `transactions`.
    pub fn extend(&mut self, transactions: impl IntoIterator<Item = BusTransaction>) {
        for transaction in transactions {
            self.push(transaction);
        }
    }

    /// Number of queued snapshots not yet sampled.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Number of snapshots sampled so far.
    #[must_use]
    pub const fn sampled_cycles(&self) -> u64 {
        self.sampled
    }

    /// Current clock/control register value.
    #[must_use]
    pub const fn clock_control(&self) -> u32 {
        self.clock_control
    }

    /// Every output write in the order the harness made it.
    #[must_use]
    pub fn writes(&self) -> &[PortWrite] {
        &self.writes
    }

    /// Values written to the clock/control register.
    #[must_use]
    pub fn clock_writes(&self) -> Vec<u32> {
        self.writes
            .iter()
            .filter_map(|write| match write {
                PortWrite::ClockControl(value) => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Response data values published to the requester.
    #[must_use]
    pub fn responses(&self) -> Vec<u32> {
        self.writes
            .iter()
            .filter_map(|write| match write {
                PortWrite::ResponseData(value) => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Transaction-end levels in the order they were driven.
    #[must_use]
    pub fn transaction_end_levels(&self) -> Vec<bool> {
        self.writes
            .iter()
            .filter_map(|write| match write {
                PortWrite::TransactionEnd(level) => Some(*level),
                _ => None,
            })
            .collect()
    }

    /// Outcome tag/code pairs in the order they were written.
    #[must_use]
    pub fn status_writes(&self) -> Vec<(u8, u32)> {
        self.writes
            .iter()
            .filter_map(|write| match write {
                PortWrite::Status { tag, code } => Some((*tag, *code)),
                _ => None,
            })
            .collect()
    }

    /// Most recent outcome tag/code pair.
    #[must_use]
    pub fn last_status(&self) -> Option<(u8, u32)> {
        self.status_writes().last().copied()
    }
}

impl SidebandPort for ScriptedPort {
    fn sample(&mut self) -> Result<SidebandInputs, PortError> {
        let inputs = self.script.pop_front().ok_or(PortError::ScriptExhausted {
            cycle: self.sampled,
        })?;
        self.sampled += 1;
        Ok(inputs)
    }

    fn read_clock_control(&mut self) -> Result<u32, PortError> {
        Ok(self.clock_control)
    }

    fn write_clock_control(&mut self, value: u32) -> Result<(), PortError> {
        self.clock_control = value;
        self.writes.push(PortWrite::ClockControl(value));
        Ok(())
    }

    fn write_response_data(&mut self, value: u32) -> Result<(), PortError> {
        self.writes.push(PortWrite::ResponseData(value));
        Ok(())
    }

    fn write_transaction_end(&mut self, asserted: bool) -> Result<(), PortError> {
        self.writes.push(PortWrite::TransactionEnd(asserted));
        Ok(())
    }

    fn write_status(&mut self, tag: u8, code: u32) -> Result<(), PortError> {
        self.writes.push(PortWrite::Status { tag, code });
        Ok(())
    }
}
