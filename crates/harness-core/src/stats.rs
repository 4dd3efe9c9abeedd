//! Saturating run counters exposed to hosts.

use crate::Access;

/// Per-run counters. Every field saturates instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct HarnessStats {
    /// Full clock periods driven by the run loop.
    pub cycles: u64,
    /// Sampled cycles with `begin` set.
    pub transactions: u64,
    /// ROM fetches served.
    pub rom_fetches: u64,
    /// RAM reads served.
    pub ram_reads: u64,
    /// RAM masked writes applied.
    pub ram_writes: u64,
    /// Transactions outside both windows.
    pub unmapped: u64,
}

impl HarnessStats {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one full clock period.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_cycle(&mut self) {
        self.cycles = self.cycles.saturating_add(1);
    }

    /// Counts one active transaction by the access it produced.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_access(&mut self, access: Access) {
        self.transactions = self.transactions.saturating_add(1);
        let counter = match access {
            Access::RomFetch => &mut self.rom_fetches,
            Access::RamRead => &mut self.ram_reads,
            Access::RamWrite { .. } => &mut self.ram_writes,
            Access::Unmapped => &mut self.unmapped,
        };
        *counter = counter.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::HarnessStats;
    use crate::Access;

    #[test]
    fn accesses_are_counted_by_kind() {
        let mut stats = HarnessStats::new();
        stats.record_cycle();
        stats.record_access(Access::RomFetch);
        stats.record_access(Access::RamWrite { merged: 7 });
        stats.record_access(Access::RamRead);
        stats.record_access(Access::Unmapped);
        stats.record_access(Access::RomFetch);

        assert_eq!(
            stats,
            HarnessStats {
                cycles: 1,
                transactions: 5,
                rom_fetches: 2,
                ram_reads: 1,
                ram_writes: 1,
                unmapped: 1,
            }
        );
    }

    #[test]
    fn counters_saturate() {
        let mut stats = HarnessStats {
            cycles: u64::MAX,
            transactions: u64::MAX,
            unmapped: u64::MAX,
            ..HarnessStats::default()
        };
        stats.record_cycle();
        stats.record_access(Access::Unmapped);
        assert_eq!(stats.cycles, u64::MAX);
        assert_eq!(stats.transactions, u64::MAX);
        assert_eq!(stats.unmapped, u64::MAX);
    }
}
