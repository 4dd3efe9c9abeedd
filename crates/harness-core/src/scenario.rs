//! Built-in `addi` smoke scenario: a compare-and-branch program whose two
//! paths end on the fail and pass sentinels.
//!
//! ROM image, by word slot:
//!
//! | slot | word         | instruction            |
//! |------|--------------|------------------------|
//! | 0    | `0x02100093` | `addi x1, x0, 33`      |
//! | 4    | `0x02100f93` | `addi x31, x0, 33`     |
//! | 8    | `0x001f8463` | `beq x31, x1, +8`      |
//! | 12   | `0x00000f93` | `addi x31, x0, 0`      |
//! | 16   | `0x00100073` | `ebreak`               |
//! | 20   | `0x00000f93` | `addi x31, x0, 0`      |
//! | 24   | `0x00000073` | `ecall`                |

use crate::{
    BusTransaction, Harness, HarnessConfig, LoadError, TestOutcome, EBREAK, ECALL, ROM_BASE,
};

/// `(slot, word)` pairs of the `addi` ROM image.
pub const ADDI_ROM_IMAGE: [(u32, u32); 7] = [
    (0, 0x0210_0093),
    (4, 0x0210_0f93),
    (8, 0x001f_8463),
    (12, 0x0000_0f93),
    (16, EBREAK),
    (20, 0x0000_0f93),
    (24, ECALL),
];

const TAKEN_FETCHES: [u32; 4] = [ROM_BASE, ROM_BASE + 4, ROM_BASE + 8, ROM_BASE + 16];
const NOT_TAKEN_FETCHES: [u32; 6] = [
    ROM_BASE,
    ROM_BASE + 4,
    ROM_BASE + 8,
    ROM_BASE + 12,
    ROM_BASE + 20,
    ROM_BASE + 24,
];

/// Which way the requester takes the branch at slot 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BranchPath {
    /// Branch taken into the EBREAK slot.
    Taken,
    /// Branch falls through and skips to the ECALL slot.
    NotTaken,
}

impl BranchPath {
    /// Fetch addresses the requester issues on this path.
    #[must_use]
    pub const fn fetch_addresses(self) -> &'static [u32] {
        match self {
            Self::Taken => &TAKEN_FETCHES,
            Self::NotTaken => &NOT_TAKEN_FETCHES,
        }
    }

    /// Outcome the harness reports at the end of this path.
    #[must_use]
    pub const fn expected_outcome(self) -> TestOutcome {
        match self {
            Self::Taken => TestOutcome::Fail(ROM_BASE + 16),
            Self::NotTaken => TestOutcome::Pass(ROM_BASE + 24),
        }
    }
}

/// Writes the `addi` image into the harness ROM.
///
/// # Errors
///
/// Returns [`LoadError`] if the image does not fit the ROM window.
pub fn load_addi_rom(harness: &mut Harness) -> Result<(), LoadError> {
    for (slot, word) in ADDI_ROM_IMAGE {
        harness.load_rom(slot, &[word])?;
    }
    Ok(())
}

/// Builds a harness preloaded with the `addi` image.
///
/// # Errors
///
/// Returns [`LoadError`] if the image does not fit the ROM window.
pub fn addi_harness(config: HarnessConfig) -> Result<Harness, LoadError> {
    let mut harness = Harness::new(config);
    load_addi_rom(&mut harness)?;
    Ok(harness)
}

/// Fetch transactions for `path`.
#[must_use]
pub fn addi_fetch_script(path: BranchPath) -> Vec<BusTransaction> {
    path.fetch_addresses()
        .iter()
        .copied()
        .map(BusTransaction::read)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{addi_fetch_script, addi_harness, BranchPath, ADDI_ROM_IMAGE};
    use crate::{HarnessConfig, ScriptedPort, TestOutcome};

    #[test]
    fn image_lands_on_word_slots() {
        let harness = addi_harness(HarnessConfig::immediate()).expect("image fits");
        for (slot, word) in ADDI_ROM_IMAGE {
            assert_eq!(harness.rom().words()[slot as usize], word);
        }
        assert_eq!(harness.rom().words()[1], 0);
    }

    #[test]
    fn taken_branch_fails_at_the_ebreak_slot() {
        let mut harness = addi_harness(HarnessConfig::immediate()).expect("image fits");
        let mut port = ScriptedPort::from_transactions(addi_fetch_script(BranchPath::Taken));

        let outcome = harness.run(&mut port).expect("script reaches a sentinel");

        assert_eq!(outcome, TestOutcome::Fail(0x410));
        assert_eq!(outcome, BranchPath::Taken.expected_outcome());
        assert_eq!(port.remaining(), 0);
    }

    #[test]
    fn not_taken_branch_passes_at_the_ecall_slot() {
        let mut harness = addi_harness(HarnessConfig::immediate()).expect("image fits");
        let mut port = ScriptedPort::from_transactions(addi_fetch_script(BranchPath::NotTaken));

        let outcome = harness.run(&mut port).expect("script reaches a sentinel");

        assert_eq!(outcome, TestOutcome::Pass(0x418));
        assert_eq!(
            port.responses(),
            vec![0x0210_0093, 0x0210_0f93, 0x001f_8463, 0x0000_0f93, 0x0000_0f93]
        );
    }
}
