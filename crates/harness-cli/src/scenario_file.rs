//! JSON scenario files: memory preloads, a requester script and an optional
//! expected outcome.
//!
//! ```json
//! {
//!   "settle_spins": 0,
//!   "rom": [{ "offset": 0, "words": ["0x00000073"] }],
//!   "transactions": [{ "idle": 2 }, { "address": 1024, "begin": true }],
//!   "expect": { "pass": 1024 }
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use harness_core::{
    BusTransaction, ByteMask, Harness, HarnessConfig, HarnessStats, ScriptedPort, SettleDelay,
    TestOutcome, CONTROL_BYTE_MASK_FIELD, CONTROL_BYTE_MASK_SHIFT, DEFAULT_RESET_HALF_CYCLES,
};
use serde::Deserialize;

/// 32-bit word written either as a JSON number or as a `0x`-prefixed hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "WordRepr")]
pub struct Word(pub u32);

#[derive(Deserialize)]
#[serde(untagged)]
enum WordRepr {
    Number(u32),
    Text(String),
}

impl TryFrom<WordRepr> for Word {
    type Error = String;

    fn try_from(repr: WordRepr) -> Result<Self, Self::Error> {
        match repr {
            WordRepr::Number(value) => Ok(Self(value)),
            WordRepr::Text(text) => {
                let digits = text
                    .strip_prefix("0x")
                    .or_else(|| text.strip_prefix("0X"))
                    .unwrap_or(&text)
                    .replace('_', "");
                u32::from_str_radix(&digits, 16)
                    .map(Self)
                    .map_err(|err| format!("invalid hex word `{text}`: {err}"))
            }
        }
    }
}

/// Contiguous words preloaded from word slot `offset`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preload {
    /// First word slot.
    pub offset: u32,
    /// Words in slot order.
    pub words: Vec<Word>,
}

/// A run of cycles on which the requester drives nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdleCycles {
    /// Number of idle cycles.
    pub idle: usize,
}

/// One entry of the requester script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "StepRepr")]
pub enum ScriptStep {
    /// Idle cycles.
    Idle(IdleCycles),
    /// One sampled transaction.
    Transaction(BusTransaction),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StepRepr {
    Idle(IdleCycles),
    Transaction(TransactionEntry),
}

/// Script form of a transaction; unknown keys are rejected.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TransactionEntry {
    address: Word,
    #[serde(default)]
    write_data: Word,
    #[serde(default)]
    begin: bool,
    #[serde(default)]
    write_enable: bool,
    #[serde(default)]
    byte_mask: u8,
}

const BYTE_MASK_LIMIT: u32 = CONTROL_BYTE_MASK_FIELD >> CONTROL_BYTE_MASK_SHIFT;

impl TryFrom<StepRepr> for ScriptStep {
    type Error = String;

    fn try_from(repr: StepRepr) -> Result<Self, Self::Error> {
        let entry = match repr {
            StepRepr::Idle(idle) => return Ok(Self::Idle(idle)),
            StepRepr::Transaction(entry) => entry,
        };
        if u32::from(entry.byte_mask) > BYTE_MASK_LIMIT {
            return Err(format!(
                "byte_mask {:#x} at address {:#010x} has lanes beyond the four bus bytes",
                entry.byte_mask, entry.address.0
            ));
        }
        Ok(Self::Transaction(BusTransaction {
            address: entry.address.0,
            write_data: entry.write_data.0,
            begin: entry.begin,
            write_enable: entry.write_enable,
            byte_mask: ByteMask::new(entry.byte_mask),
        }))
    }
}

/// Parsed scenario file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Busy-wait spins after each clock edge; defaults to the core default.
    #[serde(default)]
    pub settle_spins: Option<u32>,
    /// Clock toggles issued while releasing reset.
    #[serde(default)]
    pub reset_half_cycles: Option<u32>,
    /// ROM preloads.
    #[serde(default)]
    pub rom: Vec<Preload>,
    /// RAM preloads.
    #[serde(default)]
    pub ram: Vec<Preload>,
    /// Requester script, one entry per sampled cycle (idle runs expand).
    #[serde(default)]
    pub transactions: Vec<ScriptStep>,
    /// Outcome the scenario is expected to report.
    #[serde(default)]
    pub expect: Option<TestOutcome>,
}

/// Result of running a scenario to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Reported outcome.
    pub outcome: TestOutcome,
    /// Counters at termination.
    pub stats: HarnessStats,
}

impl Scenario {
    /// Parses a scenario from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not a valid scenario.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid scenario JSON")
    }

    /// Reads and parses a scenario file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read scenario `{}`", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("could not parse scenario `{}`", path.display()))
    }

    /// Harness configuration with `settle_spins` applied over the file's value.
    #[must_use]
    pub fn config(&self, settle_spins: Option<u32>) -> HarnessConfig {
        let defaults = HarnessConfig::default();
        HarnessConfig {
            settle: settle_spins
                .or(self.settle_spins)
                .map_or(defaults.settle, SettleDelay::Spin),
            reset_half_cycles: self.reset_half_cycles.unwrap_or(DEFAULT_RESET_HALF_CYCLES),
        }
    }

    /// Builds a harness with every preload applied.
    ///
    /// # Errors
    ///
    /// Returns an error when a preload does not fit its window.
    pub fn build_harness(&self, config: HarnessConfig) -> Result<Harness> {
        let mut harness = Harness::new(config);
        for preload in &self.rom {
            harness
                .load_rom(preload.offset, &words(preload))
                .context("ROM preload rejected")?;
        }
        for preload in &self.ram {
            harness
                .load_ram(preload.offset, &words(preload))
                .context("RAM preload rejected")?;
        }
        Ok(harness)
    }

    /// Builds the scripted requester for this scenario.
    #[must_use]
    pub fn build_port(&self) -> ScriptedPort {
        let mut port = ScriptedPort::new();
        for step in &self.transactions {
            match *step {
                ScriptStep::Idle(IdleCycles { idle }) => port.push_idle(idle),
                ScriptStep::Transaction(transaction) => port.push(transaction),
            }
        }
        port
    }

    /// Boots and runs the scenario until a sentinel fetch.
    ///
    /// # Errors
    ///
    /// Returns an error when a preload is rejected, the harness fails, or the
    /// outcome differs from `expect`.
    pub fn run(&self, settle_spins: Option<u32>) -> Result<RunReport> {
        let mut harness = self.build_harness(self.config(settle_spins))?;
        let mut port = self.build_port();
        let outcome = harness.run(&mut port).context("harness run failed")?;

        if let Some(expected) = self.expect {
            anyhow::ensure!(
                expected == outcome,
                "scenario expected {expected} but the harness reported {outcome}"
            );
        }

        Ok(RunReport {
            outcome,
            stats: *harness.stats(),
        })
    }
}

fn words(preload: &Preload) -> Vec<u32> {
    preload.words.iter().map(|word| word.0).collect()
}
