//! Bus-responder core for the logic-analyzer CPU test harness.
//!
//! The harness clocks a device under test, samples one bus transaction per
//! cycle from the sideband registers, serves it from a fixed ROM/RAM map and
//! stops when the device fetches a pass or fail sentinel.

/// Fixed memory windows, backing stores and masked-write merge.
pub mod memory;
pub use memory::{
    decode_region, merge_byte_lanes, LoadError, MemoryRegion, Region, RegionWindow, RAM_BASE,
    RAM_SIZE, RAM_WINDOW, ROM_BASE, ROM_SIZE, ROM_WINDOW,
};

/// Bus transaction decoding from the sideband input registers.
pub mod bus;
pub use bus::{
    BusTransaction, ByteMask, SidebandInputs, BYTE_LANES, CONTROL_BEGIN_BIT,
    CONTROL_BYTE_MASK_FIELD, CONTROL_BYTE_MASK_SHIFT, CONTROL_WRITE_ENABLE_BIT,
};

/// Sideband register port contract and transport errors.
pub mod port;
pub use port::{PortError, SidebandField, SidebandPort};

/// Settle delay after driven clock edges.
pub mod timing;
pub use timing::{SettleDelay, DEFAULT_SETTLE_SPINS};

/// Clock and reset line generation.
pub mod clock;
pub use clock::{
    ClockGenerator, CLOCK_CONTROL_FIELD, CLOCK_LINE_BIT, DEFAULT_RESET_HALF_CYCLES,
    RESET_LINE_BIT,
};

/// ROM/RAM memory responder.
pub mod responder;
pub use responder::{Access, MemoryResponder, Response};

/// Sentinel detection and outcome reporting.
pub mod outcome;
pub use outcome::{detect_termination, StatusTag, TestOutcome, EBREAK, ECALL};

/// Saturating run counters.
pub mod stats;
pub use stats::HarnessStats;

/// Host-facing configuration, step results and errors.
pub mod api;
pub use api::{HarnessConfig, HarnessError, HarnessState, StepOutcome};

/// Harness run loop.
pub mod harness;
pub use harness::Harness;

/// In-memory scripted requester port.
pub mod script;
pub use script::{PortWrite, ScriptedPort};

/// Built-in `addi` demo scenario.
pub mod scenario;
pub use scenario::{addi_fetch_script, addi_harness, load_addi_rom, BranchPath, ADDI_ROM_IMAGE};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
