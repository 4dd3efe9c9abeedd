//! Termination detection and outcome reporting.

use std::fmt;

use crate::{PortError, Region, SidebandPort};

/// Breakpoint sentinel; fetching it from ROM fails the test.
pub const EBREAK: u32 = 0x0010_0073;
/// Environment-call sentinel; fetching it from ROM passes the test.
pub const ECALL: u32 = 0x0000_0073;

/// Tag byte written to the status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum StatusTag {
    /// Harness started; code is zero.
    Started = 0x18,
    /// ECALL fetched.
    Pass = 0x19,
    /// EBREAK fetched.
    Fail = 0x1A,
}

impl StatusTag {
    /// Raw tag byte.
    #[must_use]
    pub const fn byte(self) -> u8 {
        self as u8
    }
}

/// Terminal result of a harness run. Both variants are successful completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TestOutcome {
    /// ECALL was fetched at the contained address.
    Pass(u32),
    /// EBREAK was fetched at the contained address.
    Fail(u32),
}

impl TestOutcome {
    /// Fetch address that terminated the run.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Pass(code) | Self::Fail(code) => code,
        }
    }

    /// Status tag reported for this outcome.
    #[must_use]
    pub const fn tag(self) -> StatusTag {
        match self {
            Self::Pass(_) => StatusTag::Pass,
            Self::Fail(_) => StatusTag::Fail,
        }
    }

    /// Returns `true` for [`TestOutcome::Pass`].
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass(_))
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass(code) => write!(f, "pass at {code:#010x}"),
            Self::Fail(code) => write!(f, "fail at {code:#010x}"),
        }
    }
}

/// Checks a response for a sentinel fetch. Only ROM fetches can terminate.
#[must_use]
pub const fn detect_termination(region: Region, data_out: u32, address: u32) -> Option<TestOutcome> {
    if !matches!(region, Region::Rom) {
        return None;
    }
    match data_out {
        EBREAK => Some(TestOutcome::Fail(address)),
        ECALL => Some(TestOutcome::Pass(address)),
        _ => None,
    }
}

/// Writes the start tag with a zero code.
///
/// # Errors
///
/// Propagates [`PortError`] from the status write.
pub fn report_started<P: SidebandPort + ?Sized>(port: &mut P) -> Result<(), PortError> {
    port.write_status(StatusTag::Started.byte(), 0)
}

/// Writes the outcome tag and its code.
///
/// # Errors
///
/// Propagates [`PortError`] from the status write.
pub fn report_outcome<P: SidebandPort + ?Sized>(
    port: &mut P,
    outcome: TestOutcome,
) -> Result<(), PortError> {
    port.write_status(outcome.tag().byte(), outcome.code())
}

#[cfg(test)]
mod tests {
    use super::{
        detect_termination, report_outcome, report_started, StatusTag, TestOutcome, EBREAK, ECALL,
    };
    use crate::{Region, ScriptedPort};

    #[test]
    fn sentinels_terminate_only_from_rom() {
        assert_eq!(
            detect_termination(Region::Rom, EBREAK, 0x410),
            Some(TestOutcome::Fail(0x410))
        );
        assert_eq!(
            detect_termination(Region::Rom, ECALL, 0x418),
            Some(TestOutcome::Pass(0x418))
        );
        assert_eq!(detect_termination(Region::Rom, 0x0210_0093, 0x400), None);
        assert_eq!(detect_termination(Region::Ram, EBREAK, 0x800), None);
        assert_eq!(detect_termination(Region::Unmapped, ECALL, 0x0), None);
    }

    #[test]
    fn tags_match_the_wire_values() {
        assert_eq!(StatusTag::Started.byte(), 0x18);
        assert_eq!(TestOutcome::Pass(1).tag().byte(), 0x19);
        assert_eq!(TestOutcome::Fail(1).tag().byte(), 0x1A);
    }

    #[test]
    fn outcome_display_names_the_address() {
        assert_eq!(TestOutcome::Pass(0x418).to_string(), "pass at 0x00000418");
        assert_eq!(TestOutcome::Fail(0x410).to_string(), "fail at 0x00000410");
    }

    #[test]
    fn reporter_writes_tag_and_code() {
        let mut port = ScriptedPort::new();
        report_started(&mut port).expect("scripted port never fails");
        report_outcome(&mut port, TestOutcome::Fail(0x410)).expect("scripted port never fails");
        assert_eq!(port.status_writes(), vec![(0x18, 0), (0x1A, 0x410)]);
    }
}
