//! Register-level contract between the harness core and the sideband bus.

use std::fmt;

use thiserror::Error;

use crate::SidebandInputs;

/// Named fields of the sideband register interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SidebandField {
    /// Address input register.
    Address,
    /// Write-data input register.
    WriteData,
    /// Control input register (begin, write-enable, byte mask).
    Control,
    /// Clock/reset output register.
    ClockControl,
    /// Response data output register.
    ResponseData,
    /// Transaction-end output line.
    TransactionEnd,
    /// Outcome tag and code output pair.
    Status,
}

impl fmt::Display for SidebandField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Address => "address",
            Self::WriteData => "write-data",
            Self::Control => "control",
            Self::ClockControl => "clock-control",
            Self::ResponseData => "response-data",
            Self::TransactionEnd => "transaction-end",
            Self::Status => "status",
        };
        f.write_str(name)
    }
}

/// Transport failure reported by a [`SidebandPort`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PortError {
    /// The port could not read an input register.
    #[error("failed to read the {0} register")]
    ReadFailed(SidebandField),
    /// The port could not drive an output register.
    #[error("failed to write the {0} register")]
    WriteFailed(SidebandField),
    /// A scripted requester ran out of transactions before a sentinel fetch.
    #[error("requester script exhausted after {cycle} sampled cycles")]
    ScriptExhausted {
        /// Number of cycles sampled before the script ran dry.
        cycle: u64,
    },
}

/// Memory-mapped sideband register interface driven by the harness.
///
/// The harness is the only writer of the output registers; the requester is the
/// only writer of the input registers.
pub trait SidebandPort {
    /// Latches the three input registers for the current cycle.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the inputs cannot be read.
    fn sample(&mut self) -> Result<SidebandInputs, PortError>;

    /// Reads back the current clock/reset output register.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::ReadFailed`] when the register cannot be read.
    fn read_clock_control(&mut self) -> Result<u32, PortError>;

    /// Drives the clock/reset output register.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::WriteFailed`] when the register cannot be written.
    fn write_clock_control(&mut self, value: u32) -> Result<(), PortError>;

    /// Publishes response data for the requester.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::WriteFailed`] when the register cannot be written.
    fn write_response_data(&mut self, value: u32) -> Result<(), PortError>;

    /// Drives the transaction-end line.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::WriteFailed`] when the line cannot be driven.
    fn write_transaction_end(&mut self, asserted: bool) -> Result<(), PortError>;

    /// Writes the outcome tag byte and its 32-bit code.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::WriteFailed`] when the status pair cannot be written.
    fn write_status(&mut self, tag: u8, code: u32) -> Result<(), PortError>;
}

#[cfg(test)]
mod tests {
    use super::{PortError, SidebandField};

    #[test]
    fn port_errors_name_the_failing_register() {
        assert_eq!(
            PortError::ReadFailed(SidebandField::Control).to_string(),
            "failed to read the control register"
        );
        assert_eq!(
            PortError::WriteFailed(SidebandField::TransactionEnd).to_string(),
            "failed to write the transaction-end register"
        );
        assert_eq!(
            PortError::ScriptExhausted { cycle: 3 }.to_string(),
            "requester script exhausted after 3 sampled cycles"
        );
    }
}
