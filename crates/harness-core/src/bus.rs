//! Sideband bus sampling: raw input snapshot and decoded transaction fields.

/// `control` bit flagging an active transaction this cycle.
pub const CONTROL_BEGIN_BIT: u32 = 1 << 0;
/// `control` bit selecting a write instead of a read.
pub const CONTROL_WRITE_ENABLE_BIT: u32 = 1 << 1;
/// Shift of the 4-bit byte-lane write mask inside `control`.
pub const CONTROL_BYTE_MASK_SHIFT: u32 = 2;
/// Mask of the byte-lane write mask field inside `control` (bits 2..=5).
pub const CONTROL_BYTE_MASK_FIELD: u32 = 0xF << CONTROL_BYTE_MASK_SHIFT;

/// Number of byte lanes in one bus word.
pub const BYTE_LANES: u8 = 4;

/// Set of enabled byte lanes for a write; bit `n` selects bits `8n..8n+8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(from = "u8", into = "u8"))]
pub struct ByteMask(u8);

impl ByteMask {
    /// No lanes enabled.
    pub const NONE: Self = Self(0);
    /// All four lanes enabled.
    pub const ALL: Self = Self(0xF);

    /// Builds a mask from the low four bits of `bits`; higher bits are dropped.
    #[must_use]
    pub const fn new(bits: u8) -> Self {
        Self(bits & 0xF)
    }

    /// Returns the raw 4-bit lane set.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` when byte lane `lane` (0 = least significant) is enabled.
    #[must_use]
    pub const fn lane_enabled(self, lane: u8) -> bool {
        lane < BYTE_LANES && self.0 & (1 << lane) != 0
    }

    /// Expands the lane set into a 32-bit bit mask (`0b0011` -> `0x0000_FFFF`).
    #[must_use]
    pub const fn word_mask(self) -> u32 {
        let mut mask = 0;
        let mut lane = 0;
        while lane < BYTE_LANES {
            if self.lane_enabled(lane) {
                mask |= 0xFF << (lane as u32 * 8);
            }
            lane += 1;
        }
        mask
    }
}

impl From<u8> for ByteMask {
    fn from(bits: u8) -> Self {
        Self::new(bits)
    }
}

impl From<ByteMask> for u8 {
    fn from(mask: ByteMask) -> Self {
        mask.bits()
    }
}

/// Raw snapshot of the three sideband input registers for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SidebandInputs {
    /// Address lines.
    pub address: u32,
    /// Write-data lines.
    pub write_data: u32,
    /// Control lines (begin, write-enable, byte mask).
    pub control: u32,
}

/// One decoded bus transaction. Rebuilt every cycle; never carried over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BusTransaction {
    /// Sampled address.
    pub address: u32,
    /// Sampled write data.
    pub write_data: u32,
    /// Transaction is active this cycle.
    pub begin: bool,
    /// Transaction is a write.
    pub write_enable: bool,
    /// Enabled byte lanes for a write.
    pub byte_mask: ByteMask,
}

impl BusTransaction {
    /// A cycle on which the requester drives nothing.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            address: 0,
            write_data: 0,
            begin: false,
            write_enable: false,
            byte_mask: ByteMask::NONE,
        }
    }

    /// An active read (or instruction fetch) of `address`.
    #[must_use]
    pub const fn read(address: u32) -> Self {
        Self {
            address,
            write_data: 0,
            begin: true,
            write_enable: false,
            byte_mask: ByteMask::NONE,
        }
    }

    /// An active masked write of `write_data` to `address`.
    #[must_use]
    pub const fn write(address: u32, write_data: u32, byte_mask: ByteMask) -> Self {
        Self {
            address,
            write_data,
            begin: true,
            write_enable: true,
            byte_mask,
        }
    }

    /// Decodes the control field of a raw snapshot. No range checks are made.
    #[must_use]
    pub const fn decode(inputs: SidebandInputs) -> Self {
        let [control_low, ..] = inputs.control.to_le_bytes();
        Self {
            address: inputs.address,
            write_data: inputs.write_data,
            begin: inputs.control & CONTROL_BEGIN_BIT != 0,
            write_enable: inputs.control & CONTROL_WRITE_ENABLE_BIT != 0,
            byte_mask: ByteMask::new(control_low >> CONTROL_BYTE_MASK_SHIFT),
        }
    }

    /// Encodes the control fields back into a `control` register value.
    #[must_use]
    pub const fn control_word(self) -> u32 {
        let mut control = (self.byte_mask.bits() as u32) << CONTROL_BYTE_MASK_SHIFT;
        if self.begin {
            control |= CONTROL_BEGIN_BIT;
        }
        if self.write_enable {
            control |= CONTROL_WRITE_ENABLE_BIT;
        }
        control
    }

    /// Returns the raw register snapshot a requester drives for this transaction.
    #[must_use]
    pub const fn inputs(self) -> SidebandInputs {
        SidebandInputs {
            address: self.address,
            write_data: self.write_data,
            control: self.control_word(),
        }
    }
}

impl From<SidebandInputs> for BusTransaction {
    fn from(inputs: SidebandInputs) -> Self {
        Self::decode(inputs)
    }
}
