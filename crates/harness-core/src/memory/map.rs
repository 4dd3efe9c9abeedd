//! Fixed ROM/RAM address windows and the sampled-address decoder.

use std::fmt;

/// Inclusive base address of the instruction ROM window.
pub const ROM_BASE: u32 = 0x0000_0400;
/// Number of addressable slots in the instruction ROM window.
pub const ROM_SIZE: u32 = 128;
/// Inclusive base address of the data RAM window.
pub const RAM_BASE: u32 = 0x0000_0800;
/// Number of addressable slots in the data RAM window.
pub const RAM_SIZE: u32 = 128;

/// Classification of a sampled bus address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Region {
    /// Instruction ROM window (`0x400..0x480`).
    Rom,
    /// Data RAM window (`0x800..0x880`).
    Ram,
    /// Any address outside both windows.
    Unmapped,
}

impl Region {
    /// Returns `true` for the ROM and RAM windows.
    #[must_use]
    pub const fn is_mapped(self) -> bool {
        !matches!(self, Self::Unmapped)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rom => "rom",
            Self::Ram => "ram",
            Self::Unmapped => "unmapped",
        };
        f.write_str(name)
    }
}

/// Base/size descriptor for one fixed address window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionWindow {
    /// Region this window belongs to.
    pub region: Region,
    /// Inclusive base address.
    pub base: u32,
    /// Number of slots; the window covers `base..base + size`.
    pub size: u32,
}

impl RegionWindow {
    /// Returns `true` when `address` falls inside `base..base + size`.
    #[must_use]
    pub const fn contains(self, address: u32) -> bool {
        address >= self.base && address - self.base < self.size
    }

    /// Returns the backing-store slot for `address`, or `None` outside the window.
    ///
    /// The slot is the raw offset `address - base`; every address in the
    /// window owns one 32-bit word.
    #[must_use]
    pub const fn slot_index(self, address: u32) -> Option<usize> {
        if self.contains(address) {
            Some((address - self.base) as usize)
        } else {
            None
        }
    }

    /// Exclusive end address of the window.
    #[must_use]
    pub const fn end(self) -> u32 {
        self.base + self.size
    }
}

/// Instruction ROM window descriptor.
pub const ROM_WINDOW: RegionWindow = RegionWindow {
    region: Region::Rom,
    base: ROM_BASE,
    size: ROM_SIZE,
};

/// Data RAM window descriptor.
pub const RAM_WINDOW: RegionWindow = RegionWindow {
    region: Region::Ram,
    base: RAM_BASE,
    size: RAM_SIZE,
};

const _: () = assert_window_layout();

const fn assert_window_layout() {
    assert!(ROM_SIZE > 0 && RAM_SIZE > 0, "windows cannot be empty");
    assert!(
        ROM_BASE.checked_add(ROM_SIZE).is_some() && RAM_BASE.checked_add(RAM_SIZE).is_some(),
        "windows must not wrap the 32-bit address space"
    );
    assert!(
        ROM_BASE + ROM_SIZE <= RAM_BASE || RAM_BASE + RAM_SIZE <= ROM_BASE,
        "rom and ram windows must not overlap"
    );
}

/// Decodes a sampled address into its region.
///
/// ROM is tested first; RAM is only considered when ROM did not match.
#[must_use]
pub const fn decode_region(address: u32) -> Region {
    if ROM_WINDOW.contains(address) {
        Region::Rom
    } else if RAM_WINDOW.contains(address) {
        Region::Ram
    } else {
        Region::Unmapped
    }
}
