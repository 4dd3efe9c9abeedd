//! Memory model: fixed windows, backing stores and the byte-lane write policy.

/// Byte-lane merge policy for masked writes.
pub mod access;
/// Fixed ROM/RAM windows and the address decoder.
pub mod map;
/// Word-slot backing stores.
pub mod region;

pub use access::merge_byte_lanes;
pub use map::{
    decode_region, Region, RegionWindow, RAM_BASE, RAM_SIZE, RAM_WINDOW, ROM_BASE, ROM_SIZE,
    ROM_WINDOW,
};
pub use region::{LoadError, MemoryRegion};
