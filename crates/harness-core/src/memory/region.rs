//! Word-slot backing stores for the ROM and RAM windows.

use thiserror::Error;

use crate::{merge_byte_lanes, ByteMask, Region, RegionWindow, RAM_WINDOW, ROM_WINDOW};

/// Host preload rejected because it does not fit the target window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("preload of {len} words at offset {offset:#x} does not fit the {region} window")]
pub struct LoadError {
    /// Window the preload targeted.
    pub region: Region,
    /// Slot offset of the first preloaded word.
    pub offset: u32,
    /// Number of words in the rejected preload.
    pub len: usize,
}

/// One fixed window plus its backing store, one 32-bit word per address slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    window: RegionWindow,
    slots: Box<[u32]>,
}

impl MemoryRegion {
    /// Allocates a zeroed backing store sized to `window`.
    #[must_use]
    pub fn new(window: RegionWindow) -> Self {
        Self {
            window,
            slots: vec![0; window.size as usize].into_boxed_slice(),
        }
    }

    /// Allocates the instruction ROM.
    #[must_use]
    pub fn rom() -> Self {
        Self::new(ROM_WINDOW)
    }

    /// Allocates the data RAM.
    #[must_use]
    pub fn ram() -> Self {
        Self::new(RAM_WINDOW)
    }

    /// Returns the window this store backs.
    #[must_use]
    pub const fn window(&self) -> RegionWindow {
        self.window
    }

    /// Returns the backing store contents in slot order.
    #[must_use]
    pub fn words(&self) -> &[u32] {
        &self.slots
    }

    /// Reads the word at bus `address`, or `None` outside the window.
    #[must_use]
    pub fn read(&self, address: u32) -> Option<u32> {
        let index = self.window.slot_index(address)?;
        self.slots.get(index).copied()
    }

    /// Applies a byte-lane masked write at bus `address` and returns the merged word.
    ///
    /// Returns `None` and leaves the store untouched outside the window.
    pub fn write_masked(&mut self, address: u32, write_data: u32, mask: ByteMask) -> Option<u32> {
        let index = self.window.slot_index(address)?;
        let slot = self.slots.get_mut(index)?;
        *slot = merge_byte_lanes(*slot, write_data, mask);
        Some(*slot)
    }

    /// Copies `words` into consecutive slots starting at slot `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when any word would land outside the window; the
    /// store is left untouched in that case.
    pub fn load(&mut self, offset: u32, words: &[u32]) -> Result<(), LoadError> {
        let error = LoadError {
            region: self.window.region,
            offset,
            len: words.len(),
        };
        let start = offset as usize;
        let end = start.checked_add(words.len()).ok_or(error)?;
        let target = self.slots.get_mut(start..end).ok_or(error)?;
        target.copy_from_slice(words);
        Ok(())
    }
}
