//! Memory responder: decodes an active transaction and serves it from ROM or RAM.

use crate::{decode_region, BusTransaction, MemoryRegion, Region};

/// What the responder did with one active transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Access {
    /// Instruction fetch from ROM. Write-enable is ignored in the ROM window.
    RomFetch,
    /// Data read from RAM.
    RamRead,
    /// Byte-lane masked write into RAM.
    RamWrite {
        /// Word stored in RAM after the merge.
        merged: u32,
    },
    /// Address outside both windows; nothing was read or written.
    Unmapped,
}

/// Response produced for one active transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Response {
    /// Region the address decoded to.
    pub region: Region,
    /// Access performed.
    pub access: Access,
    /// Response data latch after this transaction.
    pub data_out: u32,
    /// Transaction-end flag; always set for an active transaction.
    pub transaction_end: bool,
}

/// Owns the ROM and RAM backing stores and the response data latch.
///
/// The latch keeps its value across cycles: RAM writes and unmapped
/// transactions leave it untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryResponder {
    rom: MemoryRegion,
    ram: MemoryRegion,
    data_out: u32,
}

impl Default for MemoryResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryResponder {
    /// Allocates zeroed ROM and RAM stores and a zeroed data latch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rom: MemoryRegion::rom(),
            ram: MemoryRegion::ram(),
            data_out: 0,
        }
    }

    /// Instruction ROM store.
    #[must_use]
    pub const fn rom(&self) -> &MemoryRegion {
        &self.rom
    }

    /// Mutable instruction ROM store, for host preload.
    pub fn rom_mut(&mut self) -> &mut MemoryRegion {
        &mut self.rom
    }

    /// Data RAM store.
    #[must_use]
    pub const fn ram(&self) -> &MemoryRegion {
        &self.ram
    }

    /// Mutable data RAM store, for host preload.
    pub fn ram_mut(&mut self) -> &mut MemoryRegion {
        &mut self.ram
    }

    /// Current response data latch.
    #[must_use]
    pub const fn data_out(&self) -> u32 {
        self.data_out
    }

    /// Serves `transaction`. Returns `None` when `begin` is not set.
    pub fn respond(&mut self, transaction: &BusTransaction) -> Option<Response> {
        if !transaction.begin {
            return None;
        }

        let address = transaction.address;
        let region = decode_region(address);
        let access = match region {
            Region::Rom => self.latch(self.rom.read(address), Access::RomFetch),
            Region::Ram if transaction.write_enable => self
                .ram
                .write_masked(address, transaction.write_data, transaction.byte_mask)
                .map_or(Access::Unmapped, |merged| Access::RamWrite { merged }),
            Region::Ram => self.latch(self.ram.read(address), Access::RamRead),
            Region::Unmapped => Access::Unmapped,
        };

        Some(Response {
            region,
            access,
            data_out: self.data_out,
            transaction_end: true,
        })
    }

    fn latch(&mut self, word: Option<u32>, access: Access) -> Access {
        match word {
            Some(word) => {
                self.data_out = word;
                access
            }
            None => Access::Unmapped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Access, MemoryResponder, Response};
    use crate::{BusTransaction, ByteMask, Region, RAM_BASE, ROM_BASE};

    #[test]
    fn inactive_transactions_are_ignored() {
        let mut responder = MemoryResponder::new();
        let mut idle = BusTransaction::read(ROM_BASE);
        idle.begin = false;
        assert_eq!(responder.respond(&idle), None);
        assert_eq!(responder.respond(&BusTransaction::idle()), None);
    }

    #[test]
    fn rom_fetch_latches_the_slot_word() {
        let mut responder = MemoryResponder::new();
        responder
            .rom_mut()
            .load(0, &[0x0210_0093])
            .expect("preload fits");

        let response = responder
            .respond(&BusTransaction::read(ROM_BASE))
            .expect("active transaction");

        assert_eq!(
            response,
            Response {
                region: Region::Rom,
                access: Access::RomFetch,
                data_out: 0x0210_0093,
                transaction_end: true,
            }
        );
    }

    #[test]
    fn write_enable_in_rom_window_still_reads() {
        let mut responder = MemoryResponder::new();
        responder
            .rom_mut()
            .load(8, &[0x001f_8463])
            .expect("preload fits");

        let response = responder
            .respond(&BusTransaction::write(ROM_BASE + 8, 0xFFFF_FFFF, ByteMask::ALL))
            .expect("active transaction");

        assert_eq!(response.access, Access::RomFetch);
        assert_eq!(response.data_out, 0x001f_8463);
        assert_eq!(responder.rom().read(ROM_BASE + 8), Some(0x001f_8463));
    }

    #[test]
    fn ram_write_merges_and_leaves_latch_untouched() {
        let mut responder = MemoryResponder::new();
        responder
            .rom_mut()
            .load(0, &[0x1111_1111])
            .expect("preload fits");
        responder.respond(&BusTransaction::read(ROM_BASE));

        let response = responder
            .respond(&BusTransaction::write(
                RAM_BASE,
                0xAABB_CCDD,
                ByteMask::new(0b0011),
            ))
            .expect("active transaction");

        assert_eq!(
            response.access,
            Access::RamWrite {
                merged: 0x0000_CCDD
            }
        );
        assert_eq!(response.data_out, 0x1111_1111);

        let read_back = responder
            .respond(&BusTransaction::read(RAM_BASE))
            .expect("active transaction");
        assert_eq!(read_back.access, Access::RamRead);
        assert_eq!(read_back.data_out, 0x0000_CCDD);
    }

    #[test]
    fn unmapped_transaction_keeps_previous_data_but_ends() {
        let mut responder = MemoryResponder::new();
        responder
            .ram_mut()
            .load(1, &[0xCAFE_F00D])
            .expect("preload fits");
        responder.respond(&BusTransaction::read(RAM_BASE + 1));

        let response = responder
            .respond(&BusTransaction::read(0x0000_0C00))
            .expect("active transaction");

        assert_eq!(response.region, Region::Unmapped);
        assert_eq!(response.access, Access::Unmapped);
        assert_eq!(response.data_out, 0xCAFE_F00D);
        assert!(response.transaction_end);
    }
}
