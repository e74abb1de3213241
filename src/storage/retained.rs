//! Checksummed 32-bit slots in retention memory.

use super::{ReadStorage, Storage};

/// Bytes occupied by one slot: the value followed by its CRC-32.
pub const SLOT_SIZE: usize = 8;

/// A named 32-bit cell in retention memory.
///
/// Each slot lives at `index * SLOT_SIZE` and holds the value (little endian)
/// followed by a CRC-32 over the slot index and the value. A slot whose CRC
/// does not match, as after a cold power-on, loads as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetainedSlot {
    index: u32,
}

impl RetainedSlot {
    /// Slot at position `index` of the retention region.
    pub const fn new(index: u32) -> Self {
        Self { index }
    }

    /// Position of this slot in the retention region.
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Byte offset of the slot. An index whose offset does not fit in a
    /// `u32` maps to `u32::MAX`, which no storage can hold a slot at.
    fn offset(&self) -> u32 {
        self.index
            .checked_mul(SLOT_SIZE as u32)
            .unwrap_or(u32::MAX)
    }

    fn checksum(&self, value: u32) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&self.index.to_le_bytes());
        hasher.update(&value.to_le_bytes());
        hasher.finalize()
    }

    /// Read the slot, returning `None` if it holds no valid value.
    pub fn load<S: ReadStorage>(&self, storage: &mut S) -> Result<Option<u32>, S::Error> {
        let mut raw = [0u8; SLOT_SIZE];
        storage.read(self.offset(), &mut raw)?;

        let value = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
        let crc = u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]);

        if crc == self.checksum(value) {
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Write `value` and its checksum into the slot.
    pub fn store<S: Storage>(&self, storage: &mut S, value: u32) -> Result<(), S::Error> {
        let mut raw = [0u8; SLOT_SIZE];
        raw[..4].copy_from_slice(&value.to_le_bytes());
        raw[4..].copy_from_slice(&self.checksum(value).to_le_bytes());
        storage.write(self.offset(), &raw)
    }

    /// Invalidate the slot so the next [`load`](Self::load) returns `None`.
    pub fn clear<S: Storage>(&self, storage: &mut S) -> Result<(), S::Error> {
        let mut raw = [0u8; SLOT_SIZE];
        raw[4..].copy_from_slice(&(!self.checksum(0)).to_le_bytes());
        storage.write(self.offset(), &raw)
    }
}
