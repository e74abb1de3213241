//! # Retention storage for embedded consoles
//!
//! Small byte-addressed storage traits plus the pieces the console needs to
//! keep a value alive across soft resets: a RAM-backed [`RetentionMemory`]
//! region and the checksummed [`RetainedSlot`] codec.
//!
//! Retention memory (RTC slow memory, backup SRAM, backup registers) keeps
//! its contents through a warm reset but comes up with arbitrary contents
//! after a cold power-on. [`RetainedSlot`] stores a CRC next to every value
//! so that garbage reads back as "nothing stored" instead of a random count.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  RetainedSlot   │───▶│ Storage traits  │───▶│ Retention RAM / │
//! │  (value + CRC)  │    │ (read / write)  │    │ backup registers│
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! # Usage Examples
//!
//! ```rust
//! use libconsole::storage::{RetainedSlot, RetentionMemory};
//!
//! let mut memory = RetentionMemory::<16>::new();
//! let boot_count = RetainedSlot::new(1);
//!
//! assert_eq!(boot_count.load(&mut memory), Ok(None));
//! boot_count.store(&mut memory, 7).unwrap();
//! assert_eq!(boot_count.load(&mut memory), Ok(Some(7)));
//! ```

#![deny(unsafe_code)]

/// Common error types for storage operations
pub mod error;

mod retained;

pub use retained::{RetainedSlot, SLOT_SIZE};

use error::Error;

/// Re-exports of common traits for convenient importing
pub mod prelude {
    pub use super::{ReadStorage, Storage};
}

/// Trait for reading data from storage devices.
///
/// # Examples
///
/// ```rust,no_run
/// use libconsole::storage::ReadStorage;
///
/// fn read_marker<S: ReadStorage>(storage: &mut S) -> Result<u32, S::Error> {
///     let mut bytes = [0u8; 4];
///     storage.read(0, &mut bytes)?;
///     Ok(u32::from_le_bytes(bytes))
/// }
/// ```
pub trait ReadStorage {
    /// Associated error type for read operations
    type Error: core::fmt::Debug;

    /// Read data from the storage device.
    ///
    /// Fills `bytes` starting at `offset`.
    ///
    /// # Errors
    ///
    /// - `OutOfBounds` if offset + buffer length exceeds device capacity
    /// - `ReadError` if the hardware read fails
    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error>;

    /// Total capacity of the storage device in bytes.
    fn capacity(&self) -> usize;
}

/// Trait for storage devices that support both read and write operations.
pub trait Storage: ReadStorage {
    /// Write data to the storage device at `offset`.
    ///
    /// # Errors
    ///
    /// - `OutOfBounds` if offset + data length exceeds device capacity
    /// - `WriteError` if the hardware write fails
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<S: ReadStorage + ?Sized> ReadStorage for &mut S {
    type Error = S::Error;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(offset, bytes)
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(offset, bytes)
    }
}

/// RAM-backed retention region of `N` bytes.
///
/// On a target this is placed in a memory section that survives soft resets;
/// on a host it stands in for that section. [`RetentionMemory::power_on`]
/// builds a region filled with a pattern, which is what a cold start looks
/// like.
///
/// # Examples
///
/// ```rust
/// use libconsole::storage::{ReadStorage, RetentionMemory, Storage};
///
/// let mut memory = RetentionMemory::<8>::new();
/// memory.write(4, &[1, 2, 3, 4]).unwrap();
///
/// let mut buf = [0u8; 4];
/// memory.read(4, &mut buf).unwrap();
/// assert_eq!(buf, [1, 2, 3, 4]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionMemory<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> RetentionMemory<N> {
    /// Create a zero-filled region.
    pub const fn new() -> Self {
        Self { bytes: [0; N] }
    }

    /// Create a region whose every byte is `pattern`.
    pub const fn power_on(pattern: u8) -> Self {
        Self { bytes: [pattern; N] }
    }

    /// Raw contents of the region.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn range(&self, offset: u32, len: usize) -> Result<core::ops::Range<usize>, Error> {
        let start = offset as usize;
        let end = start.checked_add(len).ok_or(Error::OutOfBounds)?;
        if end > N {
            return Err(Error::OutOfBounds);
        }
        Ok(start..end)
    }
}

impl<const N: usize> Default for RetentionMemory<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ReadStorage for RetentionMemory<N> {
    type Error = Error;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, bytes.len())?;
        bytes.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Storage for RetentionMemory<N> {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, bytes.len())?;
        self.bytes[range].copy_from_slice(bytes);
        Ok(())
    }
}
