//! Storage abstraction layer for embedded systems.
//!
//! This module provides the minimal capability [`ringstore`](crate) needs from
//! a byte-addressable medium: a positioned read and a positioned write. It is
//! deliberately narrow: the ring store treats the block device driver
//! (I2C/SPI transport, page buffering, write-cycle timing) as an external
//! collaborator and consumes nothing beyond [`ReadStorage`] / [`Storage`].
//!
//! # Design Philosophy
//!
//! - **Technology Agnostic**: works with any storage technology that can be
//!   addressed by byte offset.
//! - **Zero-Cost Abstractions**: traits compile down to direct hardware calls.
//! - **Embedded-First**: designed for `no_std` environments with limited
//!   resources.
//! - **No assumed buffer ownership**: `read` fills a caller-owned buffer, so
//!   the core never needs to know whether the store's own bytes are owned or
//!   borrowed internally.
//!
//! # Core Traits
//!
//! - [`ReadStorage`]: read data from storage.
//! - [`Storage`]: read and write operations.
//! - [`AsyncReadStorage`] / [`AsyncStorage`]: asynchronous equivalents (with
//!   the `async` feature).
//! - [`Region`]: a contiguous address range, used to describe the partition a
//!   [`crate::store::Handle`] occupies.

#![allow(missing_docs)]
#![allow(async_fn_in_trait)]
#![deny(unsafe_code)]

/// Common error type for storage operations.
pub mod error;


/// Re-exports of common traits for convenient importing.
pub mod prelude {
    #[cfg(feature = "async")]
    pub use super::{AsyncReadStorage, AsyncStorage};
    pub use super::{ReadStorage, Region, Storage};
}

/// A contiguous memory region with start and end boundaries.
///
/// This is how a [`crate::store::Handle`] describes the slice of the backing
/// store it occupies.
///
/// # Examples
///
/// ```rust
/// use ringstore::storage::Region;
///
/// struct FlashRegion {
///     start: u32,
///     size: u32,
/// }
///
/// impl Region for FlashRegion {
///     fn start(&self) -> u32 {
///         self.start
///     }
///
///     fn end(&self) -> u32 {
///         self.start + self.size
///     }
/// }
///
/// let bootloader = FlashRegion { start: 0x0000, size: 0x4000 };
/// assert!(bootloader.contains(0x2000));
/// assert!(!bootloader.contains(0x5000));
/// ```
pub trait Region {
    /// Start address of the region (inclusive).
    fn start(&self) -> u32;

    /// End address of the region (exclusive).
    fn end(&self) -> u32;

    /// Check if an address is contained within this region.
    fn contains(&self, address: u32) -> bool {
        (address >= self.start()) && (address < self.end())
    }
}

// ========================
// Core Synchronous Traits
// ========================

/// Trait for reading data from storage devices.
///
/// This is the fundamental trait for all readable storage devices. It
/// provides a simple interface for reading data at specific offsets without
/// requiring write capabilities.
///
/// # Examples
///
/// ```rust,no_run
/// use ringstore::storage::ReadStorage;
///
/// fn read_device_id<S: ReadStorage>(storage: &mut S) -> Result<u32, S::Error> {
///     let mut id_bytes = [0u8; 4];
///     storage.read(0, &mut id_bytes)?;
///     Ok(u32::from_le_bytes(id_bytes))
/// }
/// ```
pub trait ReadStorage {
    /// Associated error type for read operations.
    type Error: core::fmt::Debug;

    /// Read data from the storage device.
    ///
    /// Reads data from the specified offset into the provided buffer. The
    /// entire buffer is filled unless an error occurs.
    ///
    /// # Errors
    ///
    /// Implementations should fail if `offset + bytes.len()` exceeds
    /// [`ReadStorage::capacity`], or on an underlying hardware fault.
    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error>;

    /// Total capacity of the storage device in bytes.
    fn capacity(&self) -> usize;
}

/// Trait for storage devices that support both read and write operations.
pub trait Storage: ReadStorage {
    /// Write data to the storage device.
    ///
    /// Writes `bytes` verbatim starting at `offset`. Whether writing to an
    /// already-written location requires an erase first depends on the
    /// storage technology; this trait makes no promise either way.
    ///
    /// # Errors
    ///
    /// Implementations should fail if `offset + bytes.len()` exceeds
    /// [`ReadStorage::capacity`], or on an underlying hardware fault.
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error>;
}

// ========================
// Core Asynchronous Traits
// ========================

/// Async equivalent of [`ReadStorage`].
#[cfg(feature = "async")]
pub trait AsyncReadStorage {
    /// Associated error type for async read operations.
    type Error: core::fmt::Debug;

    /// Read data from the storage device asynchronously.
    async fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error>;

    /// Total capacity of the storage device in bytes.
    fn capacity(&self) -> usize;
}

/// Async equivalent of [`Storage`].
#[cfg(feature = "async")]
pub trait AsyncStorage: AsyncReadStorage {
    /// Write data to the storage device asynchronously.
    async fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error>;
}
