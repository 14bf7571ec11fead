//! A wear-leveled, log-structured "latest value" store over a
//! byte-addressable non-volatile medium (EEPROM/FRAM).
//!
//! The medium is divided into fixed-size slots forming a ring. Each write
//! advances to the next slot (wrapping at the end) and stamps it with a
//! strictly increasing 32-bit version; the slot holding the largest version
//! is the *head*: the most recently written generation. Older generations
//! remain readable, newest-to-oldest, until the ring wraps back over them.
//!
//! # Design
//!
//! - **[`codec`]**: the 4-byte version header plus opaque payload layout
//!   of a single slot.
//! - **[`head`]**: recovering the head after an unclean power cycle, by
//!   linear or binary scan of slot headers.
//! - **[`iter`]**: [`ListSlots`] (physical order) and [`List`] (logical,
//!   newest→oldest) traversals.
//!
//! This module binds those pieces into five operations: [`format`],
//! [`init`], [`Handle::read`], [`Handle::write`], [`Handle::list`], and
//! [`list_slots`].
//!
//! # Example
//!
//! ```rust,no_run
//! use ringstore::storage::Storage;
//! use ringstore::store::{format, init, Options};
//! # struct MockStorage;
//! # impl ringstore::storage::ReadStorage for MockStorage {
//! #     type Error = ();
//! #     fn read(&mut self, _o: u32, _b: &mut [u8]) -> Result<(), ()> { Ok(()) }
//! #     fn capacity(&self) -> usize { 1024 }
//! # }
//! # impl Storage for MockStorage {
//! #     fn write(&mut self, _o: u32, _b: &[u8]) -> Result<(), ()> { Ok(()) }
//! # }
//! let mut device = MockStorage;
//! let opts = Options::new(64).stride(8);
//!
//! format(&mut device, opts).unwrap();
//! let mut handle = init(&mut device, opts).unwrap();
//! assert!(handle.is_empty());
//!
//! handle.write(&mut device, b"v1").unwrap();
//! let mut buf = [0u8; 8];
//! let payload = handle.read(&mut device, &mut buf).unwrap().unwrap();
//! assert_eq!(&*payload, b"v1");
//! ```

pub mod codec;
/// Error type returned by every operation in this module.
pub mod error;
pub mod head;
pub mod iter;

#[cfg(test)]
mod tests;

pub use codec::{PayloadView, HEADER_INIT_VALUE32, HEADER_INIT_VALUE8, HEADER_SIZE};
pub use error::Error;
pub use iter::{List, ListSlots};

use crate::storage::{ReadStorage, Storage};

/// Largest `stride` this build supports.
///
/// Every on-stack scratch buffer in this module is sized to this constant
/// rather than allocated, per the crate's no-heap design; `stride` is
/// validated against it at [`format`]/[`init`] time.
pub const MAX_STRIDE: usize = 256;

/// Layout parameters for a partition.
///
/// Defaults match spec: `base_address = 0`, `stride = 32`,
/// `little_endian = false`, `full_scan = false`. `byte_length` has no
/// sensible default and must always be given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// First byte of the partition within the backing store.
    pub base_address: u32,
    /// Size of the partition, in bytes.
    pub byte_length: u32,
    /// Slot size in bytes; must be at least `HEADER_SIZE + 1` and at most
    /// [`MAX_STRIDE`].
    pub stride: u32,
    /// Byte order of the version header.
    pub little_endian: bool,
    /// Selects linear (`true`) vs. binary (`false`) head recovery.
    pub full_scan: bool,
}

impl Options {
    /// Start from the defaults with the given partition size.
    pub fn new(byte_length: u32) -> Self {
        Self {
            base_address: 0,
            byte_length,
            stride: 32,
            little_endian: false,
            full_scan: false,
        }
    }

    /// Set the base address.
    pub fn base_address(mut self, base_address: u32) -> Self {
        self.base_address = base_address;
        self
    }

    /// Set the slot stride.
    pub fn stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }

    /// Set the header byte order.
    pub fn little_endian(mut self, little_endian: bool) -> Self {
        self.little_endian = little_endian;
        self
    }

    /// Select linear (`true`) vs. binary (`false`) head recovery.
    pub fn full_scan(mut self, full_scan: bool) -> Self {
        self.full_scan = full_scan;
        self
    }

    /// Layout-only checks: stride bounds and the partition fitting at least
    /// one slot. Does not know the backing store's capacity; see
    /// [`Options::check_capacity`] for the complementary check.
    fn validate<E>(&self) -> Result<(), Error<E>> {
        if (self.stride as usize) < HEADER_SIZE + 1 || (self.stride as usize) > MAX_STRIDE {
            return Err(Error::InvalidPayload);
        }
        if self.byte_length < self.stride {
            return Err(Error::InvalidPayload);
        }
        Ok(())
    }

    /// `byte_length` must fit within the backing store's capacity starting
    /// at `base_address`; this is the one check `validate` cannot make on
    /// its own, since it has no store to ask.
    fn check_capacity<E>(&self, capacity: usize) -> Result<(), Error<E>> {
        if self.base_address as usize + self.byte_length as usize > capacity {
            return Err(Error::OutOfRange);
        }
        Ok(())
    }

    fn slot_count(&self) -> u32 {
        self.byte_length / self.stride
    }
}

/// In-memory state describing an opened partition: the layout it was
/// [`init`]-ed with, plus the currently known head.
///
/// Produced by [`init`], mutated only by [`Handle::write`], owned
/// exclusively by the caller. Two handles over disjoint ranges are
/// independent; two handles over the same range writing concurrently is
/// undefined, matching the single-writer-per-partition contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    base_address: u32,
    byte_length: u32,
    stride: u32,
    little_endian: bool,
    full_scan: bool,
    empty: bool,
    version: u32,
    offset: u32,
}

impl crate::storage::Region for Handle {
    fn start(&self) -> u32 {
        self.base_address
    }

    fn end(&self) -> u32 {
        self.base_address + self.byte_length
    }
}

impl Handle {
    /// `true` iff no non-erased slot has ever been found or written.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Version of the current head. `0` when [`Handle::is_empty`].
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Byte offset of the head relative to `base_address`. `0` when
    /// [`Handle::is_empty`].
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Slot size, in bytes.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    fn slot_count(&self) -> u32 {
        self.byte_length / self.stride
    }

    /// Commit `payload` as a new generation and advance the head.
    ///
    /// `payload` must be non-empty and fit in `stride - HEADER_SIZE` bytes.
    /// On failure the handle is left unchanged; the medium may hold a
    /// partially written slot, which the next [`init`] will treat as an
    /// ordinary (possibly spurious) data point.
    pub fn write<S: Storage>(
        &mut self,
        store: &mut S,
        payload: &[u8],
    ) -> Result<(), Error<S::Error>> {
        if payload.is_empty() || payload.len() + HEADER_SIZE > self.stride as usize {
            return Err(Error::InvalidPayload);
        }

        let (next_offset, next_version) = if self.empty {
            (self.offset, self.version)
        } else {
            let last_slot_offset = (self.slot_count() - 1) * self.stride;
            let wrapped = self.offset >= last_slot_offset;
            let next_offset = if wrapped { 0 } else { self.offset + self.stride };
            (next_offset, self.version + 1)
        };

        let mut block = [0u8; MAX_STRIDE];
        let stride = self.stride as usize;
        block[..HEADER_SIZE]
            .copy_from_slice(&codec::encode_version(next_version, self.little_endian));
        block[HEADER_SIZE..HEADER_SIZE + payload.len()].copy_from_slice(payload);

        store.write(self.base_address + next_offset, &block[..stride])?;

        self.offset = next_offset;
        self.version = next_version;
        self.empty = false;
        Ok(())
    }

    /// Read the current head's payload into `buf`.
    ///
    /// Returns `Ok(None)` if the handle is empty. `buf` must be at least
    /// `stride` bytes long. Fails with [`Error::VersionMismatch`] if the
    /// slot's on-media header no longer matches the handle's expected
    /// version (a stale handle, or the medium changed underneath it).
    pub fn read<'b, S: ReadStorage>(
        &self,
        store: &mut S,
        buf: &'b mut [u8],
    ) -> Result<Option<PayloadView<'b>>, Error<S::Error>> {
        if self.empty {
            return Ok(None);
        }
        let stride = self.stride as usize;
        if buf.len() < stride {
            return Err(Error::InvalidPayload);
        }

        store.read(self.base_address + self.offset, &mut buf[..stride])?;

        let mut header = [0u8; HEADER_SIZE];
        header.copy_from_slice(&buf[..HEADER_SIZE]);
        let version = codec::decode_version(&header, self.little_endian);
        if version != self.version {
            return Err(Error::VersionMismatch);
        }

        Ok(Some(PayloadView::new(&buf[HEADER_SIZE..stride])))
    }

    /// Enumerate live generations newest→oldest, starting at the head.
    pub fn list<'a, S: ReadStorage>(&'a self, store: &'a mut S) -> List<'a, S> {
        List::new(store, self)
    }
}

/// Write `0xFF` to every byte of `[opts.base_address, opts.base_address +
/// opts.byte_length)`. Produces no handle.
pub fn format<S: Storage>(store: &mut S, opts: Options) -> Result<(), Error<S::Error>> {
    opts.validate()?;
    opts.check_capacity(store.capacity())?;

    const CHUNK: usize = 64;
    let fill = [HEADER_INIT_VALUE8; CHUNK];
    let mut written = 0u32;
    while written < opts.byte_length {
        let n = core::cmp::min(CHUNK as u32, opts.byte_length - written);
        store.write(opts.base_address + written, &fill[..n as usize])?;
        written += n;
    }
    Ok(())
}

/// Open a partition, recovering the head from whatever is already on the
/// medium (linear or binary scan, per [`Options::full_scan`]).
pub fn init<S: ReadStorage>(store: &mut S, opts: Options) -> Result<Handle, Error<S::Error>> {
    opts.validate()?;
    opts.check_capacity(store.capacity())?;

    let slot_count = opts.slot_count();
    let head = if opts.full_scan {
        head::find_linear(
            store,
            opts.base_address,
            opts.stride,
            slot_count,
            opts.little_endian,
        )?
    } else {
        head::find_binary(
            store,
            opts.base_address,
            opts.stride,
            slot_count,
            opts.little_endian,
        )?
    };

    Ok(Handle {
        base_address: opts.base_address,
        byte_length: opts.byte_length,
        stride: opts.stride,
        little_endian: opts.little_endian,
        full_scan: opts.full_scan,
        empty: head.empty,
        version: head.version,
        offset: head.offset,
    })
}

/// Enumerate every slot in physical order, including erased ones. Requires
/// only layout parameters, not a discovered head.
pub fn list_slots<S: ReadStorage>(store: &mut S, opts: Options) -> ListSlots<'_, S> {
    ListSlots::new(store, opts)
}

#[cfg(feature = "async")]
mod asynchronous {
    use super::*;
    use crate::storage::{AsyncReadStorage, AsyncStorage};

    /// Async equivalent of [`format`].
    pub async fn format_async<S: AsyncStorage>(
        store: &mut S,
        opts: Options,
    ) -> Result<(), Error<S::Error>> {
        opts.validate()?;
        opts.check_capacity(store.capacity())?;

        const CHUNK: usize = 64;
        let fill = [HEADER_INIT_VALUE8; CHUNK];
        let mut written = 0u32;
        while written < opts.byte_length {
            let n = core::cmp::min(CHUNK as u32, opts.byte_length - written);
            store
                .write(opts.base_address + written, &fill[..n as usize])
                .await?;
            written += n;
        }
        Ok(())
    }

    async fn read_version_async<S: AsyncReadStorage>(
        store: &mut S,
        base_address: u32,
        stride: u32,
        slot_index: u32,
        little_endian: bool,
    ) -> Result<u32, Error<S::Error>> {
        let mut header = [0u8; HEADER_SIZE];
        store
            .read(base_address + slot_index * stride, &mut header)
            .await?;
        Ok(codec::decode_version(&header, little_endian))
    }

    /// Async equivalent of [`init`].
    pub async fn init_async<S: AsyncReadStorage>(
        store: &mut S,
        opts: Options,
    ) -> Result<Handle, Error<S::Error>> {
        opts.validate()?;
        opts.check_capacity(store.capacity())?;
        let slot_count = opts.slot_count();

        let head = if opts.full_scan {
            let mut best: Option<crate::store::head::HeadInfo> = None;
            for slot in 0..slot_count {
                let version = read_version_async(
                    store,
                    opts.base_address,
                    opts.stride,
                    slot,
                    opts.little_endian,
                )
                .await?;
                if version == HEADER_INIT_VALUE32 {
                    break;
                }
                let is_new_best = match best {
                    Some(b) => version > b.version,
                    None => true,
                };
                if is_new_best {
                    best = Some(crate::store::head::HeadInfo {
                        version,
                        offset: slot * opts.stride,
                        empty: false,
                    });
                }
            }
            best.unwrap_or(crate::store::head::HeadInfo {
                version: 0,
                offset: 0,
                empty: true,
            })
        } else {
            let version0 = read_version_async(
                store,
                opts.base_address,
                opts.stride,
                0,
                opts.little_endian,
            )
            .await?;
            if version0 == HEADER_INIT_VALUE32 {
                crate::store::head::HeadInfo {
                    version: 0,
                    offset: 0,
                    empty: true,
                }
            } else if slot_count == 1 {
                crate::store::head::HeadInfo {
                    version: version0,
                    offset: 0,
                    empty: false,
                }
            } else {
                let mut lo = 0u32;
                let mut hi = slot_count - 1;
                let mut lo_version = version0;
                loop {
                    if lo >= hi {
                        break crate::store::head::HeadInfo {
                            version: lo_version,
                            offset: lo * opts.stride,
                            empty: false,
                        };
                    }
                    let mid = lo + (hi - lo) / 2;
                    let version_mid = read_version_async(
                        store,
                        opts.base_address,
                        opts.stride,
                        mid,
                        opts.little_endian,
                    )
                    .await?;
                    if version_mid < lo_version || version_mid == HEADER_INIT_VALUE32 {
                        hi = mid - 1;
                        continue;
                    }
                    let version_mid_next = read_version_async(
                        store,
                        opts.base_address,
                        opts.stride,
                        mid + 1,
                        opts.little_endian,
                    )
                    .await?;
                    if version_mid > version_mid_next || version_mid_next == HEADER_INIT_VALUE32 {
                        break crate::store::head::HeadInfo {
                            version: version_mid,
                            offset: mid * opts.stride,
                            empty: false,
                        };
                    }
                    lo = mid + 1;
                    lo_version = version_mid_next;
                }
            }
        };

        Ok(Handle {
            base_address: opts.base_address,
            byte_length: opts.byte_length,
            stride: opts.stride,
            little_endian: opts.little_endian,
            full_scan: opts.full_scan,
            empty: head.empty,
            version: head.version,
            offset: head.offset,
        })
    }

    impl Handle {
        /// Async equivalent of [`Handle::write`].
        pub async fn write_async<S: AsyncStorage>(
            &mut self,
            store: &mut S,
            payload: &[u8],
        ) -> Result<(), Error<S::Error>> {
            if payload.is_empty() || payload.len() + HEADER_SIZE > self.stride as usize {
                return Err(Error::InvalidPayload);
            }

            let (next_offset, next_version) = if self.empty {
                (self.offset, self.version)
            } else {
                let last_slot_offset = (self.slot_count() - 1) * self.stride;
                let wrapped = self.offset >= last_slot_offset;
                let next_offset = if wrapped { 0 } else { self.offset + self.stride };
                (next_offset, self.version + 1)
            };

            let mut block = [0u8; MAX_STRIDE];
            let stride = self.stride as usize;
            block[..HEADER_SIZE]
                .copy_from_slice(&codec::encode_version(next_version, self.little_endian));
            block[HEADER_SIZE..HEADER_SIZE + payload.len()].copy_from_slice(payload);

            store
                .write(self.base_address + next_offset, &block[..stride])
                .await?;

            self.offset = next_offset;
            self.version = next_version;
            self.empty = false;
            Ok(())
        }

        /// Async equivalent of [`Handle::read`].
        pub async fn read_async<'b, S: AsyncReadStorage>(
            &self,
            store: &mut S,
            buf: &'b mut [u8],
        ) -> Result<Option<PayloadView<'b>>, Error<S::Error>> {
            if self.empty {
                return Ok(None);
            }
            let stride = self.stride as usize;
            if buf.len() < stride {
                return Err(Error::InvalidPayload);
            }

            store
                .read(self.base_address + self.offset, &mut buf[..stride])
                .await?;

            let mut header = [0u8; HEADER_SIZE];
            header.copy_from_slice(&buf[..HEADER_SIZE]);
            let version = codec::decode_version(&header, self.little_endian);
            if version != self.version {
                return Err(Error::VersionMismatch);
            }

            Ok(Some(PayloadView::new(&buf[HEADER_SIZE..stride])))
        }
    }
}

#[cfg(feature = "async")]
pub use asynchronous::{format_async, init_async};
