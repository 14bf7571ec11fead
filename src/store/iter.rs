//! Enumerators: physical-order (`ListSlots`) and logical newest→oldest
//! (`List`) traversals of the ring.

use crate::storage::ReadStorage;
use crate::store::codec::{decode_version, PayloadView, HEADER_INIT_VALUE32, HEADER_SIZE};
use crate::store::error::Error;
use crate::store::{Handle, Options, MAX_STRIDE};

/// Physical-order iterator over every slot, including erased ones.
///
/// Built directly from [`Options`]: it requires only layout parameters, not
/// a discovered head, which makes it useful for diagnostics and for probing
/// media with speculative parameters.
pub struct ListSlots<'a, S> {
    store: &'a mut S,
    opts: Options,
    next_slot: u32,
    slot_count: u32,
    buf: [u8; MAX_STRIDE],
}

impl<'a, S: ReadStorage> ListSlots<'a, S> {
    pub(crate) fn new(store: &'a mut S, opts: Options) -> Self {
        let slot_count = opts.byte_length / opts.stride;
        Self {
            store,
            opts,
            next_slot: 0,
            slot_count,
            buf: [0u8; MAX_STRIDE],
        }
    }

    /// Read the next slot, if any remain.
    pub fn next(&mut self) -> Option<Result<(u32, PayloadView<'_>), Error<S::Error>>> {
        if self.next_slot >= self.slot_count {
            return None;
        }
        let slot = self.next_slot;
        self.next_slot += 1;

        let stride = self.opts.stride as usize;
        let offset = self.opts.base_address + slot * self.opts.stride;
        if let Err(e) = self.store.read(offset, &mut self.buf[..stride]) {
            return Some(Err(Error::StoreFailure(e)));
        }

        let mut header = [0u8; HEADER_SIZE];
        header.copy_from_slice(&self.buf[..HEADER_SIZE]);
        let version = decode_version(&header, self.opts.little_endian);
        Some(Ok((version, PayloadView::new(&self.buf[HEADER_SIZE..stride]))))
    }
}

#[cfg(feature = "async")]
impl<'a, S: crate::storage::AsyncReadStorage> ListSlots<'a, S> {
    /// Async equivalent of [`ListSlots::next`].
    pub async fn next_async(&mut self) -> Option<Result<(u32, PayloadView<'_>), Error<S::Error>>> {
        if self.next_slot >= self.slot_count {
            return None;
        }
        let slot = self.next_slot;
        self.next_slot += 1;

        let stride = self.opts.stride as usize;
        let offset = self.opts.base_address + slot * self.opts.stride;
        if let Err(e) = self.store.read(offset, &mut self.buf[..stride]).await {
            return Some(Err(Error::StoreFailure(e)));
        }

        let mut header = [0u8; HEADER_SIZE];
        header.copy_from_slice(&self.buf[..HEADER_SIZE]);
        let version = decode_version(&header, self.opts.little_endian);
        Some(Ok((version, PayloadView::new(&self.buf[HEADER_SIZE..stride]))))
    }
}

/// Logical newest→oldest iterator over live generations, starting at the
/// head and walking backward modulo the ring until the first erased slot
/// (or a full revolution).
pub struct List<'a, S> {
    store: &'a mut S,
    handle: &'a Handle,
    k: u32,
    done: bool,
    buf: [u8; MAX_STRIDE],
}

impl<'a, S: ReadStorage> List<'a, S> {
    pub(crate) fn new(store: &'a mut S, handle: &'a Handle) -> Self {
        Self {
            store,
            handle,
            k: 0,
            done: handle.empty,
            buf: [0u8; MAX_STRIDE],
        }
    }

    fn offset_for(&self, k: u32) -> u32 {
        let byte_length = self.handle.byte_length as i64;
        let stride = self.handle.stride as i64;
        let raw = self.handle.offset as i64 - (k as i64) * stride;
        (((raw % byte_length) + byte_length) % byte_length) as u32
    }

    /// Read the next live generation, newest first.
    pub fn next(&mut self) -> Option<Result<(u32, PayloadView<'_>), Error<S::Error>>> {
        let slot_count = self.handle.byte_length / self.handle.stride;
        if self.done || self.k >= slot_count {
            return None;
        }

        let offset = self.offset_for(self.k);
        self.k += 1;

        let stride = self.handle.stride as usize;
        if let Err(e) = self
            .store
            .read(self.handle.base_address + offset, &mut self.buf[..stride])
        {
            return Some(Err(Error::StoreFailure(e)));
        }

        let mut header = [0u8; HEADER_SIZE];
        header.copy_from_slice(&self.buf[..HEADER_SIZE]);
        let version = decode_version(&header, self.handle.little_endian);
        if version == HEADER_INIT_VALUE32 {
            self.done = true;
            return None;
        }
        Some(Ok((version, PayloadView::new(&self.buf[HEADER_SIZE..stride]))))
    }
}

#[cfg(feature = "async")]
impl<'a, S: crate::storage::AsyncReadStorage> List<'a, S> {
    /// Async equivalent of [`List::next`].
    pub async fn next_async(&mut self) -> Option<Result<(u32, PayloadView<'_>), Error<S::Error>>> {
        let slot_count = self.handle.byte_length / self.handle.stride;
        if self.done || self.k >= slot_count {
            return None;
        }

        let offset = self.offset_for(self.k);
        self.k += 1;

        let stride = self.handle.stride as usize;
        if let Err(e) = self
            .store
            .read(self.handle.base_address + offset, &mut self.buf[..stride])
            .await
        {
            return Some(Err(Error::StoreFailure(e)));
        }

        let mut header = [0u8; HEADER_SIZE];
        header.copy_from_slice(&self.buf[..HEADER_SIZE]);
        let version = decode_version(&header, self.handle.little_endian);
        if version == HEADER_INIT_VALUE32 {
            self.done = true;
            return None;
        }
        Some(Ok((version, PayloadView::new(&self.buf[HEADER_SIZE..stride]))))
    }
}
