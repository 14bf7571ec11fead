//! Head recovery: reconstructing the location of the most recent write after
//! an unclean power cycle, by scanning slot headers on a possibly-wrapped
//! ring.

use crate::storage::ReadStorage;
use crate::store::codec::{decode_version, HEADER_INIT_VALUE32, HEADER_SIZE};
use crate::store::error::Error;

/// Location and version of the head slot, or emptiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadInfo {
    /// Version of the head slot. `0` when `empty`.
    pub version: u32,
    /// Byte offset of the head slot relative to `base_address`. `0` when
    /// `empty`.
    pub offset: u32,
    /// `true` iff no non-erased slot was found.
    pub empty: bool,
}

impl HeadInfo {
    const EMPTY: HeadInfo = HeadInfo {
        version: 0,
        offset: 0,
        empty: true,
    };
}

fn read_version<S: ReadStorage>(
    store: &mut S,
    base_address: u32,
    stride: u32,
    slot_index: u32,
    little_endian: bool,
) -> Result<u32, Error<S::Error>> {
    let mut header = [0u8; HEADER_SIZE];
    store.read(base_address + slot_index * stride, &mut header)?;
    Ok(decode_version(&header, little_endian))
}

/// Linear recovery: scan slots `0, 1, ..., slot_count - 1` in physical
/// order, tracking the maximum version seen, and stop at the first erased
/// slot (or after exhausting the ring).
pub fn find_linear<S: ReadStorage>(
    store: &mut S,
    base_address: u32,
    stride: u32,
    slot_count: u32,
    little_endian: bool,
) -> Result<HeadInfo, Error<S::Error>> {
    let mut best: Option<HeadInfo> = None;

    for slot in 0..slot_count {
        let version = read_version(store, base_address, stride, slot, little_endian)?;
        if version == HEADER_INIT_VALUE32 {
            break;
        }
        let is_new_best = match best {
            Some(b) => version > b.version,
            None => true,
        };
        if is_new_best {
            best = Some(HeadInfo {
                version,
                offset: slot * stride,
                empty: false,
            });
        }
    }

    Ok(best.unwrap_or(HeadInfo::EMPTY))
}

/// Binary recovery: exploit the fact that, barring the wrap point, version
/// values increase in physical order. After a wrap there are exactly two
/// contiguous increasing runs (`[0..=head]` newer, `[head+1..]` older) with
/// every value in the first strictly greater than every value in the
/// second; an iterative `(lo, hi, lo_version)` search locates the boundary
/// in `O(log slot_count)` header reads.
pub fn find_binary<S: ReadStorage>(
    store: &mut S,
    base_address: u32,
    stride: u32,
    slot_count: u32,
    little_endian: bool,
) -> Result<HeadInfo, Error<S::Error>> {
    let version0 = read_version(store, base_address, stride, 0, little_endian)?;
    if version0 == HEADER_INIT_VALUE32 {
        return Ok(HeadInfo::EMPTY);
    }
    if slot_count == 1 {
        return Ok(HeadInfo {
            version: version0,
            offset: 0,
            empty: false,
        });
    }

    let mut lo = 0u32;
    let mut hi = slot_count - 1;
    let mut lo_version = version0;

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let version_mid = read_version(store, base_address, stride, mid, little_endian)?;

        if version_mid < lo_version || version_mid == HEADER_INIT_VALUE32 {
            // Head lies in [lo, mid - 1]; lo_version is unchanged.
            hi = mid - 1;
            continue;
        }

        let version_mid_next =
            read_version(store, base_address, stride, mid + 1, little_endian)?;

        if version_mid > version_mid_next || version_mid_next == HEADER_INIT_VALUE32 {
            return Ok(HeadInfo {
                version: version_mid,
                offset: mid * stride,
                empty: false,
            });
        }

        lo = mid + 1;
        lo_version = version_mid_next;
    }

    Ok(HeadInfo {
        version: lo_version,
        offset: lo * stride,
        empty: false,
    })
}
