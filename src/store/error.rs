//! Error type for the ring store.

/// Errors surfaced by the ring store.
///
/// `E` is the backing [`crate::storage::ReadStorage::Error`] /
/// [`crate::storage::Storage::Error`] type; a failing store call is wrapped
/// rather than erased so the caller can still inspect what the medium said.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error<E> {
    /// The backing store failed; never retried internally.
    StoreFailure(E),
    /// `write` was called with an empty payload, or one that doesn't fit in
    /// `stride - HEADER_SIZE` bytes; or `Options` describes an invalid
    /// layout (`stride` out of bounds, or `byte_length` smaller than a
    /// single slot).
    InvalidPayload,
    /// `format`/`init` was asked to operate on a partition
    /// (`base_address..base_address + byte_length`) that exceeds the
    /// backing store's capacity.
    OutOfRange,
    /// `read` found a header inconsistent with the handle's expected
    /// version: a stale handle, or the medium changed underneath it.
    VersionMismatch,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Error::StoreFailure(err)
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::StoreFailure(e) => defmt::write!(f, "StoreFailure({})", e),
            Error::InvalidPayload => defmt::write!(f, "InvalidPayload"),
            Error::OutOfRange => defmt::write!(f, "OutOfRange"),
            Error::VersionMismatch => defmt::write!(f, "VersionMismatch"),
        }
    }
}
