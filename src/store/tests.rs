use super::*;
use crate::storage::{ReadStorage, Storage};

const MOCK_CAPACITY: usize = 256;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
struct MockError;

struct MockStore {
    memory: [u8; MOCK_CAPACITY],
}

impl MockStore {
    fn new() -> Self {
        Self {
            memory: [0xFF; MOCK_CAPACITY],
        }
    }
}

impl ReadStorage for MockStore {
    type Error = MockError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let offset = offset as usize;
        if offset + bytes.len() > self.memory.len() {
            return Err(MockError);
        }
        bytes.copy_from_slice(&self.memory[offset..offset + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        MOCK_CAPACITY
    }
}

impl Storage for MockStore {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let offset = offset as usize;
        if offset + bytes.len() > self.memory.len() {
            return Err(MockError);
        }
        self.memory[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

// ---- P1/P2: format + init on fresh media ----

#[test]
fn format_writes_all_ones() {
    let mut store = MockStore::new();
    store.memory = [0x00; MOCK_CAPACITY]; // start from something other than erased
    let opts = Options::new(64).stride(8);

    format(&mut store, opts).unwrap();

    assert!(store.memory[..64].iter().all(|&b| b == 0xFF));
}

#[test]
fn init_after_format_is_empty() {
    let mut store = MockStore::new();
    let opts = Options::new(64).stride(8);

    format(&mut store, opts).unwrap();
    let handle = init(&mut store, opts).unwrap();

    assert!(handle.is_empty());
    assert_eq!(handle.version(), 0);
    assert_eq!(handle.offset(), 0);
}

// ---- S1, S2: sequential writes ----

#[test]
fn s1_first_write() {
    let mut store = MockStore::new();
    let opts = Options::new(64).stride(8);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();

    handle.write(&mut store, &[1, 2, 3, 4]).unwrap();

    assert_eq!(handle.offset(), 0);
    assert_eq!(handle.version(), 0);
    assert!(!handle.is_empty());

    let mut buf = [0u8; 8];
    let payload = handle.read(&mut store, &mut buf).unwrap().unwrap();
    assert_eq!(&payload[..4], &[1, 2, 3, 4]);

    assert_eq!(store.memory[0], 0x00);
    assert_eq!(&store.memory[4..8], &[1, 2, 3, 4]);
}

#[test]
fn s2_second_write() {
    let mut store = MockStore::new();
    let opts = Options::new(64).stride(8);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();

    handle.write(&mut store, &[1, 2, 3, 4]).unwrap();
    handle.write(&mut store, &[5, 6, 7, 8]).unwrap();

    assert_eq!(handle.offset(), 8);
    assert_eq!(handle.version(), 1);

    let mut buf = [0u8; 8];
    let payload = handle.read(&mut store, &mut buf).unwrap().unwrap();
    assert_eq!(&payload[..4], &[5, 6, 7, 8]);
}

// ---- S3, S4: wrap ----

fn write_n_times(handle: &mut Handle, store: &mut MockStore, n: u32) {
    for _ in 0..n {
        handle.write(store, &[7, 8, 9, 0]).unwrap();
    }
}

#[test]
fn s3_wrap_even() {
    let mut store = MockStore::new();
    let opts = Options::new(64).stride(8);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();

    write_n_times(&mut handle, &mut store, 2 * 8 + 4);

    assert_eq!(handle.offset(), 24);
    assert_eq!(handle.version(), 19);
}

#[test]
fn s4_wrap_odd() {
    let mut store = MockStore::new();
    let opts = Options::new(64).stride(8);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();

    write_n_times(&mut handle, &mut store, 2 * 8 + 5);

    assert_eq!(handle.offset(), 32);
    assert_eq!(handle.version(), 20);
}

// ---- S5: re-init after wrap, both head finders agree (P5) ----

#[test]
fn s5_reinit_after_wrap_matches() {
    let mut store = MockStore::new();
    let opts = Options::new(64).stride(8);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();
    write_n_times(&mut handle, &mut store, 2 * 8 + 5);

    let binary = init(&mut store, opts).unwrap();
    let linear = init(&mut store, opts.full_scan(true)).unwrap();

    assert_eq!(binary.version(), handle.version());
    assert_eq!(binary.offset(), handle.offset());
    assert!(!binary.is_empty());
    assert_eq!(binary.version(), linear.version());
    assert_eq!(binary.offset(), linear.offset());
    assert_eq!(binary.is_empty(), linear.is_empty());
}

// ---- Wrap boundary when byte_length is not a multiple of stride: the
// wrap must land at the last whole slot, never past it into the residual
// unused tail, and a re-init must agree with the writer (P5/R1 on a
// byte_length that Options::validate legitimately admits). ----

#[test]
fn wrap_honors_slot_count_not_byte_length_when_not_a_multiple() {
    let mut store = MockStore::new();
    // byte_length=60, stride=8 -> slot_count=7, 4 residual bytes unused.
    let opts = Options::new(60).stride(8);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();

    write_n_times(&mut handle, &mut store, 8);

    // The 8th write must wrap back to slot 0, not spill into offset 56
    // (which would write bytes 56..64, past the 60-byte partition).
    assert_eq!(handle.offset(), 0);
    assert_eq!(handle.version(), 7);
    assert!(handle.offset() + handle.stride() <= 7 * handle.stride());

    let binary = init(&mut store, opts).unwrap();
    let linear = init(&mut store, opts.full_scan(true)).unwrap();
    assert_eq!(binary, handle);
    assert_eq!(linear, handle);
}

// ---- S6: list order when wrapped ----

#[test]
fn s6_list_order_when_wrapped() {
    let mut store = MockStore::new();
    let opts = Options::new(64).stride(16);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();

    for v in [42u8, 37, 77, 99, 69, 0] {
        handle.write(&mut store, &[v]).unwrap();
    }

    assert_eq!(handle.offset(), 16);
    assert_eq!(handle.version(), 5);

    let mut versions = heapless_vec();
    let mut list = handle.list(&mut store);
    while let Some(item) = list.next() {
        let (version, _payload) = item.unwrap();
        versions.push(version);
    }

    assert_eq!(versions.as_slice(), &[5, 4, 3, 2]);
}

// tiny stand-in for a fixed-capacity Vec, since this module has no heapless
// dependency and pulling in `std::vec::Vec` in a `no_std`-flavored test
// would defeat the point of testing the no_std path.
fn heapless_vec() -> ArrayVec {
    ArrayVec::default()
}

#[derive(Default)]
struct ArrayVec {
    items: [u32; 8],
    len: usize,
}

impl ArrayVec {
    fn push(&mut self, v: u32) {
        self.items[self.len] = v;
        self.len += 1;
    }

    fn as_slice(&self) -> &[u32] {
        &self.items[..self.len]
    }
}

// ---- S7: listSlots on a freshly formatted partition ----

#[test]
fn s7_list_slots_all_erased() {
    let mut store = MockStore::new();
    let opts = Options::new(56).base_address(8).stride(8);
    format(&mut store, opts).unwrap();

    let mut count = 0;
    let mut slots = list_slots(&mut store, opts);
    while let Some(item) = slots.next() {
        let (version, _payload) = item.unwrap();
        assert_eq!(version, HEADER_INIT_VALUE32);
        count += 1;
    }
    assert_eq!(count, 7);
}

// ---- P6: list stops at first erased slot / bounded length ----

#[test]
fn p6_list_stops_and_is_bounded() {
    let mut store = MockStore::new();
    let opts = Options::new(64).stride(8);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();

    handle.write(&mut store, &[1]).unwrap();
    handle.write(&mut store, &[2]).unwrap();
    handle.write(&mut store, &[3]).unwrap();

    let mut versions = heapless_vec();
    let mut list = handle.list(&mut store);
    while let Some(item) = list.next() {
        let (version, _payload) = item.unwrap();
        versions.push(version);
    }

    assert_eq!(versions.as_slice(), &[2, 1, 0]);
    assert!(versions.as_slice().len() <= opts.slot_count() as usize);
}

// ---- R2: two inits with no intervening writes agree ----

#[test]
fn r2_double_init_equal() {
    let mut store = MockStore::new();
    let opts = Options::new(64).stride(8);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();
    handle.write(&mut store, &[1, 2, 3]).unwrap();

    let a = init(&mut store, opts).unwrap();
    let b = init(&mut store, opts).unwrap();
    assert_eq!(a, b);
}

// ---- R1: format + init over a freshly written store agrees with the
// writer's own bookkeeping, i.e. re-init after writes (without an
// intervening format) reproduces the handle the writer already has.

#[test]
fn r1_init_after_writes_matches_writer_state() {
    let mut store = MockStore::new();
    let opts = Options::new(64).stride(8);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();
    write_n_times(&mut handle, &mut store, 5);

    let reinit = init(&mut store, opts).unwrap();
    assert_eq!(reinit, handle);
}

// ---- Boundary: minimum stride ----

#[test]
fn boundary_minimum_stride_accepts_one_byte() {
    let mut store = MockStore::new();
    let opts = Options::new(40).stride(HEADER_SIZE as u32 + 1);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();

    handle.write(&mut store, &[0xAB]).unwrap();
    let mut buf = [0u8; 5];
    let payload = handle.read(&mut store, &mut buf).unwrap().unwrap();
    assert_eq!(&*payload, &[0xAB]);
}

#[test]
fn boundary_minimum_stride_rejects_two_bytes() {
    let mut store = MockStore::new();
    let opts = Options::new(40).stride(HEADER_SIZE as u32 + 1);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();

    assert_eq!(
        handle.write(&mut store, &[0xAB, 0xCD]),
        Err(Error::InvalidPayload)
    );
}

// ---- Boundary: slot_count == 1 ----

#[test]
fn boundary_single_slot_overwrites_and_increments_version() {
    let mut store = MockStore::new();
    let opts = Options::new(8).stride(8);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();

    handle.write(&mut store, &[1]).unwrap();
    assert_eq!(handle.offset(), 0);
    assert_eq!(handle.version(), 0);

    handle.write(&mut store, &[2]).unwrap();
    assert_eq!(handle.offset(), 0);
    assert_eq!(handle.version(), 1);
}

// ---- Boundary: payload exactly stride - HEADER_SIZE vs one over ----

#[test]
fn boundary_payload_length_limits() {
    let mut store = MockStore::new();
    let opts = Options::new(32).stride(8);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();

    assert!(handle.write(&mut store, &[0; 4]).is_ok());
    assert_eq!(
        handle.write(&mut store, &[0; 5]),
        Err(Error::InvalidPayload)
    );
}

// ---- Error: VersionMismatch when the medium changes under a handle ----

#[test]
fn version_mismatch_on_stale_handle() {
    let mut store = MockStore::new();
    let opts = Options::new(64).stride(8);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();
    handle.write(&mut store, &[1]).unwrap();

    // Corrupt the header in place, independent of the handle's bookkeeping.
    store.memory[0..4].copy_from_slice(&[0, 0, 0, 5]);

    let mut buf = [0u8; 8];
    assert_eq!(
        handle.read(&mut store, &mut buf),
        Err(Error::VersionMismatch)
    );
}

// ---- Error: OutOfRange / InvalidPayload at init/format time ----

#[test]
fn invalid_stride_rejected() {
    let mut store = MockStore::new();
    let opts = Options::new(64).stride(2);
    assert_eq!(format(&mut store, opts), Err(Error::InvalidPayload));
    assert_eq!(
        init(&mut store, opts).err(),
        Some(Error::InvalidPayload)
    );
}

#[test]
fn byte_length_smaller_than_stride_rejected() {
    let mut store = MockStore::new();
    let opts = Options::new(4).stride(8);
    assert_eq!(format(&mut store, opts), Err(Error::InvalidPayload));
}

#[test]
fn partition_exceeding_store_capacity_rejected() {
    let mut store = MockStore::new();
    let opts = Options::new(MOCK_CAPACITY as u32).base_address(8).stride(8);
    assert_eq!(format(&mut store, opts), Err(Error::OutOfRange));
    assert_eq!(init(&mut store, opts).err(), Some(Error::OutOfRange));
}

// ---- Little-endian header round trip through the full facade ----

#[test]
fn little_endian_header_round_trips() {
    let mut store = MockStore::new();
    let opts = Options::new(32).stride(8).little_endian(true);
    format(&mut store, opts).unwrap();
    let mut handle = init(&mut store, opts).unwrap();
    handle.write(&mut store, &[9, 9]).unwrap();

    assert_eq!(&store.memory[0..4], &[0, 0, 0, 0]);
    let reinit = init(&mut store, opts).unwrap();
    assert_eq!(reinit.version(), 0);
    assert_eq!(reinit.offset(), 0);
}

// ---- Randomized property test: binary and linear finders always agree ----

#[test]
fn property_linear_and_binary_finders_agree_across_random_histories() {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    for _ in 0..50 {
        let mut store = MockStore::new();
        let stride = 8u32;
        let slot_count = 5u32;
        let opts = Options::new(slot_count * stride).stride(stride);
        format(&mut store, opts).unwrap();
        let mut handle = init(&mut store, opts).unwrap();

        let writes = rng.gen_range(0..=20);
        for _ in 0..writes {
            let byte: u8 = rng.gen();
            handle.write(&mut store, &[byte, byte.wrapping_add(1)]).unwrap();
        }

        let binary = init(&mut store, opts).unwrap();
        let linear = init(&mut store, opts.full_scan(true)).unwrap();
        assert_eq!(binary, linear);
        assert_eq!(binary, handle);
    }
}

#[cfg(feature = "async")]
mod async_tests {
    use super::*;
    use crate::storage::{AsyncReadStorage, AsyncStorage};
    use futures::executor::block_on;

    impl AsyncReadStorage for MockStore {
        type Error = MockError;

        async fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
            ReadStorage::read(self, offset, bytes)
        }

        fn capacity(&self) -> usize {
            ReadStorage::capacity(self)
        }
    }

    impl AsyncStorage for MockStore {
        async fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
            Storage::write(self, offset, bytes)
        }
    }

    #[test]
    fn async_write_then_read_round_trips() {
        block_on(async {
            let mut store = MockStore::new();
            let opts = Options::new(64).stride(8);
            crate::store::format_async(&mut store, opts).await.unwrap();
            let mut handle = crate::store::init_async(&mut store, opts).await.unwrap();

            handle.write_async(&mut store, &[1, 2, 3]).await.unwrap();

            let mut buf = [0u8; 8];
            let payload = handle
                .read_async(&mut store, &mut buf)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(&payload[..3], &[1, 2, 3]);
        });
    }
}
