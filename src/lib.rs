//! # ringstore
//!
//! A wear-leveled, log-structured "latest value" store for byte-addressable
//! non-volatile memory (EEPROM, FRAM, and similar devices) on embedded
//! systems. Designed for `no_std` environments with no heap allocation.
//!
//! ## Features
//!
//! ### Ring Store
//! - Write-forward, wear-leveling slot allocation over a fixed-size
//!   partition
//! - Linear or binary-search head recovery after an unclean power cycle
//! - Physical-order and logical (newest-to-oldest) enumeration of slots
//!
//! ### Storage Abstraction
//! - Minimal `ReadStorage`/`Storage` traits capturing exactly what the ring
//!   store needs from a backing medium
//! - Async and sync operation modes
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! ringstore = "0.1.0"
//! ```
//!
//! ### Basic Example
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
//! format(&mut device, opts)?;
//! let mut handle = init(&mut device, opts)?;
//!
//! handle.write(&mut device, b"v1")?;
//! # Ok::<(), ringstore::store::Error<()>>(())
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based IoT devices (Raspberry Pi, etc.)
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `async`: Enable async/await support for non-blocking operations
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]
#![doc(html_root_url = "https://docs.rs/ringstore/")]

/// Storage abstraction layer: the `ReadStorage`/`Storage` traits the ring
/// store needs from a backing medium.
///
/// Provides the minimal blocking and async read/write interface, without
/// committing to any particular device family.
pub mod storage;

/// The wear-leveled ring store: layout, head recovery, and enumeration.
pub mod store;
