//! Storage primitives for the HCI link transport.
//!
//! This crate holds the pieces that know nothing about threads or
//! controllers:
//! * [`RingStore`] – fixed-capacity circular byte store with head/tail cursors.
//! * [`FrameCodec`] – length-prefixed packet framing on top of the store,
//!   guaranteeing a frame is either fully stored or not stored at all.
//! * [`RingError`] / [`StoreError`] – small error surface for capacity
//!   validation and framing misuse.
//!
//! Callers supply their own locking; every operation here runs in bounded
//! time proportional to one frame.

mod error;
mod frame;
mod ring;

pub use error::{RingError, RingResult, StoreError};
pub use frame::{FrameCodec, FrameFormat, FrameRead, LEN_PREFIX_SIZE};
pub use ring::RingStore;
