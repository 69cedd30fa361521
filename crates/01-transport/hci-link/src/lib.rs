//! Cross-context HCI link transport.
//!
//! Bridges an interrupt/callback-driven packet source (radio-controller HCI
//! events, DMA completions) to a single consumer task that polls or
//! block-waits for data:
//!
//! * [`SyncGate`] / [`Signal`] – critical section around the frame store and
//!   the readiness semaphore that wakes a blocked consumer.
//! * [`Controller`] – seam to the peer firmware API: callback registration,
//!   outbound readiness, and the direct send path.
//! * [`RxSink`] – the producer-side handle invoked from the controller's
//!   callback context; non-blocking by contract.
//! * [`HciLink`] – the public surface: lifecycle, `send`, `recv`,
//!   `recv_blocking`, `wait_for_data`, and drop accounting.
//!
//! Single producer, single consumer. One link instance owns one ring; there
//! is no global state, so independent links (one per radio channel) coexist.

mod controller;
mod error;
mod gate;
mod link;

pub use controller::Controller;
pub use error::LinkError;
pub use gate::{Signal, SyncGate, Wait};
pub use link::{HciLink, LinkConfig, LinkState, Recv, RxSink, DEFAULT_RING_CAPACITY};

pub use hci_ring::{FrameFormat, FrameRead, RingError, StoreError};
