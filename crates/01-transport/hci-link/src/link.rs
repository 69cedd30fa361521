//! Public transport surface and lifecycle.
//!
//! One [`HciLink`] owns one framed ring and one controller seam. The
//! lifecycle is deliberately one-shot per instance:
//!
//! ```text
//! Uninitialized --init()--> Running --deinit()--> Deinitialized
//! ```
//!
//! `init` allocates the ring, builds the gate, and attaches the producer
//! sink to the controller; `deinit` detaches, poisons outstanding sinks,
//! and zeroes the ring. Every operation outside `Running` fails with a
//! distinct error instead of silently no-op-ing. A deinitialized instance
//! stays spent; a fresh instance restarts the lifecycle (which is also the
//! only thing that resets the drop counter).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use hci_ring::{FrameCodec, FrameFormat, FrameRead, StoreError};

use crate::{Controller, LinkError, SyncGate, Wait};

/// Default ring capacity: comfortably holds a dozen or two typical HCI
/// events/ACL packets.
pub const DEFAULT_RING_CAPACITY: usize = 4096;

/// Every Nth dropped frame is logged, after the first, so sustained overflow
/// cannot become a log storm.
const DROP_LOG_INTERVAL: u64 = 64;

/// Construction parameters for one link instance.
#[derive(Debug, Clone, Copy)]
pub struct LinkConfig {
    /// Total ring capacity in bytes (one byte stays reserved).
    pub capacity: usize,
    /// Framing convention, fixed for the lifetime of the link.
    pub format: FrameFormat,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_RING_CAPACITY,
            format: FrameFormat::IndicatorCounted,
        }
    }
}

/// Lifecycle state of a link instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Constructed; no ring, no callback registered.
    Uninitialized,
    /// Steady state: send/recv/wait are valid.
    Running,
    /// Torn down; the instance is spent.
    Deinitialized,
}

/// Outcome of one receive attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recv {
    /// No frame was available (or the blocking wait timed out).
    Empty,
    /// A frame was copied into the caller's buffer; the value counts the
    /// bytes written, indicator byte included when the format carries one.
    Frame(usize),
    /// A frame existed but exceeded the caller's buffer and was discarded.
    TooLarge { needed: usize },
}

struct LinkShared {
    gate: SyncGate<FrameCodec>,
    dropped: AtomicU64,
    /// Cleared at deinit so a stale sink drops late deliveries.
    attached: AtomicBool,
}

/// Producer-side handle invoked from the controller's callback context.
///
/// Contract for implementors of [`Controller`]: `push` must be treated as a
/// restricted synchronous callback — it never blocks beyond the gate's
/// bounded critical section, never allocates, and never fails loudly. A
/// frame that does not fit is dropped whole and counted.
#[derive(Clone)]
pub struct RxSink {
    shared: Arc<LinkShared>,
}

impl RxSink {
    /// Stores one inbound packet and wakes the consumer.
    ///
    /// Best-effort: on overflow the frame is discarded in its entirety, the
    /// drop counter advances by one, and a rate-limited warning is emitted.
    pub fn push(&self, indicator: Option<u8>, payload: &[u8]) {
        if !self.shared.attached.load(Ordering::Acquire) {
            return;
        }

        let result = self.shared.gate.lock().store(indicator, payload);
        match result {
            Ok(()) => self.shared.gate.notify(),
            Err(StoreError::Overflow { needed, free }) => {
                let drops = self.shared.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                if drops == 1 || drops % DROP_LOG_INTERVAL == 0 {
                    warn!(needed, free, drops, "rx ring full, dropping frame");
                }
            }
            Err(err) => {
                // Indicator/format mismatch is a wiring bug, not backpressure;
                // keep it out of the drop statistics but make it visible.
                warn!(%err, "inbound frame rejected");
            }
        }
    }
}

/// Framed ring-buffer transport between a controller callback and one
/// consumer task.
pub struct HciLink<C: Controller> {
    controller: C,
    config: LinkConfig,
    state: LinkState,
    shared: Option<Arc<LinkShared>>,
    /// Final drop count, captured at deinit for post-mortem reads.
    dropped_at_deinit: u64,
}

impl<C: Controller> HciLink<C> {
    /// Creates an uninitialized link around `controller`.
    pub fn new(controller: C, config: LinkConfig) -> Self {
        Self {
            controller,
            config,
            state: LinkState::Uninitialized,
            shared: None,
            dropped_at_deinit: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// The controller this link drives.
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Allocates the ring, constructs the gate, and attaches the producer
    /// sink to the controller. Valid exactly once per instance.
    pub fn init(&mut self) -> Result<(), LinkError> {
        match self.state {
            LinkState::Uninitialized => {}
            LinkState::Running => return Err(LinkError::AlreadyRunning),
            LinkState::Deinitialized => return Err(LinkError::Deinitialized),
        }

        let codec = FrameCodec::new(self.config.capacity, self.config.format)?;
        let shared = Arc::new(LinkShared {
            gate: SyncGate::new(codec),
            dropped: AtomicU64::new(0),
            attached: AtomicBool::new(true),
        });

        self.controller.attach(RxSink {
            shared: Arc::clone(&shared),
        })?;

        self.shared = Some(shared);
        self.state = LinkState::Running;
        info!(
            capacity = self.config.capacity,
            format = ?self.config.format,
            "hci link running"
        );
        Ok(())
    }

    /// Detaches the callback, poisons stale sinks, and zeroes the ring.
    pub fn deinit(&mut self) -> Result<(), LinkError> {
        let shared = self.running()?;
        let shared = Arc::clone(shared);

        self.controller.detach();
        shared.attached.store(false, Ordering::Release);
        shared.gate.lock().clear();

        self.dropped_at_deinit = shared.dropped.load(Ordering::Relaxed);
        self.shared = None;
        self.state = LinkState::Deinitialized;
        info!("hci link deinitialized");
        Ok(())
    }

    /// True when the controller can accept an outbound packet right now.
    /// Always false outside `Running`.
    pub fn can_send(&self) -> bool {
        self.state == LinkState::Running && self.controller.can_send()
    }

    /// Forwards one packet directly to the controller.
    ///
    /// Not buffered by the ring: the controller's own readiness flag is the
    /// flow control, so an unready controller yields [`LinkError::NotReady`]
    /// with no local queuing or retry.
    pub fn send(&self, packet: &[u8]) -> Result<(), LinkError> {
        self.running()?;
        if !self.controller.can_send() {
            return Err(LinkError::NotReady);
        }
        if !self.controller.send(packet) {
            return Err(LinkError::Controller("send rejected"));
        }
        Ok(())
    }

    /// One non-blocking receive attempt.
    pub fn recv(&self, out: &mut [u8]) -> Result<Recv, LinkError> {
        let shared = self.running()?;
        let outcome = shared.gate.lock().read(out);
        Ok(match outcome {
            FrameRead::Empty => Recv::Empty,
            FrameRead::Frame(n) => Recv::Frame(n),
            FrameRead::TooLarge { needed } => {
                warn!(needed, buf = out.len(), "rx buffer too small, frame discarded");
                Recv::TooLarge { needed }
            }
            FrameRead::Inconsistent { needed, used } => {
                // Half a frame is visible, which the single-producer
                // discipline rules out; report "no packet" after logging,
                // leaving the bytes in place for inspection.
                warn!(needed, used, "incomplete frame in rx ring");
                Recv::Empty
            }
        })
    }

    /// Receives one frame, blocking until data arrives or `wait` expires.
    ///
    /// The whole call is bounded by one deadline computed up front; wakeups
    /// that find the ring already drained go back to waiting on the
    /// remaining budget rather than restarting it. Timeout is reported as
    /// [`Recv::Empty`].
    pub fn recv_blocking(&self, out: &mut [u8], wait: Wait) -> Result<Recv, LinkError> {
        let deadline = wait.deadline();
        loop {
            match self.recv(out)? {
                Recv::Empty => {}
                outcome => return Ok(outcome),
            }
            let signaled = match wait {
                Wait::Poll => false,
                _ => self.running()?.gate.wait_deadline(deadline),
            };
            if !signaled {
                return Ok(Recv::Empty);
            }
        }
    }

    /// Blocks until data is available or `wait` expires.
    ///
    /// Returns `true` immediately, without touching the semaphore, whenever
    /// bytes are already stored. A `true` result is a hint: the caller must
    /// still find out via `recv` whether a frame survives until it gets
    /// there.
    pub fn wait_for_data(&self, wait: Wait) -> Result<bool, LinkError> {
        let shared = self.running()?;
        if shared.gate.lock().used() > 0 {
            return Ok(true);
        }
        Ok(shared.gate.wait(wait))
    }

    /// True when a complete length header is already stored.
    pub fn has_data(&self) -> bool {
        match &self.shared {
            Some(shared) => shared.gate.lock().has_frame(),
            None => false,
        }
    }

    /// Frames refused for lack of space since `init()`. Diagnostics only.
    /// After `deinit()` this keeps reporting the final count.
    pub fn dropped_frames(&self) -> u64 {
        match &self.shared {
            Some(shared) => shared.dropped.load(Ordering::Relaxed),
            None => self.dropped_at_deinit,
        }
    }

    fn running(&self) -> Result<&Arc<LinkShared>, LinkError> {
        match self.state {
            LinkState::Running => Ok(self
                .shared
                .as_ref()
                .expect("running link always has shared state")),
            LinkState::Uninitialized => Err(LinkError::NotInitialized),
            LinkState::Deinitialized => Err(LinkError::Deinitialized),
        }
    }
}
