//! Mock controller standing in for the radio-controller firmware.
//!
//! [`MockController`] implements the [`Controller`] seam entirely in memory:
//! tests script inbound packets through [`MockController::inject`], which
//! drives the attached sink the same way the vendor callback would, and
//! capture the outbound side through [`MockController::sent_packets`].

use std::sync::atomic::{AtomicBool, Ordering};

use hci_link::{Controller, HciLink, LinkConfig, LinkError, RxSink};
use parking_lot::Mutex;

/// Scriptable in-memory [`Controller`].
#[derive(Default)]
pub struct MockController {
    sink: Mutex<Option<RxSink>>,
    ready: AtomicBool,
    sent: Mutex<Vec<Vec<u8>>>,
    refuse_attach: AtomicBool,
}

impl MockController {
    /// Creates a controller that reports ready to send.
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
            ..Self::default()
        }
    }

    /// Creates a controller whose `attach` fails, for init-error tests.
    pub fn refusing_attach() -> Self {
        let controller = Self::new();
        controller.refuse_attach.store(true, Ordering::Relaxed);
        controller
    }

    /// Delivers one inbound packet through the attached sink, mimicking the
    /// controller's receive callback. Panics when no link is attached, which
    /// in a test means the lifecycle is being driven out of order.
    pub fn inject(&self, indicator: Option<u8>, payload: &[u8]) {
        let sink = self.sink.lock();
        sink.as_ref()
            .expect("inject requires an attached link")
            .push(indicator, payload);
    }

    /// Returns a clone of the attached sink so tests can push from their own
    /// producer threads.
    pub fn sink(&self) -> RxSink {
        self.sink
            .lock()
            .as_ref()
            .expect("sink requires an attached link")
            .clone()
    }

    /// Flips the outbound readiness flag.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Relaxed);
    }

    /// True while a sink is attached.
    pub fn is_attached(&self) -> bool {
        self.sink.lock().is_some()
    }

    /// Packets handed over by `HciLink::send`, oldest first.
    pub fn sent_packets(&self) -> Vec<Vec<u8>> {
        self.sent.lock().clone()
    }
}

impl Controller for MockController {
    fn attach(&self, sink: RxSink) -> Result<(), LinkError> {
        if self.refuse_attach.load(Ordering::Relaxed) {
            return Err(LinkError::Controller("attach refused"));
        }
        *self.sink.lock() = Some(sink);
        Ok(())
    }

    fn detach(&self) {
        *self.sink.lock() = None;
    }

    fn can_send(&self) -> bool {
        self.ready.load(Ordering::Relaxed)
    }

    fn send(&self, packet: &[u8]) -> bool {
        self.sent.lock().push(packet.to_vec());
        true
    }
}

/// Creates a running link over a fresh [`MockController`].
pub fn make_link(config: LinkConfig) -> HciLink<MockController> {
    let mut link = HciLink::new(MockController::new(), config);
    link.init().expect("mock link init");
    link
}
