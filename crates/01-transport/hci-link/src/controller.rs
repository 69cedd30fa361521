//! Seam to the peer firmware API.
//!
//! The real implementations wrap a vendor controller interface: VHCI
//! callback registration on one platform, paired event/ACL callbacks over
//! inter-processor messaging on another. Tests substitute an in-memory
//! double. Either way the contract is the same: the controller calls the
//! attached [`RxSink`](crate::RxSink) from its own context for every inbound
//! packet, and exposes an explicit readiness flag for the outbound path so
//! the link never has to buffer sends.

use crate::{LinkError, RxSink};

/// Peer controller interface used by [`HciLink`](crate::HciLink).
///
/// Implementations must tolerate `attach`/`detach` being called exactly once
/// each, in that order, per link lifecycle.
pub trait Controller: Send + Sync {
    /// Registers the producer sink. The controller must invoke
    /// [`RxSink::push`](crate::RxSink::push) for every inbound packet from
    /// this point on, from whatever context it delivers packets in.
    fn attach(&self, sink: RxSink) -> Result<(), LinkError>;

    /// Unregisters the producer sink. After this returns the controller
    /// should stop delivering packets; late deliveries through a stale sink
    /// are dropped by the sink itself.
    fn detach(&self);

    /// True when the controller can accept one outbound packet right now.
    /// This is the peer's own flow control; the link adds none on top.
    fn can_send(&self) -> bool;

    /// Hands one outbound packet to the controller. Returns `false` when the
    /// controller refused it. Must not be called unless [`Self::can_send`]
    /// reported readiness.
    fn send(&self, packet: &[u8]) -> bool;
}
