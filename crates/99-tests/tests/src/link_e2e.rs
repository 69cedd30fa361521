//! End-to-end lifecycle and surface tests over the mock controller.

use hci_link::{FrameFormat, HciLink, LinkConfig, LinkError, LinkState, Recv, Wait};
use mock::{make_link, MockController};

fn small_link(capacity: usize, format: FrameFormat) -> HciLink<MockController> {
    make_link(LinkConfig { capacity, format })
}

#[test]
fn vhci_style_event_flow() {
    // ESP convention: callback delivers indicator + payload, length counts both.
    let link = small_link(4096, FrameFormat::IndicatorCounted);

    // LE Meta event followed by an ACL fragment, as the controller delivers them.
    link.controller().inject(Some(0x04), &[0x3E, 0x0C, 0x01]);
    link.controller().inject(Some(0x02), &[0x20, 0x00, 0x02, 0x00]);

    let mut out = [0u8; 64];
    assert_eq!(link.recv(&mut out).unwrap(), Recv::Frame(4));
    assert_eq!(&out[..4], &[0x04, 0x3E, 0x0C, 0x01]);
    assert_eq!(link.recv(&mut out).unwrap(), Recv::Frame(5));
    assert_eq!(&out[..5], &[0x02, 0x20, 0x00, 0x02, 0x00]);
    assert_eq!(link.recv(&mut out).unwrap(), Recv::Empty);
}

#[test]
fn outbound_path_is_direct_and_gated() {
    let link = make_link(LinkConfig::default());

    link.send(&[0x01, 0x03, 0x0C, 0x00]).expect("send reset");
    assert_eq!(link.controller().sent_packets(), vec![vec![0x01, 0x03, 0x0C, 0x00]]);

    link.controller().set_ready(false);
    assert!(!link.can_send());
    assert_eq!(link.send(&[0x01]), Err(LinkError::NotReady));
    // Refusal left nothing queued anywhere.
    assert_eq!(link.controller().sent_packets().len(), 1);

    link.controller().set_ready(true);
    link.send(&[0x02]).expect("send after recovery");
    assert_eq!(link.controller().sent_packets().len(), 2);
}

#[test]
fn attach_failure_leaves_link_uninitialized() {
    let mut link = HciLink::new(MockController::refusing_attach(), LinkConfig::default());
    assert_eq!(link.init(), Err(LinkError::Controller("attach refused")));
    assert_eq!(link.state(), LinkState::Uninitialized);
    assert_eq!(link.recv(&mut [0u8; 4]), Err(LinkError::NotInitialized));
}

#[test]
fn deinit_detaches_and_spends_the_instance() {
    let mut link = make_link(LinkConfig::default());
    link.controller().inject(Some(0x04), &[0x13, 0x00]);
    assert!(link.has_data());

    link.deinit().expect("deinit");
    assert!(!link.controller().is_attached());
    assert!(!link.has_data());
    assert_eq!(link.wait_for_data(Wait::Poll), Err(LinkError::Deinitialized));
    assert_eq!(link.init(), Err(LinkError::Deinitialized));
}

#[test]
fn sustained_overflow_counts_every_refused_frame() {
    // 16 usable bytes minus the reserved slot; each frame below needs 7.
    let link = small_link(16, FrameFormat::PayloadOnly);

    link.controller().inject(None, b"AAAAA");
    link.controller().inject(None, b"BBBBB");
    for _ in 0..10 {
        link.controller().inject(None, b"CCCCC");
    }
    assert_eq!(link.dropped_frames(), 10);

    // The stored frames are intact; the refused ones left no trace.
    let mut out = [0u8; 16];
    assert_eq!(link.recv(&mut out).unwrap(), Recv::Frame(5));
    assert_eq!(&out[..5], b"AAAAA");
    assert_eq!(link.recv(&mut out).unwrap(), Recv::Frame(5));
    assert_eq!(&out[..5], b"BBBBB");
    assert_eq!(link.recv(&mut out).unwrap(), Recv::Empty);

    // Draining does not reset diagnostics.
    assert_eq!(link.dropped_frames(), 10);
}

#[test]
fn fresh_instance_restarts_drop_accounting() {
    let link = small_link(8, FrameFormat::PayloadOnly);
    link.controller().inject(None, &[0u8; 10]);
    assert_eq!(link.dropped_frames(), 1);

    let replacement = small_link(8, FrameFormat::PayloadOnly);
    assert_eq!(replacement.dropped_frames(), 0);
}

#[test]
fn too_large_is_distinct_from_empty() {
    let link = small_link(64, FrameFormat::IndicatorCounted);
    link.controller().inject(Some(0x02), &[0x55; 30]);

    let mut small = [0u8; 8];
    assert_eq!(
        link.recv(&mut small).unwrap(),
        Recv::TooLarge { needed: 31 }
    );
    assert_eq!(link.recv(&mut small).unwrap(), Recv::Empty);
}

#[test]
fn recv_blocking_returns_data_already_stored() {
    let link = small_link(64, FrameFormat::PayloadOnly);
    link.controller().inject(None, &[1, 2, 3]);

    let mut out = [0u8; 8];
    // Forever must not park when a frame is already waiting.
    assert_eq!(
        link.recv_blocking(&mut out, Wait::Forever).unwrap(),
        Recv::Frame(3)
    );
}

#[test]
fn two_links_are_independent() {
    let left = small_link(64, FrameFormat::PayloadOnly);
    let right = small_link(64, FrameFormat::PayloadOnly);

    left.controller().inject(None, b"left");
    assert!(left.has_data());
    assert!(!right.has_data());

    let mut out = [0u8; 8];
    assert_eq!(right.recv(&mut out).unwrap(), Recv::Empty);
    assert_eq!(left.recv(&mut out).unwrap(), Recv::Frame(4));
    assert_eq!(&out[..4], b"left");
}
