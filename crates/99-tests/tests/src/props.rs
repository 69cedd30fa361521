//! Property-based checks of the framing invariants.

use hci_ring::{FrameCodec, FrameFormat, FrameRead, StoreError};
use proptest::collection;
use proptest::prelude::*;

const CAPACITY: usize = 4096;

fn payloads() -> impl Strategy<Value = Vec<Vec<u8>>> {
    collection::vec(collection::vec(any::<u8>(), 0..64), 1..40)
}

proptest! {
    /// FIFO property: any sequence of frames that fits comes back in order
    /// with byte-identical payloads.
    #[test]
    fn stored_frames_replay_in_order(frames in payloads()) {
        let mut codec = FrameCodec::new(CAPACITY, FrameFormat::PayloadOnly)
            .expect("create codec");
        for frame in &frames {
            codec.store(None, frame).expect("aggregate fits capacity");
        }

        let mut out = [0u8; 128];
        for frame in &frames {
            match codec.read(&mut out) {
                FrameRead::Frame(n) => prop_assert_eq!(&out[..n], frame.as_slice()),
                other => prop_assert!(false, "expected frame, got {:?}", other),
            }
        }
        prop_assert_eq!(codec.read(&mut out), FrameRead::Empty);
    }

    /// Round-trip property: one frame of any size that fits survives
    /// store/read exactly, under every framing convention.
    #[test]
    fn single_frame_round_trip(payload in collection::vec(any::<u8>(), 0..512), indicator in any::<u8>()) {
        for format in [
            FrameFormat::PayloadOnly,
            FrameFormat::IndicatorCounted,
            FrameFormat::IndicatorUncounted,
        ] {
            let mut codec = FrameCodec::new(1024, format).expect("create codec");
            let indicator = format.has_indicator().then_some(indicator);
            codec.store(indicator, &payload).expect("frame fits");

            let mut out = [0u8; 1024];
            match codec.read(&mut out) {
                FrameRead::Frame(n) => {
                    match indicator {
                        Some(byte) => {
                            prop_assert_eq!(n, payload.len() + 1);
                            prop_assert_eq!(out[0], byte);
                            prop_assert_eq!(&out[1..n], payload.as_slice());
                        }
                        None => {
                            prop_assert_eq!(n, payload.len());
                            prop_assert_eq!(&out[..n], payload.as_slice());
                        }
                    }
                }
                other => prop_assert!(false, "expected frame, got {:?}", other),
            }
            prop_assert_eq!(codec.read(&mut out), FrameRead::Empty);
        }
    }

    /// Overflow invariant: a refused store leaves the used count and every
    /// stored frame exactly as they were.
    #[test]
    fn refused_store_changes_nothing(prefill in collection::vec(collection::vec(any::<u8>(), 0..16), 0..8)) {
        let mut codec = FrameCodec::new(256, FrameFormat::PayloadOnly).expect("create codec");
        for frame in &prefill {
            codec.store(None, frame).expect("prefill fits");
        }
        let used_before = codec.used();

        let oversized = vec![0xEE; 256];
        prop_assert_eq!(
            codec.store(None, &oversized),
            Err(StoreError::Overflow { needed: 258, free: codec.free() })
        );
        prop_assert_eq!(codec.used(), used_before);

        let mut out = [0u8; 64];
        for frame in &prefill {
            match codec.read(&mut out) {
                FrameRead::Frame(n) => prop_assert_eq!(&out[..n], frame.as_slice()),
                other => prop_assert!(false, "expected frame, got {:?}", other),
            }
        }
        prop_assert_eq!(codec.read(&mut out), FrameRead::Empty);
    }
}
