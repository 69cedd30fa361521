//! Length-prefixed packet framing on top of [`RingStore`].
//!
//! Stored frame layout:
//!
//! ```text
//! [len_lo][len_hi]([indicator])[payload ...]
//! ```
//!
//! The 2-byte length prefix is little-endian. Whether an indicator byte is
//! present, and whether the length field counts it, is fixed per codec
//! instance by [`FrameFormat`] — never inferred from the stored bytes, which
//! are ambiguous without that out-of-band knowledge.
//!
//! A frame is one logical atomic unit: [`FrameCodec::store`] writes either
//! the whole frame or nothing, and [`FrameCodec::read`] never leaves a
//! length header behind without its body.

use crate::{RingResult, RingStore, StoreError};

/// Size of the little-endian length prefix in bytes.
pub const LEN_PREFIX_SIZE: usize = 2;

/// Per-channel framing convention.
///
/// The original transports disagree on what the length field counts; each
/// channel must pick one variant at construction time and document it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameFormat {
    /// `[len][payload]` — no indicator slot; length counts payload bytes.
    PayloadOnly,
    /// `[len][indicator][payload]` — length counts indicator + payload
    /// (the VHCI event/ACL convention).
    IndicatorCounted,
    /// `[len][indicator][payload]` — length counts payload bytes only.
    IndicatorUncounted,
}

impl FrameFormat {
    /// True when frames under this format carry an indicator byte.
    pub fn has_indicator(self) -> bool {
        !matches!(self, FrameFormat::PayloadOnly)
    }

    /// Value stored in the length prefix for `payload_len` payload bytes.
    fn length_value(self, payload_len: usize) -> usize {
        match self {
            FrameFormat::PayloadOnly | FrameFormat::IndicatorUncounted => payload_len,
            FrameFormat::IndicatorCounted => payload_len + 1,
        }
    }

    /// Number of body bytes following the prefix, given the stored length value.
    fn body_len(self, length_value: usize) -> usize {
        match self {
            FrameFormat::PayloadOnly | FrameFormat::IndicatorCounted => length_value,
            FrameFormat::IndicatorUncounted => length_value + 1,
        }
    }
}

/// Outcome of one [`FrameCodec::read`] attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRead {
    /// No complete header is stored; nothing was consumed.
    Empty,
    /// One frame was consumed; the value is the number of body bytes
    /// (indicator, if the format has one, plus payload) copied into `out`.
    Frame(usize),
    /// The stored frame exceeds the caller's buffer. The frame has been
    /// discarded in its entirety so the stream stays aligned; the caller
    /// knows a packet existed and was lost.
    TooLarge { needed: usize },
    /// The header promises more bytes than are stored. Cannot occur under
    /// correct single-producer discipline; nothing was consumed so the
    /// caller can log the condition and retry.
    Inconsistent { needed: usize, used: usize },
}

/// Frame encoder/decoder owning the backing ring.
///
/// The codec performs no locking; the link layer serializes access through
/// its gate and the producer/consumer discipline.
pub struct FrameCodec {
    ring: RingStore,
    format: FrameFormat,
}

impl FrameCodec {
    /// Creates a codec over a zeroed ring of `capacity` total bytes.
    pub fn new(capacity: usize, format: FrameFormat) -> RingResult<Self> {
        Ok(Self {
            ring: RingStore::new(capacity)?,
            format,
        })
    }

    /// The framing convention fixed for this instance.
    pub fn format(&self) -> FrameFormat {
        self.format
    }

    /// Bytes currently stored, headers included.
    pub fn used(&self) -> usize {
        self.ring.used()
    }

    /// Bytes still available for new frames, headers included.
    pub fn free(&self) -> usize {
        self.ring.free()
    }

    /// True when at least a length header is stored.
    pub fn has_frame(&self) -> bool {
        self.ring.used() >= LEN_PREFIX_SIZE
    }

    /// Resets the codec to the freshly constructed state, zeroing the ring.
    pub fn clear(&mut self) {
        self.ring.clear();
    }

    /// Appends one frame, writing header, optional indicator, and payload.
    ///
    /// All-or-nothing: on any error the ring cursors and contents are
    /// untouched. The indicator argument must match the configured
    /// [`FrameFormat`].
    pub fn store(&mut self, indicator: Option<u8>, payload: &[u8]) -> Result<(), StoreError> {
        let indicator = match (self.format.has_indicator(), indicator) {
            (true, Some(byte)) => Some(byte),
            (true, None) => return Err(StoreError::MissingIndicator),
            (false, Some(_)) => return Err(StoreError::UnexpectedIndicator),
            (false, None) => None,
        };

        let length_value = self.format.length_value(payload.len());
        if length_value > u16::MAX as usize {
            return Err(StoreError::PayloadTooLong {
                len: payload.len(),
                max: u16::MAX as usize,
            });
        }

        let total = LEN_PREFIX_SIZE + self.format.body_len(length_value);
        let free = self.ring.free();
        if free < total {
            return Err(StoreError::Overflow {
                needed: total,
                free,
            });
        }

        // Space was checked up front, so none of these writes can fail and
        // the frame becomes visible as a unit once the caller releases its
        // lock.
        let header = (length_value as u16).to_le_bytes();
        let wrote_header = self.ring.write_raw(&header);
        debug_assert!(wrote_header);
        if let Some(byte) = indicator {
            let wrote_indicator = self.ring.write_raw(&[byte]);
            debug_assert!(wrote_indicator);
        }
        let wrote_payload = self.ring.write_raw(payload);
        debug_assert!(wrote_payload);
        Ok(())
    }

    /// Pops the oldest frame into `out`.
    ///
    /// See [`FrameRead`] for the outcome contract. Only the `Frame` and
    /// `TooLarge` outcomes consume stored bytes, and both consume exactly
    /// one whole frame.
    pub fn read(&mut self, out: &mut [u8]) -> FrameRead {
        let used = self.ring.used();
        if used < LEN_PREFIX_SIZE {
            return FrameRead::Empty;
        }

        let mut header = [0u8; LEN_PREFIX_SIZE];
        self.ring.peek_raw(&mut header);
        let length_value = u16::from_le_bytes(header) as usize;
        let body_len = self.format.body_len(length_value);
        let total = LEN_PREFIX_SIZE + body_len;

        if used < total {
            return FrameRead::Inconsistent {
                needed: total,
                used,
            };
        }

        if body_len > out.len() {
            // Discard the whole frame so the next read starts on a header.
            let skipped = self.ring.skip_raw(total);
            debug_assert_eq!(skipped, total);
            return FrameRead::TooLarge { needed: body_len };
        }

        self.ring.skip_raw(LEN_PREFIX_SIZE);
        let copied = self.ring.read_raw(&mut out[..body_len]);
        debug_assert_eq!(copied, body_len);
        FrameRead::Frame(body_len)
    }
}
