//! Path segment codec
//!
//! Converts store-assigned integer ids to fixed-width base-62 path segments
//! and back. Paths are built by concatenating one segment per ancestor level,
//! so the codec fixes the unit of length every structural query relies on.

use crate::error::TreeError;

/// Default segment width. Supports ids up to `62^6 - 1` (~5.68e10).
pub const DEFAULT_SEGMENT_WIDTH: usize = 6;

/// Largest supported segment width; `62^10 - 1` still fits in a `u64`.
pub const MAX_SEGMENT_WIDTH: usize = 10;

/// The 62-symbol alphabet: digits, then lowercase, then uppercase.
/// Case-significant and fixed per deployment, like the segment width.
const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Pad character for left-padding short encodings to the fixed width.
const PAD: u8 = b'0';

fn digit_value(byte: u8) -> Option<u64> {
    match byte {
        b'0'..=b'9' => Some(u64::from(byte - b'0')),
        b'a'..=b'z' => Some(u64::from(byte - b'a') + 10),
        b'A'..=b'Z' => Some(u64::from(byte - b'A') + 36),
        _ => None,
    }
}

/// Fixed-width base-62 codec for one deployment.
///
/// The width must never change once paths exist in the store; every stored
/// path would be reinterpreted at the wrong segment boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathCodec {
    width: usize,
    capacity: u64,
}

impl Default for PathCodec {
    fn default() -> Self {
        // DEFAULT_SEGMENT_WIDTH is always in range
        Self {
            width: DEFAULT_SEGMENT_WIDTH,
            capacity: 62u64.pow(DEFAULT_SEGMENT_WIDTH as u32) - 1,
        }
    }
}

impl PathCodec {
    /// Create a codec with the given segment width.
    ///
    /// Fails with `InvalidSegmentWidth` outside `1..=MAX_SEGMENT_WIDTH`.
    pub fn new(width: usize) -> Result<Self, TreeError> {
        if width == 0 || width > MAX_SEGMENT_WIDTH {
            return Err(TreeError::InvalidSegmentWidth(width));
        }
        Ok(Self {
            width,
            capacity: 62u64.pow(width as u32) - 1,
        })
    }

    /// Segment width in characters.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Largest id this codec can encode: `62^width - 1`.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Encode an id as a left-padded, fixed-width base-62 segment.
    ///
    /// Fails with `EncodingOverflow` when the id exceeds the capacity
    /// ceiling; the width is a hard cap chosen up front.
    pub fn encode(&self, id: u64) -> Result<String, TreeError> {
        if id > self.capacity {
            return Err(TreeError::EncodingOverflow {
                id,
                width: self.width,
            });
        }

        let mut buf = [PAD; MAX_SEGMENT_WIDTH];
        let mut n = id;
        let mut i = self.width;
        while n > 0 {
            i -= 1;
            buf[i] = ALPHABET[(n % 62) as usize];
            n /= 62;
        }

        Ok(buf[..self.width].iter().map(|&b| b as char).collect())
    }

    /// Decode a fixed-width segment back to its id.
    ///
    /// Fails with `InvalidSegment` on wrong width or characters outside the
    /// alphabet; either indicates corrupt data or a width misconfiguration.
    pub fn decode(&self, segment: &str) -> Result<u64, TreeError> {
        if segment.len() != self.width {
            return Err(TreeError::InvalidSegment(segment.to_string()));
        }

        let mut value: u64 = 0;
        for byte in segment.bytes() {
            let digit = digit_value(byte)
                .ok_or_else(|| TreeError::InvalidSegment(segment.to_string()))?;
            // width <= 10, so the accumulator stays below 62^10 and cannot overflow
            value = value * 62 + digit;
        }

        Ok(value)
    }
}
