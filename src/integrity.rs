//! Trailing CRC-32 of the payload.
//!
//! The last four bytes of the payload hold the stored checksum; the computed
//! one covers everything before them.

use byteorder::{ByteOrder, LittleEndian};
use crc32fast::Hasher;
use serde::Serialize;

use crate::error::DecodeError;

pub const CHECKSUM_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Checksums {
    pub computed: u32,
    pub stored:   u32,
}

impl Checksums {
    /// `None` when the payload is too short to carry a checksum.
    pub fn compute(payload: &[u8]) -> Option<Self> {
        if payload.len() < CHECKSUM_SIZE {
            return None;
        }
        let split = payload.len() - CHECKSUM_SIZE;
        let mut hasher = Hasher::new();
        hasher.update(&payload[..split]);
        Some(Self {
            computed: hasher.finalize(),
            stored:   LittleEndian::read_u32(&payload[split..]),
        })
    }

    pub fn matches(&self) -> bool {
        self.computed == self.stored
    }

    pub fn verify(&self) -> Result<(), DecodeError> {
        if self.matches() {
            Ok(())
        } else {
            Err(DecodeError::ChecksumMismatch { computed: self.computed, stored: self.stored })
        }
    }
}
