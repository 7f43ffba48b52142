use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::{DecodeError, EnvelopeCheck};

/// The outer `.bak` wrapper: `u32 name_len | name | u32 payload_len | payload`.
///
/// Borrows from the input buffer; nothing is copied until the caller asks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEnvelope<'a> {
    pub name_len:    u32,
    pub name_bytes:  &'a [u8],
    pub payload_len: u32,
    pub payload:     &'a [u8],
}

impl<'a> RawEnvelope<'a> {
    /// Parse the envelope from the start of `data`.
    ///
    /// Trailing bytes past the announced payload are ignored.
    pub fn read(data: &'a [u8]) -> Result<Self, DecodeError> {
        let mut cur = ByteCursor::new(data);
        let malformed = DecodeError::MalformedEnvelope;

        let name_len = cur.read_u32().map_err(|_| malformed(EnvelopeCheck::NameLengthField))?;
        if name_len == 0 {
            return Err(malformed(EnvelopeCheck::EmptyName));
        }
        let name_bytes = cur
            .read_bytes(name_len as usize)
            .map_err(|_| malformed(EnvelopeCheck::NameBytes))?;

        let payload_len = cur.read_u32().map_err(|_| malformed(EnvelopeCheck::PayloadLengthField))?;
        let payload = cur
            .read_bytes(payload_len as usize)
            .map_err(|_| malformed(EnvelopeCheck::PayloadBytes))?;

        Ok(Self { name_len, name_bytes, payload_len, payload })
    }

    pub fn info(&self) -> EnvelopeInfo {
        EnvelopeInfo {
            name_bytes:  self.name_bytes.to_vec(),
            payload_len: self.payload_len,
        }
    }
}

/// Owned summary of the envelope kept on the decode result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeInfo {
    #[serde(serialize_with = "crate::text::serialize_name")]
    pub name_bytes:  Vec<u8>,
    pub payload_len: u32,
}

impl EnvelopeInfo {
    pub fn display_name(&self) -> String {
        crate::text::display_name(&self.name_bytes)
    }
}
