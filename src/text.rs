//! Display helpers for legacy fixed-width name fields.
//!
//! Names are stored in a legacy double-byte encoding.  Transcoding is the
//! caller's concern; these helpers only strip NUL padding and fall back to a
//! lossy rendering so that output is always printable.

use serde::Serializer;

/// Bytes up to (not including) the first NUL.
pub fn trim_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

pub fn display_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(trim_nul(bytes)).into_owned()
}

/// Hex of the trimmed bytes, for names that do not render as UTF-8.
pub fn name_hex(bytes: &[u8]) -> String {
    hex::encode(trim_nul(bytes))
}

pub(crate) fn serialize_name<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&display_name(bytes))
}

pub(crate) fn serialize_bytes_hex<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&hex::encode(bytes))
}
