//! Error taxonomy shared by every reader.
//!
//! Readers return a bare [`DecodeError`]; the orchestrator wraps it in a
//! [`DecodeFailure`] that names the [`Stage`] and the payload offset at which
//! the stage gave up.

use std::fmt;
use thiserror::Error;

/// Which outer-envelope length check rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeCheck {
    /// Fewer than 4 bytes: no room for the name length.
    NameLengthField,
    /// The announced name length is zero.
    EmptyName,
    /// `4 + name_len` runs past the buffer.
    NameBytes,
    /// No room for the 4-byte payload length after the name.
    PayloadLengthField,
    /// `4 + name_len + 4 + payload_len` runs past the buffer.
    PayloadBytes,
}

impl fmt::Display for EnvelopeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnvelopeCheck::NameLengthField    => "name length field missing",
            EnvelopeCheck::EmptyName          => "name length is zero",
            EnvelopeCheck::NameBytes          => "name exceeds buffer",
            EnvelopeCheck::PayloadLengthField => "payload length field missing",
            EnvelopeCheck::PayloadBytes       => "payload exceeds buffer",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Truncated input: need {needed} byte(s) at offset {offset}, {available} available")]
    TruncatedInput { offset: usize, needed: usize, available: usize },
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(EnvelopeCheck),
    #[error("Inconsistent offsets: section starts at {this} but the next one starts at {next}")]
    InconsistentOffsets { this: u32, next: u32 },
    #[error("Item count mismatch: base record declares {declared}, group headers announce {announced}")]
    ItemCountMismatch { declared: i16, announced: i64 },
    #[error("Unknown state type: {0}")]
    UnknownStateType(u8),
    #[error("Unknown extension type: {0}")]
    UnknownExtensionType(i32),
    /// Informational unless [`crate::config::ChecksumPolicy::Enforce`] is set.
    #[error("Checksum mismatch: computed {computed:08X}, stored {stored:08X}")]
    ChecksumMismatch { computed: u32, stored: u32 },
}

/// Pipeline stages in decode order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Envelope,
    Base,
    FightSkills,
    LifeSkills,
    Tasks,
    Items,
    States,
    Extensions,
    Integrity,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Envelope    => "envelope",
            Stage::Base        => "base record",
            Stage::FightSkills => "fight skills",
            Stage::LifeSkills  => "life skills",
            Stage::Tasks       => "task variables",
            Stage::Items       => "items",
            Stage::States      => "state list",
            Stage::Extensions  => "extension chain",
            Stage::Integrity   => "integrity check",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A reader error tagged with where it happened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{stage} failed at offset {offset}: {error}")]
pub struct DecodeFailure {
    pub stage:  Stage,
    pub offset: usize,
    #[source]
    pub error:  DecodeError,
}

impl DecodeFailure {
    pub fn new(stage: Stage, offset: usize, error: DecodeError) -> Self {
        Self { stage, offset, error }
    }
}
