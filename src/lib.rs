pub mod cursor;
pub mod error;
pub mod envelope;
pub mod base;
pub mod record;
pub mod derived;
pub mod item;
pub mod state;
pub mod ext;
pub mod integrity;
pub mod config;
pub mod sink;
pub mod text;
pub mod decoder;

pub use cursor::ByteCursor;
pub use error::{DecodeError, DecodeFailure, Stage};
pub use envelope::{RawEnvelope, EnvelopeInfo};
pub use base::{RoleBaseInfo, RoleBaseRecord};
pub use record::{FixedRecord, SkillRecord, TaskRecord, GroupHeader};
pub use item::{CapabilityMask, ItemRecord};
pub use state::{StateLists, StateRecord};
pub use ext::{ExtensionBlock, ExtensionData, ExtensionKind};
pub use integrity::Checksums;
pub use config::{ChecksumPolicy, DecodeOptions};
pub use sink::LogSink;
pub use decoder::{DecodeOutcome, DecodedRole, RoleDecoder};
