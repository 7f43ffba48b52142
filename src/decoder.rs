//! Decode orchestration.
//!
//! ```no_run
//! use rolebak::RoleDecoder;
//!
//! let bytes = std::fs::read("role.bak")?;
//! let outcome = RoleDecoder::new().decode(&bytes)?;
//! println!("{} fight skills", outcome.role.fight_skills.len());
//! if let Some(failure) = &outcome.failure {
//!     eprintln!("partially decoded: {failure}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Stages
//! envelope → base record → fight skills → life skills → task variables →
//! items → state list → extension chain → integrity.  All stages share one
//! cursor over the payload.  A failure in the envelope or base record is an
//! `Err`; any later failure stops the pipeline but keeps every section that
//! was already decoded.

use serde::Serialize;

use crate::base::{read_base, RoleBaseRecord};
use crate::config::{ChecksumPolicy, DecodeOptions};
use crate::cursor::ByteCursor;
use crate::derived::{derived_count, read_derived};
use crate::envelope::{EnvelopeInfo, RawEnvelope};
use crate::error::{DecodeError, DecodeFailure, Stage};
use crate::ext::{read_extensions, ExtensionData};
use crate::integrity::{Checksums, CHECKSUM_SIZE};
use crate::item::{read_items, ItemRecord};
use crate::record::{FixedRecord, SkillRecord, TaskRecord};
use crate::sink::{LogSink, Logger};
use crate::state::{read_states, StateLists};

/// Everything decoded from one role blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedRole {
    /// Absent when decoding a bare payload (database row).
    pub envelope:     Option<EnvelopeInfo>,
    pub base:         RoleBaseRecord,
    pub fight_skills: Vec<SkillRecord>,
    pub life_skills:  Vec<SkillRecord>,
    pub tasks:        Vec<TaskRecord>,
    pub items:        Vec<ItemRecord>,
    pub states:       StateLists,
    pub extensions:   ExtensionData,
    /// Absent when the payload is shorter than a checksum.
    pub checksum:     Option<Checksums>,
}

impl DecodedRole {
    fn new(envelope: Option<EnvelopeInfo>, base: RoleBaseRecord, checksum: Option<Checksums>) -> Self {
        Self {
            envelope,
            base,
            fight_skills: Vec::new(),
            life_skills:  Vec::new(),
            tasks:        Vec::new(),
            items:        Vec::new(),
            states:       StateLists::default(),
            extensions:   ExtensionData::default(),
            checksum,
        }
    }
}

/// Result of a decode that got at least as far as the base record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOutcome {
    pub role:    DecodedRole,
    /// `None` when every stage succeeded.
    pub failure: Option<DecodeFailure>,
    /// Final cursor position within the payload.
    pub consumed: usize,
}

impl DecodeOutcome {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Stage that stopped the pipeline, if any.
    pub fn failed_stage(&self) -> Option<Stage> {
        self.failure.as_ref().map(|f| f.stage)
    }

    pub fn checksum_matches(&self) -> Option<bool> {
        self.role.checksum.map(|c| c.matches())
    }

    /// Treat any trailing failure as fatal.
    pub fn into_result(self) -> Result<DecodedRole, DecodeFailure> {
        match self.failure {
            None    => Ok(self.role),
            Some(f) => Err(f),
        }
    }
}

/// Sequences the section readers over one payload.
///
/// Holds no per-decode state.  Sinks are `Sync`, so one decoder can be
/// shared across threads decoding different buffers.
pub struct RoleDecoder<'s> {
    options: DecodeOptions,
    sink:    Option<&'s dyn LogSink>,
}

impl Default for RoleDecoder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleDecoder<'static> {
    pub fn new() -> Self {
        Self::with_options(DecodeOptions::default())
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options, sink: None }
    }
}

impl<'s> RoleDecoder<'s> {
    pub fn with_sink<'t>(self, sink: &'t dyn LogSink) -> RoleDecoder<'t> {
        RoleDecoder { options: self.options, sink: Some(sink) }
    }

    /// Decode a `.bak` blob: outer envelope, then the payload.
    pub fn decode(&self, data: &[u8]) -> Result<DecodeOutcome, DecodeFailure> {
        let log = Logger::new(self.sink);
        let envelope = RawEnvelope::read(data).map_err(|e| {
            let failure = DecodeFailure::new(Stage::Envelope, 0, e);
            report(&log, &failure);
            failure
        })?;
        log.line(format_args!(
            "Envelope : name_len = {}, payload_len = {}",
            envelope.name_len, envelope.payload_len
        ));
        self.run(envelope.payload, Some(envelope.info()), &log)
    }

    /// Decode a bare payload, as stored in a database row.
    pub fn decode_payload(&self, payload: &[u8]) -> Result<DecodeOutcome, DecodeFailure> {
        let log = Logger::new(self.sink);
        self.run(payload, None, &log)
    }

    fn run(
        &self,
        payload:  &[u8],
        envelope: Option<EnvelopeInfo>,
        log:      &Logger<'_>,
    ) -> Result<DecodeOutcome, DecodeFailure> {
        let mut cur = ByteCursor::new(payload);

        let base = read_base(&mut cur).map_err(|e| {
            let failure = DecodeFailure::new(Stage::Base, cur.position(), e);
            report(log, &failure);
            failure
        })?;
        check_declared(&base, payload.len(), log);

        let checksum = Checksums::compute(payload);
        let mut role = DecodedRole::new(envelope, base, checksum);

        let mut failure = self.sections(&mut cur, &mut role, log).err();
        if let Some(f) = &failure {
            report(log, f);
        }

        if let Some(sums) = role.checksum {
            log.line(format_args!("CRC32 : computed = {:08X}, stored = {:08X}", sums.computed, sums.stored));
            if let Err(e) = sums.verify() {
                tracing::warn!(computed = sums.computed, stored = sums.stored, "checksum mismatch");
                if failure.is_none() && self.options.checksum == ChecksumPolicy::Enforce {
                    let f = DecodeFailure::new(Stage::Integrity, payload.len() - CHECKSUM_SIZE, e);
                    report(log, &f);
                    failure = Some(f);
                }
            }
        }

        Ok(DecodeOutcome { role, failure, consumed: cur.position() })
    }

    fn sections(
        &self,
        cur:  &mut ByteCursor<'_>,
        role: &mut DecodedRole,
        log:  &Logger<'_>,
    ) -> Result<(), DecodeFailure> {
        let b = role.base.clone();

        progress(log, cur, "FSkillOffset", b.fight_skill_offset);
        let r = read_derived::<SkillRecord>(cur, b.fight_skill_offset, b.life_skill_offset);
        role.fight_skills = at(cur, Stage::FightSkills, r)?;

        progress(log, cur, "LSkillOffset", b.life_skill_offset);
        let r = read_derived::<SkillRecord>(cur, b.life_skill_offset, b.task_offset);
        role.life_skills = at(cur, Stage::LifeSkills, r)?;

        progress(log, cur, "TaskOffset", b.task_offset);
        let r = read_derived::<TaskRecord>(cur, b.task_offset, b.item_offset);
        role.tasks = at(cur, Stage::Tasks, r)?;

        progress(log, cur, "ItemOffset", b.item_offset);
        let r = read_items(cur, b.item_count);
        role.items = at(cur, Stage::Items, r)?;

        progress(log, cur, "StateOffset", b.state_offset);
        let r = read_states(cur, b.state_count);
        role.states = at(cur, Stage::States, r)?;

        progress(log, cur, "ExtBuffOffset", b.ext_buff_offset());
        let r = self.realign(cur, b.ext_buff_offset(), log);
        at(cur, Stage::Extensions, r)?;
        let r = read_extensions(cur);
        role.extensions = at(cur, Stage::Extensions, r)?;

        progress(log, cur, "RoleDataLen", b.data_len);
        Ok(())
    }

    /// Jump to the announced extension offset if upstream sections drifted.
    ///
    /// An offset past the end of the payload leaves nothing to read: the
    /// cursor moves to the end and the chain comes out empty.
    fn realign(&self, cur: &mut ByteCursor<'_>, ext_offset: u32, log: &Logger<'_>) -> Result<(), DecodeError> {
        let target = ext_offset as usize;
        if ext_offset == 0 || cur.position() == target {
            return Ok(());
        }
        if self.options.realign_extensions && target > cur.len() {
            tracing::warn!(ext_offset, payload_len = cur.len(), "extension offset past end of payload");
            log.line(format_args!(
                "Warn - ExtBuffOffset {} is past the payload end {}, no extension data",
                ext_offset, cur.len()
            ));
            return cur.seek(cur.len());
        }
        if !self.options.realign_extensions {
            tracing::warn!(position = cur.position(), ext_offset, "extension offset drift left uncorrected");
            log.line(format_args!(
                "Warn - cursor {} disagrees with ExtBuffOffset {}, not realigning",
                cur.position(), ext_offset
            ));
            return Ok(());
        }
        tracing::warn!(position = cur.position(), ext_offset, "realigning cursor to extension offset");
        log.line(format_args!(
            "Warn - cursor {} disagrees with ExtBuffOffset {}, realigning",
            cur.position(), ext_offset
        ));
        cur.seek(target)
    }
}

fn at<T>(cur: &ByteCursor<'_>, stage: Stage, r: Result<T, DecodeError>) -> Result<T, DecodeFailure> {
    r.map_err(|e| DecodeFailure::new(stage, cur.position(), e))
}

fn progress(log: &Logger<'_>, cur: &ByteCursor<'_>, label: &str, offset: u32) {
    tracing::debug!(position = cur.position(), offset, "{label}");
    log.line(format_args!("CurrentPos = {:<4}, {:<13} = {:<4}", cur.position(), label, offset));
}

fn report(log: &Logger<'_>, failure: &DecodeFailure) {
    tracing::warn!(stage = %failure.stage, offset = failure.offset, "{}", failure.error);
    log.line(format_args!("Error - {failure}"));
}

/// Declared counts are informational; only disagreements are worth a line.
fn check_declared(base: &RoleBaseRecord, payload_len: usize, log: &Logger<'_>) {
    let checks = [
        ("fight skills", base.fight_skill_offset, base.life_skill_offset, base.fight_skill_count as i64, SkillRecord::SIZE),
        ("life skills",  base.life_skill_offset,  base.task_offset,       base.life_skill_count as i64,  SkillRecord::SIZE),
        ("tasks",        base.task_offset,        base.item_offset,       base.task_count as i64,        TaskRecord::SIZE),
    ];
    for (what, this, next, declared, size) in checks {
        if let Ok(derived) = derived_count(this, next, size) {
            if derived as i64 != declared {
                tracing::debug!(section = what, declared, derived, "declared count differs from offsets");
                log.line(format_args!("Info - {what}: declared {declared}, offsets imply {derived}"));
            }
        }
    }
    if base.data_len as usize != payload_len {
        tracing::debug!(data_len = base.data_len, payload_len, "data_len differs from payload length");
        log.line(format_args!("Info - DataLen = {}, payload is {} byte(s)", base.data_len, payload_len));
    }
}
