//! State list: `state_count` tagged envelopes of `u8 type | [u8; 32] data`.
//!
//! Five discriminants are fixed records read from the front of the 32-byte
//! window.  `CustomData` is different: its window holds a header whose
//! `size` field announces `size + 1` further bytes *after* the envelope (one
//! repeated type byte, then the body).  Any other discriminant is fatal.

use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::record::FixedRecord;

/// `u8 type` + 32-byte window.
pub const STATE_ENVELOPE_SIZE: usize = 33;
pub const STATE_WINDOW_SIZE:   usize = 32;

pub const STATE_SKILL_STATE:  u8 = 1;
pub const STATE_SKILL_CD:     u8 = 2;
pub const STATE_FEATURE_INFO: u8 = 3;
pub const STATE_PLAYER_EVENT: u8 = 4;
pub const STATE_ROLE_TITLE:   u8 = 5;
pub const STATE_CUSTOM_DATA:  u8 = 6;

pub const CUSTOM_PARTNER: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillState {
    pub skill_id:    i32,
    pub skill_level: i32,
    pub left_time:   i32,
    pub caster_id:   u32,
}

impl FixedRecord for SkillState {
    const SIZE: usize = 16;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            skill_id:    cur.read_i32()?,
            skill_level: cur.read_i32()?,
            left_time:   cur.read_i32()?,
            caster_id:   cur.read_u32()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillCd {
    pub skill_id:    i32,
    pub cd_end_time: u32,
}

impl FixedRecord for SkillCd {
    const SIZE: usize = 8;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            skill_id:    cur.read_i32()?,
            cd_end_time: cur.read_u32()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureInfo {
    pub feature_id:  i32,
    pub value:       i32,
    pub expire_time: u32,
}

impl FixedRecord for FeatureInfo {
    const SIZE: usize = 12;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            feature_id:  cur.read_i32()?,
            value:       cur.read_i32()?,
            expire_time: cur.read_u32()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerEvent {
    pub event_id:     i32,
    pub param1:       i32,
    pub param2:       i32,
    pub trigger_time: u32,
}

impl FixedRecord for PlayerEvent {
    const SIZE: usize = 16;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            event_id:     cur.read_i32()?,
            param1:       cur.read_i32()?,
            param2:       cur.read_i32()?,
            trigger_time: cur.read_u32()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleTitle {
    pub title_id:    i32,
    pub gain_time:   u32,
    pub expire_time: u32,
    pub active:      u8,
}

impl FixedRecord for RoleTitle {
    const SIZE: usize = 13;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            title_id:    cur.read_i32()?,
            gain_time:   cur.read_u32()?,
            expire_time: cur.read_u32()?,
            active:      cur.read_u8()?,
        })
    }
}

/// Header at the front of a `CustomData` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CustomHeader {
    pub custom_type: u8,
    pub size:        u32,
    #[serde(serialize_with = "crate::text::serialize_bytes_hex")]
    pub reserved:    [u8; 11],
}

impl FixedRecord for CustomHeader {
    const SIZE: usize = 16;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            custom_type: cur.read_u8()?,
            size:        cur.read_u32()?,
            reserved:    cur.read_array()?,
        })
    }
}

/// Body of a custom record.
///
/// The per-companion layout of a partner body has never been defined, so the
/// bytes after `partner_count` are kept verbatim rather than guessed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CustomBody {
    Partner {
        partner_count: Option<u8>,
        #[serde(serialize_with = "crate::text::serialize_bytes_hex")]
        unimplemented: Vec<u8>,
    },
    Opaque {
        #[serde(serialize_with = "crate::text::serialize_bytes_hex")]
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomData {
    pub header:        CustomHeader,
    /// The type byte repeated in front of the body.
    pub repeated_type: u8,
    pub body:          CustomBody,
}

impl CustomData {
    /// Bytes consumed after the 33-byte envelope.
    pub fn trailing_len(&self) -> u64 {
        u64::from(self.header.size) + 1
    }
}

/// One decoded state entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateRecord {
    SkillState(SkillState),
    SkillCd(SkillCd),
    FeatureInfo(FeatureInfo),
    PlayerEvent(PlayerEvent),
    RoleTitle(RoleTitle),
    CustomData(CustomData),
}

/// State entries grouped by kind, in stream order within each kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StateLists {
    pub skill_states:  Vec<SkillState>,
    pub skill_cds:     Vec<SkillCd>,
    pub feature_infos: Vec<FeatureInfo>,
    pub player_events: Vec<PlayerEvent>,
    pub role_titles:   Vec<RoleTitle>,
    pub custom_data:   Vec<CustomData>,
}

impl StateLists {
    pub fn len(&self) -> usize {
        self.skill_states.len()
            + self.skill_cds.len()
            + self.feature_infos.len()
            + self.player_events.len()
            + self.role_titles.len()
            + self.custom_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, record: StateRecord) {
        match record {
            StateRecord::SkillState(s)  => self.skill_states.push(s),
            StateRecord::SkillCd(s)     => self.skill_cds.push(s),
            StateRecord::FeatureInfo(s) => self.feature_infos.push(s),
            StateRecord::PlayerEvent(s) => self.player_events.push(s),
            StateRecord::RoleTitle(s)   => self.role_titles.push(s),
            StateRecord::CustomData(s)  => self.custom_data.push(s),
        }
    }
}

fn window<R: FixedRecord>(data: &[u8; STATE_WINDOW_SIZE]) -> Result<R, DecodeError> {
    R::read(&mut ByteCursor::new(data))
}

/// Decode one state envelope (plus its custom trailer, if any).
pub fn read_state(cur: &mut ByteCursor<'_>) -> Result<StateRecord, DecodeError> {
    let start = cur.position();
    cur.require(STATE_ENVELOPE_SIZE)?;
    let state_type = cur.read_u8()?;
    let data: [u8; STATE_WINDOW_SIZE] = cur.read_array()?;

    let record = match state_type {
        STATE_SKILL_STATE  => StateRecord::SkillState(window(&data)?),
        STATE_SKILL_CD     => StateRecord::SkillCd(window(&data)?),
        STATE_FEATURE_INFO => StateRecord::FeatureInfo(window(&data)?),
        STATE_PLAYER_EVENT => StateRecord::PlayerEvent(window(&data)?),
        STATE_ROLE_TITLE   => StateRecord::RoleTitle(window(&data)?),
        STATE_CUSTOM_DATA  => {
            let header: CustomHeader = window(&data)?;
            match read_custom_trailer(cur, header) {
                Ok(custom) => StateRecord::CustomData(custom),
                Err(e) => {
                    // Keep the envelope-level all-or-nothing contract.
                    cur.seek(start)?;
                    return Err(e);
                }
            }
        }
        other => {
            cur.seek(start)?;
            return Err(DecodeError::UnknownStateType(other));
        }
    };
    Ok(record)
}

fn read_custom_trailer(cur: &mut ByteCursor<'_>, header: CustomHeader) -> Result<CustomData, DecodeError> {
    let len = usize::try_from(header.size)
        .ok()
        .and_then(|size| size.checked_add(1))
        .ok_or(DecodeError::TruncatedInput {
            offset:    cur.position(),
            needed:    usize::MAX,
            available: cur.remaining(),
        })?;
    let trailer = cur.read_bytes(len)?;
    let (repeated_type, body) = (trailer[0], &trailer[1..]);

    let body = match header.custom_type {
        CUSTOM_PARTNER => CustomBody::Partner {
            partner_count: body.first().copied(),
            unimplemented: body.get(1..).unwrap_or_default().to_vec(),
        },
        _ => CustomBody::Opaque { bytes: body.to_vec() },
    };

    Ok(CustomData { header, repeated_type, body })
}

/// Read `state_count` entries.  A non-positive count means no states.
pub fn read_states(cur: &mut ByteCursor<'_>, state_count: i16) -> Result<StateLists, DecodeError> {
    let mut lists = StateLists::default();
    for _ in 0..state_count.max(0) {
        lists.push(read_state(cur)?);
    }
    Ok(lists)
}
