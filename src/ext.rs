//! Trailing extension chain.
//!
//! A run of `GroupHeader`-prefixed blocks starting at the base record's
//! `ext_buff_offset`.  The block kind is `data_type >> 16`; each kind except
//! the `Item` marker is followed by one fixed record.  The chain ends when
//! fewer than a header's worth of bytes remain.

use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::record::{FixedRecord, GroupHeader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    Item,
    Base,
    LingLongLock,
    HangerOn,
    TransNimbus,
    Break,
    EquipCompose,
}

impl ExtensionKind {
    /// Kind from the raw header field.  The shift is arithmetic, so a negative
    /// field is as unknown as one past the table.
    pub fn from_type_field(type_field: i32) -> Result<Self, DecodeError> {
        Ok(match type_field >> 16 {
            0 => ExtensionKind::Item,
            1 => ExtensionKind::Base,
            2 => ExtensionKind::LingLongLock,
            3 => ExtensionKind::HangerOn,
            4 => ExtensionKind::TransNimbus,
            5 => ExtensionKind::Break,
            6 => ExtensionKind::EquipCompose,
            other => return Err(DecodeError::UnknownExtensionType(other)),
        })
    }

    /// Payload bytes following the header.
    pub fn payload_size(self) -> usize {
        match self {
            ExtensionKind::Item         => 0,
            ExtensionKind::Base         => ExtBase::SIZE,
            ExtensionKind::LingLongLock => LingLongLock::SIZE,
            ExtensionKind::HangerOn     => HangerOn::SIZE,
            ExtensionKind::TransNimbus  => TransNimbus::SIZE,
            ExtensionKind::Break        => BreakInfo::SIZE,
            ExtensionKind::EquipCompose => EquipCompose::SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtBase {
    pub honor:        i32,
    pub contribution: i32,
    pub vip_level:    i32,
    pub vip_exp:      i32,
    pub reserved:     [i32; 4],
}

impl FixedRecord for ExtBase {
    const SIZE: usize = 32;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            honor:        cur.read_i32()?,
            contribution: cur.read_i32()?,
            vip_level:    cur.read_i32()?,
            vip_exp:      cur.read_i32()?,
            reserved:     cur.read_i32_array()?,
        })
    }
}

/// Anti-tamper lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LingLongLock {
    pub locked:        u8,
    pub password_hash: u32,
    pub unlock_time:   u32,
    pub fail_count:    u8,
    pub reserved:      [u8; 6],
}

impl FixedRecord for LingLongLock {
    const SIZE: usize = 16;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            locked:        cur.read_u8()?,
            password_hash: cur.read_u32()?,
            unlock_time:   cur.read_u32()?,
            fail_count:    cur.read_u8()?,
            reserved:      cur.read_array()?,
        })
    }
}

/// Companion that follows the role around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HangerOn {
    pub companion_id: i32,
    pub level:        i32,
    pub exp:          i32,
    pub loyalty:      i32,
    pub state:        u32,
}

impl FixedRecord for HangerOn {
    const SIZE: usize = 20;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            companion_id: cur.read_i32()?,
            level:        cur.read_i32()?,
            exp:          cur.read_i32()?,
            loyalty:      cur.read_i32()?,
            state:        cur.read_u32()?,
        })
    }
}

/// Transcendence experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransNimbus {
    pub trans_level:     i32,
    pub nimbus_exp_high: u32,
    pub nimbus_exp_low:  u32,
    pub total_points:    i32,
}

impl TransNimbus {
    pub fn nimbus_exp(&self) -> u64 {
        ((self.nimbus_exp_high as u64) << 32) | self.nimbus_exp_low as u64
    }
}

impl FixedRecord for TransNimbus {
    const SIZE: usize = 16;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            trans_level:     cur.read_i32()?,
            nimbus_exp_high: cur.read_u32()?,
            nimbus_exp_low:  cur.read_u32()?,
            total_points:    cur.read_i32()?,
        })
    }
}

/// Breakthrough flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakInfo {
    pub break_level: i32,
    pub break_flag:  u32,
    pub break_time:  u32,
}

impl FixedRecord for BreakInfo {
    const SIZE: usize = 12;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            break_level: cur.read_i32()?,
            break_flag:  cur.read_u32()?,
            break_time:  cur.read_u32()?,
        })
    }
}

/// Equipment-compose progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EquipCompose {
    pub item_place: i32,
    pub stage:      i32,
    pub progress:   i32,
    pub last_time:  u32,
}

impl FixedRecord for EquipCompose {
    const SIZE: usize = 16;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            item_place: cur.read_i32()?,
            stage:      cur.read_i32()?,
            progress:   cur.read_i32()?,
            last_time:  cur.read_u32()?,
        })
    }
}

/// One decoded extension block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionBlock {
    Item,
    Base(ExtBase),
    LingLongLock(LingLongLock),
    HangerOn(HangerOn),
    TransNimbus(TransNimbus),
    Break(BreakInfo),
    EquipCompose(EquipCompose),
}

/// Extension blocks grouped by kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ExtensionData {
    pub item_markers:   usize,
    pub base:           Vec<ExtBase>,
    pub ling_long_lock: Vec<LingLongLock>,
    pub hanger_on:      Vec<HangerOn>,
    pub trans_nimbus:   Vec<TransNimbus>,
    pub breaks:         Vec<BreakInfo>,
    pub equip_compose:  Vec<EquipCompose>,
}

impl ExtensionData {
    pub fn has_base(&self)           -> bool { !self.base.is_empty() }
    pub fn has_ling_long_lock(&self) -> bool { !self.ling_long_lock.is_empty() }
    pub fn has_hanger_on(&self)      -> bool { !self.hanger_on.is_empty() }
    pub fn has_trans_nimbus(&self)   -> bool { !self.trans_nimbus.is_empty() }
    pub fn has_break(&self)          -> bool { !self.breaks.is_empty() }
    pub fn has_equip_compose(&self)  -> bool { !self.equip_compose.is_empty() }

    pub fn is_empty(&self) -> bool {
        self.item_markers == 0
            && !self.has_base()
            && !self.has_ling_long_lock()
            && !self.has_hanger_on()
            && !self.has_trans_nimbus()
            && !self.has_break()
            && !self.has_equip_compose()
    }

    fn push(&mut self, block: ExtensionBlock) {
        match block {
            ExtensionBlock::Item            => self.item_markers += 1,
            ExtensionBlock::Base(b)         => self.base.push(b),
            ExtensionBlock::LingLongLock(b) => self.ling_long_lock.push(b),
            ExtensionBlock::HangerOn(b)     => self.hanger_on.push(b),
            ExtensionBlock::TransNimbus(b)  => self.trans_nimbus.push(b),
            ExtensionBlock::Break(b)        => self.breaks.push(b),
            ExtensionBlock::EquipCompose(b) => self.equip_compose.push(b),
        }
    }
}

/// Read one header plus its payload.
///
/// The payload is bounds-checked as a whole before any field is read, so a
/// short block fails without moving past its header.
pub fn read_block(cur: &mut ByteCursor<'_>) -> Result<ExtensionBlock, DecodeError> {
    let header = GroupHeader::read(cur)?;
    let kind = ExtensionKind::from_type_field(header.data_type)?;
    cur.require(kind.payload_size())?;
    Ok(match kind {
        ExtensionKind::Item         => ExtensionBlock::Item,
        ExtensionKind::Base         => ExtensionBlock::Base(ExtBase::parse(cur)?),
        ExtensionKind::LingLongLock => ExtensionBlock::LingLongLock(LingLongLock::parse(cur)?),
        ExtensionKind::HangerOn     => ExtensionBlock::HangerOn(HangerOn::parse(cur)?),
        ExtensionKind::TransNimbus  => ExtensionBlock::TransNimbus(TransNimbus::parse(cur)?),
        ExtensionKind::Break        => ExtensionBlock::Break(BreakInfo::parse(cur)?),
        ExtensionKind::EquipCompose => ExtensionBlock::EquipCompose(EquipCompose::parse(cur)?),
    })
}

/// Walk the chain from the current cursor until less than one header remains.
///
/// Realigning the cursor to `ext_buff_offset` is the orchestrator's job; this
/// function only consumes blocks.
pub fn read_extensions(cur: &mut ByteCursor<'_>) -> Result<ExtensionData, DecodeError> {
    let mut data = ExtensionData::default();
    while cur.remaining() >= GroupHeader::SIZE {
        data.push(read_block(cur)?);
    }
    Ok(data)
}
