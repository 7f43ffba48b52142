//! Fixed-size records shared across sections.

use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::DecodeError;

/// A record with a constant on-disk size.
///
/// `parse` is only called after the caller has verified `SIZE` bytes are
/// available, but every implementation still goes through the checked cursor.
pub trait FixedRecord: Sized {
    const SIZE: usize;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError>;

    /// Check the size up front so a short buffer fails without a partial read.
    fn read(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        cur.require(Self::SIZE)?;
        Self::parse(cur)
    }
}

/// One combat or life skill.  Which one is decided by the array it sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillRecord {
    pub skill_id:    i16,
    pub skill_level: i16,
    pub skill_exp:   u32,
}

impl FixedRecord for SkillRecord {
    const SIZE: usize = 8;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            skill_id:    cur.read_i16()?,
            skill_level: cur.read_i16()?,
            skill_exp:   cur.read_u32()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    pub task_id:    i32,
    pub task_value: i32,
}

impl FixedRecord for TaskRecord {
    const SIZE: usize = 8;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            task_id:    cur.read_i32()?,
            task_value: cur.read_i32()?,
        })
    }
}

/// Header in front of every item group and every extension block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupHeader {
    pub data_type:  i32,
    pub data_count: i16,
    pub data_len:   i32,
}

impl FixedRecord for GroupHeader {
    const SIZE: usize = 10;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            data_type:  cur.read_i32()?,
            data_count: cur.read_i16()?,
            data_len:   cur.read_i32()?,
        })
    }
}
