//! Item section: a chain of group headers, each followed by `data_count`
//! items whose optional sub-records are selected by the header's
//! capability mask.
//!
//! Sub-records always appear in the order Standard, LockSoul, Bill, Extend.
//! An absent sub-record occupies no bytes.

use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::record::{FixedRecord, GroupHeader};

pub const MASK_STANDARD:  i32 = 0x1;
pub const MASK_LOCK_SOUL: i32 = 0x2;
pub const MASK_BILL:      i32 = 0x4;
pub const MASK_EXTEND:    i32 = 0x8;

/// Which optional sub-records follow each item of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapabilityMask(u8);

impl CapabilityMask {
    /// Only the low four bits of `data_type` are meaningful.
    pub fn from_data_type(data_type: i32) -> Self {
        Self((data_type & 0xF) as u8)
    }

    pub fn standard(self)  -> bool { self.0 as i32 & MASK_STANDARD  != 0 }
    pub fn lock_soul(self) -> bool { self.0 as i32 & MASK_LOCK_SOUL != 0 }
    pub fn bill(self)      -> bool { self.0 as i32 & MASK_BILL      != 0 }
    pub fn extend(self)    -> bool { self.0 as i32 & MASK_EXTEND    != 0 }

    /// Bytes one item of this group occupies.
    pub fn item_size(self) -> usize {
        let mut n = 0;
        if self.standard()  { n += ItemStandard::SIZE; }
        if self.lock_soul() { n += ItemLockSoul::SIZE; }
        if self.bill()      { n += ItemBill::SIZE; }
        if self.extend()    { n += ItemExtend::SIZE; }
        n
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemStandard {
    pub class_code:      u32,
    pub detail_type:     i32,
    pub particular_type: i32,
    pub level:           i32,
    pub series:          i32,
    pub place:           i32,
    pub x:               i32,
    pub y:               i32,
    pub stack_count:     i32,
    pub durability:      i32,
    pub random_seed:     u32,
    pub lucky:           i32,
    pub magic_levels:    [i16; 6],
    pub flags:           u32,
}

impl ItemStandard {
    /// Item genre lives in the low 16 bits of the class code.
    pub fn genre(&self) -> u32 {
        self.class_code & 0x0000_FFFF
    }
}

impl FixedRecord for ItemStandard {
    const SIZE: usize = 64;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            class_code:      cur.read_u32()?,
            detail_type:     cur.read_i32()?,
            particular_type: cur.read_i32()?,
            level:           cur.read_i32()?,
            series:          cur.read_i32()?,
            place:           cur.read_i32()?,
            x:               cur.read_i32()?,
            y:               cur.read_i32()?,
            stack_count:     cur.read_i32()?,
            durability:      cur.read_i32()?,
            random_seed:     cur.read_u32()?,
            lucky:           cur.read_i32()?,
            magic_levels:    cur.read_i16_array()?,
            flags:           cur.read_u32()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemLockSoul {
    pub lock_type: i32,
    pub lock_time: u32,
    pub soul_ids:  [i16; 4],
}

impl FixedRecord for ItemLockSoul {
    const SIZE: usize = 16;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            lock_type: cur.read_i32()?,
            lock_time: cur.read_u32()?,
            soul_ids:  cur.read_i16_array()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemBill {
    pub expired_time:    u32,
    pub currency_type:   i32,
    pub come_from_place: i32,
    pub price:           i32,
}

impl FixedRecord for ItemBill {
    const SIZE: usize = 16;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            expired_time:    cur.read_u32()?,
            currency_type:   cur.read_i32()?,
            come_from_place: cur.read_i32()?,
            price:           cur.read_i32()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemExtend {
    pub params: [i32; 8],
}

impl FixedRecord for ItemExtend {
    const SIZE: usize = 32;

    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        Ok(Self { params: cur.read_i32_array()? })
    }
}

/// One item.  Each `Option` is `Some` exactly when its mask bit was set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ItemRecord {
    pub standard:  Option<ItemStandard>,
    pub lock_soul: Option<ItemLockSoul>,
    pub bill:      Option<ItemBill>,
    pub extend:    Option<ItemExtend>,
}

impl ItemRecord {
    pub fn has_standard(&self)  -> bool { self.standard.is_some() }
    pub fn has_lock_soul(&self) -> bool { self.lock_soul.is_some() }
    pub fn has_bill(&self)      -> bool { self.bill.is_some() }
    pub fn has_extend(&self)    -> bool { self.extend.is_some() }

    fn read(cur: &mut ByteCursor<'_>, mask: CapabilityMask) -> Result<Self, DecodeError> {
        cur.require(mask.item_size())?;
        Ok(Self {
            standard:  if mask.standard()  { Some(ItemStandard::parse(cur)?) } else { None },
            lock_soul: if mask.lock_soul() { Some(ItemLockSoul::parse(cur)?) } else { None },
            bill:      if mask.bill()      { Some(ItemBill::parse(cur)?) } else { None },
            extend:    if mask.extend()    { Some(ItemExtend::parse(cur)?) } else { None },
        })
    }
}

/// Read items until `item_count` have been produced.
///
/// Fails with [`DecodeError::ItemCountMismatch`] when a group header would
/// overshoot the declared count, or announces a non-positive count (which
/// could never make progress).  A non-positive `item_count` means no items.
pub fn read_items(cur: &mut ByteCursor<'_>, item_count: i16) -> Result<Vec<ItemRecord>, DecodeError> {
    if item_count <= 0 {
        return Ok(Vec::new());
    }

    let declared = item_count as usize;
    let mut items = Vec::with_capacity(declared);

    while items.len() < declared {
        let header = GroupHeader::read(cur)?;
        let announced = items.len() as i64 + header.data_count as i64;
        if header.data_count <= 0 || announced > declared as i64 {
            return Err(DecodeError::ItemCountMismatch { declared: item_count, announced });
        }

        let mask = CapabilityMask::from_data_type(header.data_type);
        for _ in 0..header.data_count {
            items.push(ItemRecord::read(cur, mask)?);
        }
    }

    Ok(items)
}
