//! Arrays whose length is never stored, only implied by two section offsets.
//!
//! `count = (next_offset - this_offset) / R::SIZE`.  Reading always starts at
//! the current cursor, not at `this_offset`; the offsets only size the array.

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::record::FixedRecord;

/// Element count implied by an offset pair.
pub fn derived_count(this_offset: u32, next_offset: u32, record_size: usize) -> Result<usize, DecodeError> {
    if next_offset < this_offset {
        return Err(DecodeError::InconsistentOffsets { this: this_offset, next: next_offset });
    }
    Ok((next_offset - this_offset) as usize / record_size)
}

/// Read `derived_count(this, next)` records of type `R`.
///
/// A zero count returns an empty vector without touching the cursor.  The
/// whole span is bounds-checked before the first record is read, so a short
/// buffer never yields a partial array.
pub fn read_derived<R: FixedRecord>(
    cur:         &mut ByteCursor<'_>,
    this_offset: u32,
    next_offset: u32,
) -> Result<Vec<R>, DecodeError> {
    let count = derived_count(this_offset, next_offset, R::SIZE)?;
    if count == 0 {
        return Ok(Vec::new());
    }
    cur.require(count * R::SIZE)?;

    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(R::parse(cur)?);
    }
    Ok(out)
}
