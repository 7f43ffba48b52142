//! Bounds-checked little-endian read head over a borrowed byte slice.
//!
//! Every read either succeeds and advances, or fails with
//! [`DecodeError::TruncatedInput`] and leaves the position untouched.  The
//! format is little-endian throughout; there is no per-call byte order.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::DecodeError;

#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Move to an absolute position.  Seeking past the end is a truncation.
    pub fn seek(&mut self, absolute: usize) -> Result<(), DecodeError> {
        if absolute > self.buf.len() {
            return Err(DecodeError::TruncatedInput {
                offset:    self.pos,
                needed:    absolute - self.pos,
                available: self.remaining(),
            });
        }
        self.pos = absolute;
        Ok(())
    }

    /// Fail unless `n` more bytes are available.  Does not advance.
    pub fn require(&self, n: usize) -> Result<(), DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::TruncatedInput {
                offset:    self.pos,
                needed:    n,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        self.require(n)?;
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, DecodeError> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_i16_array<const N: usize>(&mut self) -> Result<[i16; N], DecodeError> {
        self.require(N * 2)?;
        let mut out = [0i16; N];
        for v in &mut out {
            *v = self.read_i16()?;
        }
        Ok(out)
    }

    pub fn read_i32_array<const N: usize>(&mut self) -> Result<[i32; N], DecodeError> {
        self.require(N * 4)?;
        let mut out = [0i32; N];
        for v in &mut out {
            *v = self.read_i32()?;
        }
        Ok(out)
    }
}
