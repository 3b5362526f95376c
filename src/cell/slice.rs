//! Cell reading
//!
//! The read-side mirror of [`CellBuilder`](super::CellBuilder), used to
//! decode get-method results and to inspect built messages in tests.

use super::{Cell, CellError};
use crate::types::{Address, Coins};

/// A cursor over a cell's bits and references
#[derive(Debug, Clone)]
pub struct CellSlice<'a> {
    cell: &'a Cell,
    bit: usize,
    ref_idx: usize,
}

impl<'a> CellSlice<'a> {
    pub(super) fn new(cell: &'a Cell) -> Self {
        Self {
            cell,
            bit: 0,
            ref_idx: 0,
        }
    }

    /// Bits not yet read
    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len - self.bit
    }

    /// References not yet read
    pub fn remaining_refs(&self) -> usize {
        self.cell.refs.len() - self.ref_idx
    }

    /// Read a single bit
    pub fn load_bit(&mut self) -> Result<bool, CellError> {
        if self.bit >= self.cell.bit_len {
            return Err(CellError::Underflow);
        }
        let byte = self.cell.data[self.bit / 8];
        let bit = byte & (0x80 >> (self.bit % 8)) != 0;
        self.bit += 1;
        Ok(bit)
    }

    /// Read an unsigned big-endian integer of exactly `bits` bits
    pub fn load_uint(&mut self, bits: u32) -> Result<u64, CellError> {
        debug_assert!(bits <= 64);
        let mut value = 0u64;
        for _ in 0..bits {
            value = value << 1 | self.load_bit()? as u64;
        }
        Ok(value)
    }

    /// Read `n` raw bytes
    pub fn load_bytes(&mut self, n: usize) -> Result<Vec<u8>, CellError> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.load_uint(8)? as u8);
        }
        Ok(out)
    }

    /// Read a variable-length monetary amount
    pub fn load_coins(&mut self) -> Result<Coins, CellError> {
        let byte_len = self.load_uint(4)?;
        let mut nano = 0u128;
        for _ in 0..byte_len {
            nano = nano << 8 | self.load_uint(8)? as u128;
        }
        Ok(Coins::from_nano(nano))
    }

    /// Read a canonical address
    pub fn load_address(&mut self) -> Result<Address, CellError> {
        let tag = self.load_uint(2)?;
        let anycast = self.load_bit()?;
        if tag != 0b10 || anycast {
            return Err(CellError::BadAddress);
        }
        let workchain = self.load_uint(8)? as u8 as i8;
        let bytes = self.load_bytes(32)?;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes);
        Ok(Address::new(workchain, hash))
    }

    /// Read the next child reference
    pub fn load_ref(&mut self) -> Result<&'a Cell, CellError> {
        let cell = self.cell.refs.get(self.ref_idx).ok_or(CellError::Underflow)?;
        self.ref_idx += 1;
        Ok(cell)
    }

    /// Read all remaining whole bytes, following the chain of child cells
    /// written by [`CellBuilder::store_tail`](super::CellBuilder::store_tail)
    pub fn load_tail(&mut self) -> Result<Vec<u8>, CellError> {
        let mut out = self.load_bytes(self.remaining_bits() / 8)?;
        if self.remaining_refs() > 0 {
            out.extend(self.load_ref()?.parse().load_tail()?);
        }
        Ok(out)
    }
}
