//! Incremental cell construction
//!
//! Mirrors the write side of the wire layout: unsigned integers of a fixed
//! width, single bits, variable-length coin amounts, canonical addresses
//! and child references. All writes check capacity up front so a finished
//! builder always yields a valid cell.

use super::{Cell, CellError, MAX_BITS, MAX_REFS};
use crate::types::{Address, Coins};

/// Builder for a single [`Cell`]
#[derive(Debug, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Cell>,
}

impl CellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits written so far
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    fn ensure_capacity(&self, bits: usize) -> Result<(), CellError> {
        let total = self.bit_len + bits;
        if total > MAX_BITS {
            return Err(CellError::BitOverflow(total - MAX_BITS));
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    /// Store a single bit
    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, CellError> {
        self.ensure_capacity(1)?;
        self.push_bit(bit);
        Ok(self)
    }

    /// Store an unsigned integer in exactly `bits` bits, big-endian
    pub fn store_uint(&mut self, value: u64, bits: u32) -> Result<&mut Self, CellError> {
        debug_assert!(bits <= 64);
        if bits < 64 && value >> bits != 0 {
            return Err(CellError::ValueTooWide {
                value: value as u128,
                bits,
            });
        }
        self.ensure_capacity(bits as usize)?;
        for i in (0..bits).rev() {
            self.push_bit(value >> i & 1 == 1);
        }
        Ok(self)
    }

    /// Store raw bytes
    pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, CellError> {
        self.ensure_capacity(bytes.len() * 8)?;
        for b in bytes {
            for i in (0..8).rev() {
                self.push_bit(b >> i & 1 == 1);
            }
        }
        Ok(self)
    }

    /// Store a monetary amount: a 4-bit byte-length prefix followed by the
    /// minimal big-endian byte representation
    pub fn store_coins(&mut self, amount: Coins) -> Result<&mut Self, CellError> {
        let nano = amount.as_nano();
        let byte_len = (16 - (nano.leading_zeros() / 8) as usize).min(16);
        if byte_len > 15 {
            return Err(CellError::CoinsTooWide);
        }
        self.ensure_capacity(4 + byte_len * 8)?;
        self.store_uint(byte_len as u64, 4)?;
        for i in (0..byte_len).rev() {
            self.store_uint((nano >> (i * 8)) as u64 & 0xff, 8)?;
        }
        Ok(self)
    }

    /// Store a canonical address: 2-bit tag, no-anycast bit, signed 8-bit
    /// workchain, 256-bit account hash
    pub fn store_address(&mut self, address: &Address) -> Result<&mut Self, CellError> {
        self.ensure_capacity(2 + 1 + 8 + 256)?;
        self.store_uint(0b10, 2)?;
        self.store_bit(false)?;
        self.store_uint(address.workchain as u8 as u64, 8)?;
        self.store_bytes(&address.hash)?;
        Ok(self)
    }

    /// Store a child reference
    pub fn store_ref(&mut self, cell: Cell) -> Result<&mut Self, CellError> {
        if self.refs.len() == MAX_REFS {
            return Err(CellError::RefOverflow);
        }
        self.refs.push(cell);
        Ok(self)
    }

    /// Store a byte string, continuing into a chain of child cells when it
    /// does not fit in this one
    pub fn store_tail(&mut self, bytes: &[u8]) -> Result<&mut Self, CellError> {
        let fit = (MAX_BITS - self.bit_len) / 8;
        if bytes.len() <= fit {
            return self.store_bytes(bytes);
        }
        let (head, rest) = bytes.split_at(fit);
        self.store_bytes(head)?;
        let mut child = CellBuilder::new();
        child.store_tail(rest)?;
        self.store_ref(child.build())
    }

    /// Finish and produce the immutable cell
    pub fn build(self) -> Cell {
        Cell {
            data: self.data,
            bit_len: self.bit_len,
            refs: self.refs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_uint_layout() {
        let mut b = CellBuilder::new();
        b.store_uint(0xc2e7027b, 32).unwrap();
        let cell = b.build();
        assert_eq!(cell.bit_len(), 32);
        assert_eq!(&cell.data[..4], &[0xc2, 0xe7, 0x02, 0x7b]);
    }

    #[test]
    fn test_store_uint_rejects_wide_value() {
        let mut b = CellBuilder::new();
        assert_eq!(
            b.store_uint(256, 8).unwrap_err(),
            CellError::ValueTooWide { value: 256, bits: 8 }
        );
    }

    #[test]
    fn test_store_bits_are_msb_first() {
        let mut b = CellBuilder::new();
        b.store_bit(true).unwrap().store_bit(false).unwrap();
        let cell = b.build();
        assert_eq!(cell.data[0], 0b1000_0000);
        assert_eq!(cell.bit_len(), 2);
    }

    #[test]
    fn test_store_coins_minimal_bytes() {
        let mut b = CellBuilder::new();
        b.store_coins(Coins::ZERO).unwrap();
        let cell = b.build();
        // zero encodes as just the 4-bit length prefix
        assert_eq!(cell.bit_len(), 4);
        assert_eq!(cell.data[0] >> 4, 0);

        let mut b = CellBuilder::new();
        b.store_coins(Coins::from_nano(0x1_0000)).unwrap();
        let cell = b.build();
        assert_eq!(cell.bit_len(), 4 + 3 * 8);
        let mut s = cell.parse();
        assert_eq!(s.load_coins().unwrap(), Coins::from_nano(0x1_0000));
    }

    #[test]
    fn test_store_address_roundtrip() {
        let addr = Address::new(-1, [0x5a; 32]);
        let mut b = CellBuilder::new();
        b.store_address(&addr).unwrap();
        let cell = b.build();
        assert_eq!(cell.bit_len(), 267);
        assert_eq!(cell.parse().load_address().unwrap(), addr);
    }

    #[test]
    fn test_capacity_limits() {
        let mut b = CellBuilder::new();
        b.store_bytes(&[0u8; 127]).unwrap();
        // 1016 bits used, 7 left
        assert!(b.store_uint(0, 7).is_ok());
        assert!(matches!(
            b.store_bit(true),
            Err(CellError::BitOverflow(1))
        ));

        let mut b = CellBuilder::new();
        for _ in 0..MAX_REFS {
            b.store_ref(Cell::empty()).unwrap();
        }
        assert_eq!(b.store_ref(Cell::empty()).unwrap_err(), CellError::RefOverflow);
    }
}
