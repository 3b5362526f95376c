//! Bit-level cell representation
//!
//! Every contract message, configuration blob and get-method result is a
//! tree of cells: up to 1023 data bits plus up to four references to child
//! cells. Encoding is deterministic, and the cell hash (SHA-256 over the
//! descriptor bytes, the padded data and each child's depth and hash) is
//! what contract address derivation relies on.

mod builder;
mod slice;

pub use builder::CellBuilder;
pub use slice::CellSlice;

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Maximum number of data bits in a single cell
pub const MAX_BITS: usize = 1023;

/// Maximum number of child references in a single cell
pub const MAX_REFS: usize = 4;

/// Cell construction and parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CellError {
    #[error("cell data capacity exceeded: {0} bits over the {MAX_BITS}-bit limit")]
    BitOverflow(usize),
    #[error("cell reference capacity exceeded ({MAX_REFS} max)")]
    RefOverflow,
    #[error("value {value} does not fit in {bits} bits")]
    ValueTooWide { value: u128, bits: u32 },
    #[error("amount does not fit in the coins encoding")]
    CoinsTooWide,
    #[error("attempted to read past the end of a cell")]
    Underflow,
    #[error("malformed address field")]
    BadAddress,
    #[error("malformed cell tree encoding")]
    BadTree,
}

/// An immutable cell: a bit string plus child references
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    pub(crate) data: Vec<u8>,
    pub(crate) bit_len: usize,
    pub(crate) refs: Vec<Cell>,
}

impl Cell {
    /// An empty cell with no data and no references
    pub fn empty() -> Self {
        Cell::default()
    }

    /// Number of data bits
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Child references
    pub fn refs(&self) -> &[Cell] {
        &self.refs
    }

    /// Start reading this cell
    pub fn parse(&self) -> CellSlice<'_> {
        CellSlice::new(self)
    }

    /// Depth of the cell tree (0 for a leaf)
    pub fn depth(&self) -> u16 {
        self.refs
            .iter()
            .map(|r| r.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Deterministic representation hash
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();

        // Descriptor bytes: ref count, then data length in half-bytes
        let d1 = self.refs.len() as u8;
        let d2 = (self.bit_len / 8 + self.bit_len.div_ceil(8)) as u8;
        hasher.update([d1, d2]);

        // Data padded with a completion tag when not byte-aligned
        let mut data = self.data.clone();
        data.truncate(self.bit_len.div_ceil(8));
        if self.bit_len % 8 != 0 {
            let last = data.len() - 1;
            data[last] |= 0x80 >> (self.bit_len % 8);
        }
        hasher.update(&data);

        for r in &self.refs {
            hasher.update(r.depth().to_be_bytes());
        }
        for r in &self.refs {
            hasher.update(r.hash());
        }

        hasher.finalize().into()
    }

    /// Wrap an opaque byte blob into a cell chain
    ///
    /// Bytes beyond one cell's capacity continue in a single child
    /// reference, recursively. Used for externally compiled code blobs.
    pub fn pack_blob(bytes: &[u8]) -> Result<Cell, CellError> {
        let mut b = CellBuilder::new();
        b.store_tail(bytes)?;
        Ok(b.build())
    }

    /// Serialize the cell tree for transport
    ///
    /// Pre-order layout per cell: 16-bit bit length, raw data bytes,
    /// 8-bit reference count, then each child. This is the interchange
    /// form the ledger facade accepts and returns.
    pub fn encode_tree(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.bit_len as u16).to_be_bytes());
        out.extend_from_slice(&self.data[..self.bit_len.div_ceil(8)]);
        out.push(self.refs.len() as u8);
        for r in &self.refs {
            r.encode_into(out);
        }
    }

    /// Parse a cell tree produced by [`Cell::encode_tree`]
    pub fn decode_tree(bytes: &[u8]) -> Result<Cell, CellError> {
        let mut pos = 0usize;
        let cell = Self::decode_from(bytes, &mut pos)?;
        if pos != bytes.len() {
            return Err(CellError::BadTree);
        }
        Ok(cell)
    }

    fn decode_from(bytes: &[u8], pos: &mut usize) -> Result<Cell, CellError> {
        let take = |pos: &mut usize, n: usize| -> Result<usize, CellError> {
            let start = *pos;
            *pos = pos.checked_add(n).ok_or(CellError::BadTree)?;
            if *pos > bytes.len() {
                return Err(CellError::BadTree);
            }
            Ok(start)
        };

        let at = take(pos, 2)?;
        let bit_len = u16::from_be_bytes([bytes[at], bytes[at + 1]]) as usize;
        if bit_len > MAX_BITS {
            return Err(CellError::BadTree);
        }

        let byte_len = bit_len.div_ceil(8);
        let at = take(pos, byte_len)?;
        let data = bytes[at..at + byte_len].to_vec();

        let at = take(pos, 1)?;
        let ref_count = bytes[at] as usize;
        if ref_count > MAX_REFS {
            return Err(CellError::BadTree);
        }

        let mut refs = Vec::with_capacity(ref_count);
        for _ in 0..ref_count {
            refs.push(Self::decode_from(bytes, pos)?);
        }

        Ok(Cell {
            data,
            bit_len,
            refs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let build = || {
            let mut b = CellBuilder::new();
            b.store_uint(0xdead_beef, 32)
                .unwrap()
                .store_bit(true)
                .unwrap();
            b.build()
        };
        assert_eq!(build().hash(), build().hash());
    }

    #[test]
    fn test_hash_depends_on_data_and_refs() {
        let mut a = CellBuilder::new();
        a.store_uint(1, 8).unwrap();
        let a = a.build();

        let mut b = CellBuilder::new();
        b.store_uint(2, 8).unwrap();
        let b = b.build();

        assert_ne!(a.hash(), b.hash());

        let mut with_ref = CellBuilder::new();
        with_ref.store_uint(1, 8).unwrap();
        with_ref.store_ref(b).unwrap();
        assert_ne!(a.hash(), with_ref.build().hash());
    }

    #[test]
    fn test_depth() {
        let leaf = Cell::empty();
        assert_eq!(leaf.depth(), 0);

        let mut mid = CellBuilder::new();
        mid.store_ref(leaf).unwrap();
        let mid = mid.build();
        assert_eq!(mid.depth(), 1);

        let mut top = CellBuilder::new();
        top.store_ref(mid).unwrap();
        assert_eq!(top.build().depth(), 2);
    }

    #[test]
    fn test_tree_codec_roundtrip() {
        let mut inner = CellBuilder::new();
        inner.store_uint(42, 16).unwrap();
        let mut outer = CellBuilder::new();
        outer
            .store_bit(true)
            .unwrap()
            .store_uint(7, 5)
            .unwrap()
            .store_ref(inner.build())
            .unwrap();
        let cell = outer.build();

        let decoded = Cell::decode_tree(&cell.encode_tree()).unwrap();
        assert_eq!(decoded, cell);
        assert_eq!(decoded.hash(), cell.hash());
    }

    #[test]
    fn test_tree_codec_rejects_truncated() {
        let mut b = CellBuilder::new();
        b.store_uint(99, 32).unwrap();
        let bytes = b.build().encode_tree();
        assert_eq!(
            Cell::decode_tree(&bytes[..bytes.len() - 1]),
            Err(CellError::BadTree)
        );
    }

    #[test]
    fn test_pack_blob_chains_long_input() {
        let blob: Vec<u8> = (0..300).map(|i| (i % 251) as u8).collect();
        let cell = Cell::pack_blob(&blob).unwrap();
        assert!(cell.depth() >= 1);
        assert_eq!(cell.parse().load_tail().unwrap(), blob);
    }
}
