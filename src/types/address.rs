//! Canonical ledger addresses
//!
//! An address is a workchain id plus a 256-bit account hash. The textual
//! form is the raw `workchain:hex` notation, e.g.
//! `0:0000...0000` for the zero address.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Address parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address must have the form workchain:hex, got {0:?}")]
    MissingSeparator(String),
    #[error("invalid workchain id: {0}")]
    InvalidWorkchain(String),
    #[error("account hash must be 64 hex characters, got {0}")]
    InvalidHashLength(usize),
    #[error("account hash is not valid hex: {0}")]
    InvalidHex(String),
}

/// A canonical account address: workchain id + 256-bit account hash
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    /// Workchain id (signed 8-bit on the wire)
    pub workchain: i8,
    /// 256-bit account hash
    pub hash: [u8; 32],
}

impl Address {
    /// The all-zero address in the base workchain
    pub const ZERO: Address = Address {
        workchain: 0,
        hash: [0u8; 32],
    };

    /// Create an address from its parts
    pub fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.workchain, hex::encode(self.hash))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (wc, hash) = s
            .split_once(':')
            .ok_or_else(|| AddressError::MissingSeparator(s.to_string()))?;

        let workchain: i8 = wc
            .parse()
            .map_err(|_| AddressError::InvalidWorkchain(wc.to_string()))?;

        if hash.len() != 64 {
            return Err(AddressError::InvalidHashLength(hash.len()));
        }

        let bytes = hex::decode(hash).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);

        Ok(Address::new(workchain, out))
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        let text = format!("0:{}", "ab".repeat(32));
        let addr: Address = text.parse().unwrap();
        assert_eq!(addr.workchain, 0);
        assert_eq!(addr.hash[0], 0xab);
        assert_eq!(addr.to_string(), text);
    }

    #[test]
    fn test_parse_negative_workchain() {
        let text = format!("-1:{}", "00".repeat(32));
        let addr: Address = text.parse().unwrap();
        assert_eq!(addr.workchain, -1);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "nocolon".parse::<Address>(),
            Err(AddressError::MissingSeparator(_))
        ));
        assert!(matches!(
            "0:abcd".parse::<Address>(),
            Err(AddressError::InvalidHashLength(4))
        ));
        let bad = format!("0:{}", "zz".repeat(32));
        assert!(matches!(
            bad.parse::<Address>(),
            Err(AddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_zero_address() {
        assert_eq!(
            Address::ZERO.to_string(),
            format!("0:{}", "00".repeat(32))
        );
    }
}
