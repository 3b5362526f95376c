//! Monetary amounts
//!
//! Amounts are fixed-point integers with 9 decimal places ("nano" units),
//! stored in a `u128` so the full 120-bit wire range fits. All prompt and
//! config input passes through [`Coins::from_tokens`], the single place
//! where decimal strings are parsed.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Decimal places in the human-readable token form
pub const DECIMALS: u32 = 9;

const NANO_PER_TOKEN: u128 = 1_000_000_000;

/// Amount parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoinsError {
    #[error("amount is not a decimal number: {0:?}")]
    NotANumber(String),
    #[error("amount has more than {DECIMALS} decimal places: {0:?}")]
    TooManyDecimals(String),
    #[error("amount is too large: {0:?}")]
    Overflow(String),
}

/// A monetary amount in nano units
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Coins(u128);

impl Coins {
    pub const ZERO: Coins = Coins(0);

    /// Construct from raw nano units
    pub const fn from_nano(nano: u128) -> Self {
        Coins(nano)
    }

    /// Construct from whole tokens
    pub const fn from_tokens_whole(tokens: u64) -> Self {
        Coins(tokens as u128 * NANO_PER_TOKEN)
    }

    /// Raw nano units
    pub const fn as_nano(self) -> u128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Coins) -> Option<Coins> {
        self.0.checked_add(other.0).map(Coins)
    }

    pub fn checked_sub(self, other: Coins) -> Option<Coins> {
        self.0.checked_sub(other.0).map(Coins)
    }

    /// Parse a decimal token amount, e.g. `"1.5"` -> 1_500_000_000 nano
    pub fn from_tokens(text: &str) -> Result<Self, CoinsError> {
        let text = text.trim();
        let (whole, frac) = match text.split_once('.') {
            Some((w, f)) => (w, f),
            None => (text, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(CoinsError::NotANumber(text.to_string()));
        }
        if frac.len() > DECIMALS as usize {
            return Err(CoinsError::TooManyDecimals(text.to_string()));
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| CoinsError::NotANumber(text.to_string()))?
        };

        let frac: u128 = if frac.is_empty() {
            0
        } else {
            let scale = 10u128.pow(DECIMALS - frac.len() as u32);
            let digits: u128 = frac
                .parse()
                .map_err(|_| CoinsError::NotANumber(text.to_string()))?;
            digits * scale
        };

        whole
            .checked_mul(NANO_PER_TOKEN)
            .and_then(|n| n.checked_add(frac))
            .map(Coins)
            .ok_or_else(|| CoinsError::Overflow(text.to_string()))
    }
}

impl fmt::Display for Coins {
    /// Human-readable token form with trailing zeros trimmed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / NANO_PER_TOKEN;
        let frac = self.0 % NANO_PER_TOKEN;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let frac = format!("{frac:09}");
        write!(f, "{whole}.{}", frac.trim_end_matches('0'))
    }
}

impl fmt::Debug for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coins({self})")
    }
}

impl FromStr for Coins {
    type Err = CoinsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Coins::from_tokens(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fraction() {
        assert_eq!(Coins::from_tokens("1.5").unwrap(), Coins::from_nano(1_500_000_000));
        assert_eq!(Coins::from_tokens("0.000000001").unwrap(), Coins::from_nano(1));
        assert_eq!(Coins::from_tokens("100").unwrap(), Coins::from_nano(100_000_000_000));
        assert_eq!(Coins::from_tokens(".5").unwrap(), Coins::from_nano(500_000_000));
        assert_eq!(Coins::from_tokens("0").unwrap(), Coins::ZERO);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Coins::from_tokens("abc").is_err());
        assert!(Coins::from_tokens("1.2.3").is_err());
        assert!(Coins::from_tokens("").is_err());
        assert!(Coins::from_tokens("-1").is_err());
        assert!(matches!(
            Coins::from_tokens("1.0000000001"),
            Err(CoinsError::TooManyDecimals(_))
        ));
    }

    #[test]
    fn test_display_trims_zeros() {
        assert_eq!(Coins::from_nano(1_500_000_000).to_string(), "1.5");
        assert_eq!(Coins::from_nano(1_000_000_000).to_string(), "1");
        assert_eq!(Coins::from_nano(1).to_string(), "0.000000001");
        assert_eq!(Coins::ZERO.to_string(), "0");
    }

    #[test]
    fn test_checked_math() {
        let a = Coins::from_nano(5);
        let b = Coins::from_nano(3);
        assert_eq!(a.checked_add(b), Some(Coins::from_nano(8)));
        assert_eq!(a.checked_sub(b), Some(Coins::from_nano(2)));
        assert_eq!(b.checked_sub(a), None);
    }
}
