//! # Core Protocol Entities
//!
//! ## Property id space
//!
//! | Range | Meaning |
//! |-------|---------|
//! | `0` | never a valid property |
//! | `1` | base protocol currency (main ecosystem) |
//! | `2` | base protocol test currency (test ecosystem) |
//! | `3 ..= 0x7FFF_FFFF` | main ecosystem tokens |
//! | `0x8000_0003 ..` | test ecosystem tokens |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::TypeError;

/// Minor units in one base-ledger coin.
pub const COIN: i64 = 100_000_000;

/// Largest amount the protocol can represent (8-byte signed integer).
pub const MAX_INT_8_BYTES: i64 = i64::MAX;

/// First property id allocated in the test ecosystem.
pub const TEST_ECO_PROPERTY_1: u32 = 0x8000_0003;

/// Maximum length of free-text fields (names, urls, memos).
pub const MAX_TEXT_LENGTH: usize = 255;

// =============================================================================
// ADDRESSES
// =============================================================================

/// A base-ledger address in its textual encoding.
///
/// The subsystem never decodes addresses; equality is string equality, which
/// is what issuer checks compare against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// PROPERTIES
// =============================================================================

/// Numeric identifier of a token class.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PropertyId(pub u32);

impl PropertyId {
    /// The base protocol currency.
    pub const OMNI: PropertyId = PropertyId(1);
    /// The base protocol test currency.
    pub const TEST_OMNI: PropertyId = PropertyId(2);

    pub fn value(self) -> u32 {
        self.0
    }

    /// True for the base currency pair, the only properties tradable on the DEx.
    pub fn is_base_currency(self) -> bool {
        self == Self::OMNI || self == Self::TEST_OMNI
    }

    pub fn ecosystem(self) -> Ecosystem {
        if self == Self::TEST_OMNI || self.0 >= TEST_ECO_PROPERTY_1 {
            Ecosystem::Test
        } else {
            Ecosystem::Main
        }
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PropertyId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Partition a property belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ecosystem {
    Main = 1,
    Test = 2,
}

impl Ecosystem {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Main),
            2 => Some(Self::Test),
            _ => None,
        }
    }
}

/// Token type chosen at issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Indivisible = 1,
    Divisible = 2,
}

impl PropertyType {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::Indivisible),
            2 => Some(Self::Divisible),
            _ => None,
        }
    }

    pub fn is_divisible(self) -> bool {
        matches!(self, Self::Divisible)
    }
}

// =============================================================================
// TRANSACTION IDS
// =============================================================================

/// A base-ledger transaction id.
///
/// Stored in internal byte order; displayed byte-reversed, the way the base
/// ledger prints transaction hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TxId(pub [u8; 32]);

impl TxId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        let mut display = self.0;
        display.reverse();
        hex::encode(display)
    }

    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let decoded = hex::decode(s).map_err(|e| TypeError::InvalidTxId(e.to_string()))?;
        let mut bytes: [u8; 32] = decoded
            .try_into()
            .map_err(|v: Vec<u8>| TypeError::InvalidTxId(format!("expected 32 bytes, got {}", v.len())))?;
        bytes.reverse();
        Ok(Self(bytes))
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for TxId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for TxId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TxId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_currency_pair() {
        assert!(PropertyId::OMNI.is_base_currency());
        assert!(PropertyId::TEST_OMNI.is_base_currency());
        assert!(!PropertyId(0).is_base_currency());
        assert!(!PropertyId(3).is_base_currency());
    }

    #[test]
    fn test_ecosystem_from_id() {
        assert_eq!(PropertyId::OMNI.ecosystem(), Ecosystem::Main);
        assert_eq!(PropertyId::TEST_OMNI.ecosystem(), Ecosystem::Test);
        assert_eq!(PropertyId(31).ecosystem(), Ecosystem::Main);
        assert_eq!(PropertyId(0x7FFF_FFFF).ecosystem(), Ecosystem::Main);
        assert_eq!(PropertyId(TEST_ECO_PROPERTY_1).ecosystem(), Ecosystem::Test);
    }

    #[test]
    fn test_txid_display_is_byte_reversed() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xAB;
        let txid = TxId::from_bytes(bytes);
        let hex = txid.to_hex();
        assert!(hex.ends_with("ab"));
        assert_eq!(TxId::from_hex(&hex).unwrap(), txid);
    }

    #[test]
    fn test_txid_rejects_short_hex() {
        assert!(matches!(
            TxId::from_hex("abcd"),
            Err(TypeError::InvalidTxId(_))
        ));
    }

    #[test]
    fn test_txid_serde_as_hex_string() {
        let txid = TxId::from_bytes([0x11; 32]);
        let json = serde_json::to_string(&txid).unwrap();
        assert_eq!(json, format!("\"{}\"", "11".repeat(32)));
        let back: TxId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, txid);
    }

    #[test]
    fn test_type_codes() {
        assert_eq!(Ecosystem::from_code(2), Some(Ecosystem::Test));
        assert_eq!(Ecosystem::from_code(3), None);
        assert_eq!(PropertyType::from_code(2), Some(PropertyType::Divisible));
        assert!(!PropertyType::Indivisible.is_divisible());
    }
}
