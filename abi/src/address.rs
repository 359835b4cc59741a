//! 20-byte account addresses.

use {
    crate::error::AbiError,
    serde::{de, Deserialize, Deserializer, Serialize, Serializer},
    sha3::{Digest, Keccak256},
    std::{fmt, str::FromStr},
};

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// An EVM account or contract address.
///
/// Parsing is case-insensitive; [`fmt::Display`] renders the EIP-55 mixed-case
/// checksum form, the same form wallets and block explorers show.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address, used as "no sponsor".
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses a `0x`-prefixed literal in a `const` item, so a bad literal
    /// fails the build. Casing is not checked.
    pub const fn from_literal(s: &str) -> Self {
        let digits = s.as_bytes();
        assert!(
            digits.len() == 2 + ADDRESS_LEN * 2
                && digits[0] == b'0'
                && (digits[1] == b'x' || digits[1] == b'X'),
            "address literal must be 0x followed by 40 hex digits"
        );
        let mut bytes = [0u8; ADDRESS_LEN];
        let mut i = 0;
        while i < ADDRESS_LEN {
            bytes[i] = (hex_nibble(digits[2 + 2 * i]) << 4) | hex_nibble(digits[3 + 2 * i]);
            i += 1;
        }
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// Returns `true` if `s` is syntactically an address: `0x` followed by
    /// exactly 40 hex digits. Checksum casing is not enforced.
    pub fn is_well_formed(s: &str) -> bool {
        s.parse::<Address>().is_ok()
    }

    /// Lowercase `0x`-prefixed hex.
    pub fn to_lower_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 checksum encoding.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());
        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

const fn hex_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit in address literal"),
    }
}

impl FromStr for Address {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| AbiError::InvalidAddress(s.to_string()))?;
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(AbiError::InvalidAddress(s.to_string()));
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| AbiError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.trim().parse().map_err(de::Error::custom)
    }
}
