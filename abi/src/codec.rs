//! Static ABI encoding and decoding.
//!
//! ## Wire format
//!
//! ```text
//! call data    = selector (4 bytes) ++ word(arg0) ++ word(arg1) ++ ...
//! return data  = word(field0) ++ word(field1) ++ ...
//! ```
//!
//! Every word is 32 bytes, big-endian, left-padded with zeros.

use {
    crate::{address::Address, error::AbiError},
    num_bigint::BigUint,
    num_traits::ToPrimitive,
    sha3::{Digest, Keccak256},
};

/// Size of one ABI word in bytes.
pub const WORD_LEN: usize = 32;

/// Size of a function selector in bytes.
pub const SELECTOR_LEN: usize = 4;

/// First four bytes of `keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; SELECTOR_LEN] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; SELECTOR_LEN];
    out.copy_from_slice(&hash[..SELECTOR_LEN]);
    out
}

/// `0x`-prefixed lowercase hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decodes hex with or without a `0x` prefix. `"0x"` decodes to an empty vec.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, AbiError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(digits).map_err(|e| AbiError::InvalidHex(e.to_string()))
}

/// A contract method, identified by its canonical signature
/// (e.g. `"approve(address,uint256)"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Function {
    pub signature: &'static str,
}

impl Function {
    pub const fn new(signature: &'static str) -> Self {
        Self { signature }
    }

    /// Method name without the parameter list.
    pub fn name(&self) -> &'static str {
        self.signature
            .split_once('(')
            .map_or(self.signature, |(name, _)| name)
    }

    pub fn selector(&self) -> [u8; SELECTOR_LEN] {
        selector(self.signature)
    }

    pub fn encode(&self, args: &[Token]) -> Result<Vec<u8>, AbiError> {
        encode_call(self.signature, args)
    }
}

/// A single static argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Uint(BigUint),
    Address(Address),
    Bool(bool),
}

impl From<u64> for Token {
    fn from(v: u64) -> Self {
        Token::Uint(BigUint::from(v))
    }
}

impl From<u8> for Token {
    fn from(v: u8) -> Self {
        Token::Uint(BigUint::from(v))
    }
}

impl From<BigUint> for Token {
    fn from(v: BigUint) -> Self {
        Token::Uint(v)
    }
}

impl From<Address> for Token {
    fn from(v: Address) -> Self {
        Token::Address(v)
    }
}

impl From<bool> for Token {
    fn from(v: bool) -> Self {
        Token::Bool(v)
    }
}

impl Token {
    fn to_word(&self) -> Result<[u8; WORD_LEN], AbiError> {
        let mut word = [0u8; WORD_LEN];
        match self {
            Token::Uint(v) => {
                if v.bits() > 256 {
                    return Err(AbiError::Overflow { bits: 256 });
                }
                let bytes = v.to_bytes_be();
                // `to_bytes_be` of zero is `[0]`, which still fits.
                word[WORD_LEN - bytes.len()..].copy_from_slice(&bytes);
            }
            Token::Address(a) => {
                word[WORD_LEN - a.as_bytes().len()..].copy_from_slice(a.as_bytes());
            }
            Token::Bool(b) => word[WORD_LEN - 1] = u8::from(*b),
        }
        Ok(word)
    }
}

/// Encodes a sequence of static values as consecutive words. This is also
/// the layout of a static tuple return value.
pub fn encode_words(values: &[Token]) -> Result<Vec<u8>, AbiError> {
    let mut data = Vec::with_capacity(values.len() * WORD_LEN);
    for value in values {
        data.extend_from_slice(&value.to_word()?);
    }
    Ok(data)
}

/// Encodes call data for `signature` with `args`.
pub fn encode_call(signature: &str, args: &[Token]) -> Result<Vec<u8>, AbiError> {
    let mut data = Vec::with_capacity(SELECTOR_LEN + args.len() * WORD_LEN);
    data.extend_from_slice(&selector(signature));
    data.extend_from_slice(&encode_words(args)?);
    Ok(data)
}

/// Reads a fixed tuple of static return values.
///
/// Construct with [`Decoder::exact`], which fails unless the data holds
/// exactly the declared number of words. Fields are then read in order.
#[derive(Debug)]
pub struct Decoder<'a> {
    words: std::slice::ChunksExact<'a, u8>,
    field: usize,
}

impl<'a> Decoder<'a> {
    pub fn exact(data: &'a [u8], fields: usize) -> Result<Self, AbiError> {
        let expected = fields.saturating_mul(WORD_LEN);
        if data.len() != expected {
            return Err(AbiError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            words: data.chunks_exact(WORD_LEN),
            field: 0,
        })
    }

    fn next_word(&mut self) -> Result<&'a [u8], AbiError> {
        let word = self.words.next().ok_or(AbiError::LengthMismatch {
            expected: self.field.saturating_add(1).saturating_mul(WORD_LEN),
            actual: self.field.saturating_mul(WORD_LEN),
        })?;
        self.field = self.field.saturating_add(1);
        Ok(word)
    }

    pub fn uint(&mut self) -> Result<BigUint, AbiError> {
        Ok(BigUint::from_bytes_be(self.next_word()?))
    }

    pub fn u64(&mut self) -> Result<u64, AbiError> {
        self.uint()?.to_u64().ok_or(AbiError::Overflow { bits: 64 })
    }

    pub fn u8(&mut self) -> Result<u8, AbiError> {
        self.uint()?.to_u8().ok_or(AbiError::Overflow { bits: 8 })
    }

    pub fn bool(&mut self) -> Result<bool, AbiError> {
        let field = self.field;
        let word = self.next_word()?;
        let (padding, last) = word.split_at(WORD_LEN - 1);
        if padding.iter().any(|b| *b != 0) || last[0] > 1 {
            return Err(AbiError::InvalidBool { field });
        }
        Ok(last[0] == 1)
    }

    pub fn address(&mut self) -> Result<Address, AbiError> {
        let field = self.field;
        let word = self.next_word()?;
        let (padding, body) = word.split_at(WORD_LEN - 20);
        if padding.iter().any(|b| *b != 0) {
            return Err(AbiError::InvalidAddressWord { field });
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(body);
        Ok(Address::new(bytes))
    }
}
