//! # STCEx ABI
//!
//! Minimal Ethereum ABI support for the fixed STCEx contract surface.
//!
//! Every method the client calls takes and returns only *static* types
//! (`uint*`, `bool`, `address`), so a call is a 4-byte selector followed by
//! 32-byte words and a return value is an exact sequence of words.  This
//! crate provides:
//!
//! - [`Address`]: a 20-byte account address with EIP-55 checksum display.
//! - [`Function`]: a method signature and its keccak-256 selector.
//! - [`Token`] / [`encode_call`]: argument encoding.
//! - [`Decoder`]: a strict word decoder that asserts the exact number of
//!   return fields, so each contract read is decoded once into a typed record.
//!
//! ```rust
//! use stcex_abi::{Address, Function, Token};
//!
//! const BALANCE_OF: Function = Function::new("balanceOf(address)");
//!
//! let owner: Address = "0x55d398326f99059fF775485246999027B3197955".parse().unwrap();
//! let data = BALANCE_OF.encode(&[Token::Address(owner)]).unwrap();
//! assert_eq!(&data[..4], &[0x70, 0xa0, 0x82, 0x31]);
//! assert_eq!(data.len(), 4 + 32);
//! ```

pub mod address;
pub mod codec;
pub mod error;

pub use {
    address::Address,
    codec::{
        decode_hex, encode_call, encode_hex, encode_words, selector, Decoder, Function, Token,
        SELECTOR_LEN, WORD_LEN,
    },
    error::AbiError,
    num_bigint::BigUint,
};
