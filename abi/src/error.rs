use thiserror::Error;

/// Errors produced while parsing addresses or encoding/decoding ABI words.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// The string is not `0x` followed by 40 hex digits.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// A hex string could not be decoded.
    #[error("invalid hex data: {0}")]
    InvalidHex(String),

    /// Return data did not contain the number of words the method declares.
    #[error("unexpected return data length: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// An unsigned integer does not fit the requested width.
    #[error("value does not fit in {bits} bits")]
    Overflow { bits: u32 },

    /// A word that should hold a `bool` holds something other than 0 or 1.
    #[error("invalid bool word at field {field}")]
    InvalidBool { field: usize },

    /// A word that should hold an address has non-zero padding.
    #[error("invalid address word at field {field}")]
    InvalidAddressWord { field: usize },
}
