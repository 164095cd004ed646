//! Error types for primitive content decoding and encoding.

use std::num::ParseIntError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the primitive codec and its helper services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // Boolean errors
    #[error("BOOLEAN: content must be a single 0x00 or 0xff octet")]
    InvalidBoolean,

    // Null errors
    #[error("NULL: content must be empty")]
    NullNotEmpty,

    // Integer errors
    #[error("INTEGER: no data")]
    IntegerNoData,
    #[error("INTEGER: not minimally encoded")]
    IntegerNotMinimal,

    // ObjectIdentifier errors
    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: sub-identifier not minimally encoded")]
    ObjectIdentifierNotMinimal,
    #[error("OBJECT IDENTIFIER: sub-identifier overflows 64 bits")]
    ObjectIdentifierOverflow,
    #[error("OBJECT IDENTIFIER: too few components (need at least 2)")]
    ObjectIdentifierTooFewComponents,
    #[error("OBJECT IDENTIFIER: invalid leading arcs {0}.{1}")]
    ObjectIdentifierInvalidRoot(u64, u64),
    #[error("OBJECT IDENTIFIER: invalid component: {0}")]
    ObjectIdentifierInvalidComponent(ParseIntError),

    // BitString errors
    #[error("BIT STRING: no data")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range (must be 0-7)")]
    BitStringUnusedBitsOutOfRange(u8),
    #[error("BIT STRING: padding bits must be zero")]
    BitStringNonZeroPadding,

    // String type errors
    #[error("{0}: invalid character encoding")]
    InvalidString(&'static str),
    #[error("{0}: length {1} is not a multiple of the code unit size")]
    StringLength(&'static str, usize),
    #[error("string type {0} is not permitted here")]
    StringTypeNotPermitted(&'static str),
    #[error("string of {len} characters is outside the permitted range {min}..={max}")]
    StringLengthOutOfRange { len: usize, min: usize, max: usize },

    // UTF-8 codepoint errors
    #[error("UTF-8: truncated sequence")]
    Utf8Truncated,
    #[error("UTF-8: invalid sequence")]
    Utf8Invalid,
    #[error("code point U+{0:04X} cannot be encoded")]
    CodepointOutOfRange(u32),

    // Time errors
    #[error("UTCTime: invalid format")]
    UtcTimeInvalidFormat,
    #[error("GeneralizedTime: invalid format")]
    GeneralizedTimeInvalidFormat,
    #[error("time is outside the years {0}..={1}")]
    TimeOutOfRange(i32, i32),

    // Any errors
    #[error("ANY: content cannot be decoded without its header")]
    AnyWithoutHeader,
}
