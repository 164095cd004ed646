use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or writing a tag/length header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The header is cut short, or its definite length runs past the input.
    #[error("header truncated or content shorter than its declared length")]
    Truncated,
    #[error("length is not representable")]
    LengthOverflow,
    #[error("tag number does not fit in 32 bits")]
    TagOverflow,
    #[error("tag number is not minimally encoded")]
    NonMinimalTag,
    #[error("length is not minimally encoded")]
    NonMinimalLength,
    #[error("length octet 0xff is reserved")]
    ReservedLength,
    #[error("indefinite length is not permitted under DER")]
    IndefiniteLength,
    #[error("indefinite length on a primitive encoding")]
    IndefinitePrimitive,
    #[error("universal tag {0} is not permitted under DER")]
    UniversalTag(u32),
    #[error("elements nested deeper than {0} levels")]
    NestingTooDeep(usize),
}
