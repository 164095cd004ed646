use katagami_der::Tag;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the decode and encode engines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("input truncated")]
    Truncated,
    #[error("length is not representable")]
    LengthOverflow,
    #[error("{item}: unexpected tag {found}")]
    UnexpectedTag { item: &'static str, found: Tag },
    #[error("{item}: unexpected encoding form (constructed: {constructed})")]
    UnexpectedForm { item: &'static str, constructed: bool },
    #[error("{field}: no type registered for selector {selector}")]
    UnknownSelector { field: &'static str, selector: String },
    #[error("{item}: required field {field} is missing")]
    MissingRequiredField { item: &'static str, field: &'static str },
    #[error("{0} octets of trailing data")]
    TrailingData(usize),
    #[error("cannot allocate {0} octets")]
    AllocationFailure(usize),
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("{0}: content length does not match its header")]
    LengthMismatch(&'static str),
    #[error("malformed header: {0}")]
    Malformed(#[source] katagami_der::Error),
    #[error("{item}: invalid content: {source}")]
    Content {
        item: &'static str,
        #[source]
        source: katagami_asn1::Error,
    },
    #[error("invalid descriptor {0}")]
    InvalidDescriptor(&'static str),
    #[error("{0}: value does not match its descriptor")]
    ShapeMismatch(&'static str),
}

impl From<katagami_der::Error> for Error {
    fn from(e: katagami_der::Error) -> Self {
        match e {
            katagami_der::Error::Truncated => Error::Truncated,
            katagami_der::Error::LengthOverflow => Error::LengthOverflow,
            katagami_der::Error::NestingTooDeep(depth) => Error::NestingTooDeep(depth),
            e => Error::Malformed(e),
        }
    }
}
