use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Template(#[from] katagami_template::Error),
    #[error("{0}: field missing or not shaped as described")]
    Field(&'static str),
    #[error("tbsCertificate carries no received encoding")]
    NoTbsEncoding,
    #[error("attribute {oid}: {source}")]
    Attribute {
        oid: String,
        #[source]
        source: katagami_asn1::Error,
    },
}
