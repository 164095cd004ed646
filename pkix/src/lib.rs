//! # katagami-pkix
//!
//! X.509 certificate types ([RFC 5280](https://datatracker.ietf.org/doc/html/rfc5280))
//! described as static [`Item`]s for the katagami engine.
//!
//! ```
//! use katagami_pkix::extension::BASIC_CONSTRAINTS;
//!
//! let value = katagami_template::decode(&BASIC_CONSTRAINTS, &[0x30, 0x03, 0x01, 0x01, 0xff]).unwrap();
//! assert!(value.fields()[1].is_absent());
//! ```

#![forbid(unsafe_code)]

use katagami_template::Item;

pub mod algorithm;
pub mod certificate;
pub mod error;
pub mod extension;
pub mod general_name;
pub mod name;
pub mod time;

pub use certificate::{CERTIFICATE, TBS_CERTIFICATE, extension, extension_value, tbs_bytes};
pub use error::{Error, Result};

/// Every item this crate describes.
pub static CATALOG: [&Item; 17] = [
    &algorithm::ALGORITHM_IDENTIFIER,
    &algorithm::SUBJECT_PUBLIC_KEY_INFO,
    &name::ATTRIBUTE_TYPE_AND_VALUE,
    &name::RELATIVE_DISTINGUISHED_NAME,
    &name::NAME,
    &time::TIME,
    &time::VALIDITY,
    &extension::EXTENSION,
    &extension::EXTENSIONS,
    &extension::BASIC_CONSTRAINTS,
    &general_name::OTHER_NAME,
    &general_name::EDI_PARTY_NAME,
    &general_name::GENERAL_NAME,
    &general_name::GENERAL_NAMES,
    &certificate::TBS_CERTIFICATE,
    &certificate::CERTIFICATE,
    &katagami_template::universal::DIRECTORY_STRING,
];
