//! # katagami
//!
//! Conversion traits shared by the katagami crates.
//!
//! katagami marshals tag-length-value data by walking static type
//! descriptors instead of hand-written per-type code. The leaf conversions
//! along the way (raw octets to a header, primitive content octets to a
//! typed value, and back) all go through the two trait pairs defined here:
//!
//! ```text
//! &[u8] → Header            (katagami-der)
//! Content → Primitive       (katagami-asn1)
//! Primitive → Vec<u8>       (katagami-asn1)
//! Header → Vec<u8>          (katagami-der)
//! ```
//!
//! The marker traits (`DecodableFrom`, `EncodableTo`) restrict each
//! conversion to the pairs a crate explicitly opts into.
//!
//! ```ignore
//! use katagami::decoder::Decoder;
//! use katagami_der::Header;
//!
//! let bytes: &[u8] = &[0x30, 0x03, 0x02, 0x01, 0x05];
//! let header: Header = bytes.decode().unwrap();
//! assert!(header.constructed);
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
