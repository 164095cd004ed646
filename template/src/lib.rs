//! # katagami-template
//!
//! A tag-length-value engine driven by static type descriptors.
//!
//! Instead of hand-writing a parser and a serializer per type, each type is
//! described once as an [`Item`](item::Item) and the engine walks that
//! description in step with the input or output:
//!
//! ```
//! use katagami_asn1::{Integer, Primitive};
//! use katagami_template::item::{Item, Template};
//! use katagami_template::universal::{BOOLEAN, INTEGER};
//!
//! static POINT_FIELDS: [Template; 2] = [
//!     Template::new("x", &INTEGER),
//!     Template::new("visible", &BOOLEAN).optional(),
//! ];
//! static POINT: Item = Item::sequence("Point", &POINT_FIELDS);
//!
//! let input = [0x30, 0x03, 0x02, 0x01, 0x07];
//! let point = katagami_template::decode(&POINT, &input).unwrap();
//! assert_eq!(
//!     Some(&Primitive::Integer(Integer::from(7))),
//!     point.fields()[0].value().and_then(|v| v.as_primitive())
//! );
//! assert!(point.fields()[1].is_absent());
//!
//! // The original bytes are kept and replayed on the way back out.
//! assert_eq!(input.to_vec(), katagami_template::encode(&point, &POINT).unwrap());
//! ```
//!
//! [`Codec`] carries the settings ([`DecodeConfig`]) and the table of
//! interned object identifiers a call uses. The free functions at the crate
//! root use the defaults and the builtin table.

#![forbid(unsafe_code)]

use katagami_der::Tag;

pub mod adb;
pub mod cache;
pub mod config;
mod decode;
mod encode;
pub mod error;
pub mod item;
pub mod lifecycle;
pub mod objects;
pub mod reflect;
pub mod refcount;
pub mod universal;
pub mod value;

pub use config::DecodeConfig;
pub use error::{Error, Result};
pub use item::{Item, Template};
pub use lifecycle::{allocate, clear, free};
pub use objects::ObjectTable;
pub use refcount::Shared;
pub use value::{Node, Slot, Value};

/// Settings plus the object table, passed explicitly to every call.
#[derive(Debug, Clone, Copy)]
pub struct Codec<'t> {
    config: DecodeConfig,
    objects: &'t ObjectTable,
}

impl Default for Codec<'static> {
    fn default() -> Self {
        Codec::new(DecodeConfig::default(), objects::builtin())
    }
}

impl<'t> Codec<'t> {
    pub fn new(config: DecodeConfig, objects: &'t ObjectTable) -> Self {
        Codec { config, objects }
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    pub fn objects(&self) -> &'t ObjectTable {
        self.objects
    }

    /// A zero-initialised tree for `item`, bounded by the configured depth.
    pub fn allocate(&self, item: &'static Item) -> Result<Value<'static>> {
        lifecycle::allocate_limited(item, self.config.max_depth)
    }

    pub fn free(&self, value: Value<'_>, item: &Item) {
        lifecycle::free(value, item);
    }

    pub fn clear(&self, value: &mut Value<'_>, item: &Item) {
        lifecycle::clear(value, item);
    }
}

impl Codec<'static> {
    /// The builtin object table with the given settings.
    pub fn with_config(config: DecodeConfig) -> Self {
        Codec::new(config, objects::builtin())
    }
}

/// Decodes `input` as exactly one `item` with the default settings.
pub fn decode<'a>(item: &Item, input: &'a [u8]) -> Result<Value<'a>> {
    Codec::default().decode(item, input)
}

/// Decodes one `item` from the front of `input` and reports how many octets
/// it used.
pub fn decode_prefix<'a>(item: &Item, input: &'a [u8], tag: Option<Tag>) -> Result<(Value<'a>, usize)> {
    Codec::default().decode_prefix(item, input, tag)
}

pub fn encode(value: &Value<'_>, item: &Item) -> Result<Vec<u8>> {
    Codec::default().encode(value, item, None)
}

pub fn encode_into(value: &Value<'_>, item: &Item, out: &mut Vec<u8>) -> Result<usize> {
    Codec::default().encode_into(value, item, None, out)
}

pub fn encoded_len(value: &Value<'_>, item: &Item) -> Result<usize> {
    Codec::default().encoded_len(value, item, None)
}
