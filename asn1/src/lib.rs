use std::fmt::Display;

use chrono::{DateTime, NaiveDateTime, Utc};
use katagami::decoder::{DecodableFrom, Decoder};
use katagami::encoder::{EncodableTo, Encoder};
use katagami_der::Tag;

pub mod bit_string;
pub mod error;
pub mod integer;
pub mod octet_string;
pub mod oid;
pub mod string;
pub mod string_table;
pub mod time;
pub mod utf8;

pub use bit_string::BitString;
pub use error::{Error, Result};
pub use integer::Integer;
pub use octet_string::OctetString;
pub use oid::ObjectIdentifier;
pub use string::{Asn1String, StringMask};

/// The universal types the primitive codec knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    Enumerated,
    Utf8String,
    NumericString,
    PrintableString,
    T61String,
    Ia5String,
    UtcTime,
    GeneralizedTime,
    VisibleString,
    UniversalString,
    BmpString,
    /// Whatever element appears; its own tag is kept with the value.
    Any,
}

impl Type {
    /// Universal tag of the type. `Any` has none.
    pub const fn tag(self) -> Option<Tag> {
        let number = match self {
            Type::Boolean => 1,
            Type::Integer => 2,
            Type::BitString => 3,
            Type::OctetString => 4,
            Type::Null => 5,
            Type::ObjectIdentifier => 6,
            Type::Enumerated => 10,
            Type::Utf8String => 12,
            Type::NumericString => 18,
            Type::PrintableString => 19,
            Type::T61String => 20,
            Type::Ia5String => 22,
            Type::UtcTime => 23,
            Type::GeneralizedTime => 24,
            Type::VisibleString => 26,
            Type::UniversalString => 28,
            Type::BmpString => 30,
            Type::Any => return None,
        };
        Some(Tag::universal(number))
    }

    pub fn from_tag(tag: Tag) -> Option<Type> {
        ALL_TYPES.iter().copied().find(|ty| ty.tag() == Some(tag))
    }

    pub fn is_string(self) -> bool {
        StringMask::of(self).is_some()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Type::Boolean => "BOOLEAN",
            Type::Integer => "INTEGER",
            Type::BitString => "BIT STRING",
            Type::OctetString => "OCTET STRING",
            Type::Null => "NULL",
            Type::ObjectIdentifier => "OBJECT IDENTIFIER",
            Type::Enumerated => "ENUMERATED",
            Type::Utf8String => "UTF8String",
            Type::NumericString => "NumericString",
            Type::PrintableString => "PrintableString",
            Type::T61String => "T61String",
            Type::Ia5String => "IA5String",
            Type::UtcTime => "UTCTime",
            Type::GeneralizedTime => "GeneralizedTime",
            Type::VisibleString => "VisibleString",
            Type::UniversalString => "UniversalString",
            Type::BmpString => "BMPString",
            Type::Any => "ANY",
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

const ALL_TYPES: [Type; 17] = [
    Type::Boolean,
    Type::Integer,
    Type::BitString,
    Type::OctetString,
    Type::Null,
    Type::ObjectIdentifier,
    Type::Enumerated,
    Type::Utf8String,
    Type::NumericString,
    Type::PrintableString,
    Type::T61String,
    Type::Ia5String,
    Type::UtcTime,
    Type::GeneralizedTime,
    Type::VisibleString,
    Type::UniversalString,
    Type::BmpString,
];

/// An element of any type, kept as its tag and content octets.
///
/// For an indefinite-length element `contents` holds everything between the
/// header and the closing end-of-contents marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Any {
    pub tag: Tag,
    pub constructed: bool,
    pub contents: Vec<u8>,
}

/// A decoded primitive value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    Boolean(bool),
    Integer(Integer),
    Enumerated(Integer),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    BitString(BitString),
    OctetString(OctetString),
    String(Asn1String),
    UtcTime(NaiveDateTime),
    GeneralizedTime(NaiveDateTime),
    Any(Any),
}

impl Primitive {
    pub fn ty(&self) -> Type {
        match self {
            Primitive::Boolean(_) => Type::Boolean,
            Primitive::Integer(_) => Type::Integer,
            Primitive::Enumerated(_) => Type::Enumerated,
            Primitive::Null => Type::Null,
            Primitive::ObjectIdentifier(_) => Type::ObjectIdentifier,
            Primitive::BitString(_) => Type::BitString,
            Primitive::OctetString(_) => Type::OctetString,
            Primitive::String(s) => s.ty(),
            Primitive::UtcTime(_) => Type::UtcTime,
            Primitive::GeneralizedTime(_) => Type::GeneralizedTime,
            Primitive::Any(_) => Type::Any,
        }
    }

    /// The zero value of `ty`: false, 0, empty strings, an undefined object
    /// identifier, the epoch, or an empty NULL-tagged `Any`.
    pub fn empty(ty: Type) -> Primitive {
        let epoch = DateTime::<Utc>::UNIX_EPOCH.naive_utc();
        match ty {
            Type::Boolean => Primitive::Boolean(false),
            Type::Integer => Primitive::Integer(Integer::default()),
            Type::Enumerated => Primitive::Enumerated(Integer::default()),
            Type::Null => Primitive::Null,
            Type::ObjectIdentifier => Primitive::ObjectIdentifier(ObjectIdentifier::default()),
            Type::BitString => Primitive::BitString(BitString::default()),
            Type::OctetString => Primitive::OctetString(OctetString::default()),
            Type::UtcTime => Primitive::UtcTime(epoch),
            Type::GeneralizedTime => Primitive::GeneralizedTime(epoch),
            Type::Any => Primitive::Any(Any {
                tag: Tag::universal(5),
                constructed: false,
                contents: Vec::new(),
            }),
            string => Primitive::String(Asn1String::empty(string)),
        }
    }

    /// Decodes content octets of `ty`.
    pub fn from_content(ty: Type, bytes: &[u8]) -> Result<Primitive> {
        Content { ty, bytes }.decode()
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Primitive::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Primitive::Integer(i) | Primitive::Enumerated(i) => write!(f, "{}", i),
            Primitive::Null => write!(f, "NULL"),
            Primitive::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Primitive::BitString(bs) => write!(f, "{}", bs),
            Primitive::OctetString(os) => write!(f, "{}", os),
            Primitive::String(s) => write!(f, "{}", s),
            Primitive::UtcTime(t) | Primitive::GeneralizedTime(t) => write!(f, "{}", t),
            Primitive::Any(any) => write!(f, "{} ({} octets)", any.tag, any.contents.len()),
        }
    }
}

/// Content octets of a primitive element, tagged with the type they hold.
#[derive(Debug, Clone, Copy)]
pub struct Content<'a> {
    pub ty: Type,
    pub bytes: &'a [u8],
}

impl<'a> DecodableFrom<Content<'a>> for Primitive {}

impl<'a> Decoder<Content<'a>, Primitive> for Content<'a> {
    type Error = Error;

    fn decode(&self) -> Result<Primitive> {
        let data = self.bytes;
        match self.ty {
            Type::Boolean => match data {
                [0x00] => Ok(Primitive::Boolean(false)),
                [0xff] => Ok(Primitive::Boolean(true)),
                _ => Err(Error::InvalidBoolean),
            },
            Type::Integer => Integer::from_content(data).map(Primitive::Integer),
            Type::Enumerated => Integer::from_content(data).map(Primitive::Enumerated),
            Type::Null if data.is_empty() => Ok(Primitive::Null),
            Type::Null => Err(Error::NullNotEmpty),
            Type::ObjectIdentifier => {
                ObjectIdentifier::from_content(data).map(Primitive::ObjectIdentifier)
            }
            Type::BitString => BitString::from_content(data).map(Primitive::BitString),
            Type::OctetString => Ok(Primitive::OctetString(OctetString::from(data))),
            Type::UtcTime => time::parse_utc_time(data).map(Primitive::UtcTime),
            Type::GeneralizedTime => {
                time::parse_generalized_time(data).map(Primitive::GeneralizedTime)
            }
            Type::Any => Err(Error::AnyWithoutHeader),
            string => Asn1String::from_content(string, data).map(Primitive::String),
        }
    }
}

impl EncodableTo<Primitive> for Vec<u8> {}

impl Encoder<Primitive, Vec<u8>> for Primitive {
    type Error = Error;

    /// Produces the content octets; the header is up to the caller.
    fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Primitive::Boolean(b) => Ok(vec![if *b { 0xff } else { 0x00 }]),
            Primitive::Integer(i) | Primitive::Enumerated(i) => Ok(i.to_content()),
            Primitive::Null => Ok(Vec::new()),
            Primitive::ObjectIdentifier(oid) => oid.to_content(),
            Primitive::BitString(bs) => Ok(bs.to_content()),
            Primitive::OctetString(os) => Ok(os.as_bytes().to_vec()),
            Primitive::String(s) => Ok(s.as_bytes().to_vec()),
            Primitive::UtcTime(t) => time::format_utc_time(t),
            Primitive::GeneralizedTime(t) => time::format_generalized_time(t),
            Primitive::Any(any) => Ok(any.contents.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;
    use rstest::rstest;

    use super::*;

    #[rstest(ty, input, expected,
        case(Type::Boolean, vec![0xff], Primitive::Boolean(true)),
        case(Type::Boolean, vec![0x00], Primitive::Boolean(false)),
        case(Type::Integer, vec![0x01, 0x00], Primitive::Integer(Integer::from(256))),
        case(Type::Enumerated, vec![0x02], Primitive::Enumerated(Integer::from(2))),
        case(Type::Null, vec![], Primitive::Null),
        case(Type::ObjectIdentifier, vec![0x55, 0x04, 0x03], Primitive::ObjectIdentifier(ObjectIdentifier::from_str("2.5.4.3").unwrap())),
        case(Type::BitString, vec![0x06, 0x40], Primitive::BitString(BitString::new(6, vec![0x40]).unwrap())),
        case(Type::OctetString, vec![0x04, 0x14], Primitive::OctetString(OctetString::from(vec![0x04, 0x14]))),
        case(Type::PrintableString, b"JP".to_vec(), Primitive::String(Asn1String::from_str(Type::PrintableString, "JP").unwrap())),
        case(Type::UtcTime, b"191215190210Z".to_vec(), Primitive::UtcTime(NaiveDate::from_ymd_opt(2019, 12, 15).unwrap().and_hms_opt(19, 2, 10).unwrap())),
    )]
    fn test_primitive_content(ty: Type, input: Vec<u8>, expected: Primitive) {
        let actual: Primitive = Content { ty, bytes: &input }.decode().unwrap();
        assert_eq!(expected, actual);
        assert_eq!(ty, actual.ty());
        assert_eq!(input, actual.encode().unwrap());
    }

    #[rstest(ty, input, expected,
        case(Type::Boolean, vec![0x01], Error::InvalidBoolean),
        case(Type::Boolean, vec![], Error::InvalidBoolean),
        case(Type::Boolean, vec![0xff, 0x00], Error::InvalidBoolean),
        case(Type::Null, vec![0x00], Error::NullNotEmpty),
        case(Type::Integer, vec![0x00, 0x7f], Error::IntegerNotMinimal),
        case(Type::Any, vec![0x00], Error::AnyWithoutHeader),
    )]
    fn test_primitive_content_error(ty: Type, input: Vec<u8>, expected: Error) {
        assert_eq!(expected, Primitive::from_content(ty, &input).unwrap_err());
    }

    #[rstest(tag, expected,
        case(Tag::universal(1), Some(Type::Boolean)),
        case(Tag::universal(12), Some(Type::Utf8String)),
        case(Tag::universal(30), Some(Type::BmpString)),
        case(Tag::universal(16), None),
        case(Tag::context(1), None),
    )]
    fn test_type_from_tag(tag: Tag, expected: Option<Type>) {
        assert_eq!(expected, Type::from_tag(tag));
    }

    #[test]
    fn test_empty_values() {
        assert_eq!(Primitive::Boolean(false), Primitive::empty(Type::Boolean));
        assert_eq!(Type::Ia5String, Primitive::empty(Type::Ia5String).ty());
        // An undefined object identifier has no encoding.
        assert_eq!(
            Error::ObjectIdentifierTooFewComponents,
            Primitive::empty(Type::ObjectIdentifier).encode().unwrap_err()
        );
        assert_eq!(
            b"700101000000Z".to_vec(),
            Primitive::empty(Type::UtcTime).encode().unwrap()
        );
    }
}
