//! Descriptors for the universal types, ready to be referenced from
//! templates.

use katagami_asn1::{StringMask, Type};

use crate::item::Item;

pub static BOOLEAN: Item = Item::primitive("BOOLEAN", Type::Boolean);
pub static INTEGER: Item = Item::primitive("INTEGER", Type::Integer);
pub static ENUMERATED: Item = Item::primitive("ENUMERATED", Type::Enumerated);
pub static BIT_STRING: Item = Item::primitive("BIT STRING", Type::BitString);
pub static OCTET_STRING: Item = Item::primitive("OCTET STRING", Type::OctetString);
pub static NULL: Item = Item::primitive("NULL", Type::Null);
pub static OBJECT: Item = Item::primitive("OBJECT IDENTIFIER", Type::ObjectIdentifier);
pub static UTF8_STRING: Item = Item::primitive("UTF8String", Type::Utf8String);
pub static NUMERIC_STRING: Item = Item::primitive("NumericString", Type::NumericString);
pub static PRINTABLE_STRING: Item = Item::primitive("PrintableString", Type::PrintableString);
pub static T61_STRING: Item = Item::primitive("T61String", Type::T61String);
pub static IA5_STRING: Item = Item::primitive("IA5String", Type::Ia5String);
pub static VISIBLE_STRING: Item = Item::primitive("VisibleString", Type::VisibleString);
pub static UNIVERSAL_STRING: Item = Item::primitive("UniversalString", Type::UniversalString);
pub static BMP_STRING: Item = Item::primitive("BMPString", Type::BmpString);
pub static UTC_TIME: Item = Item::primitive("UTCTime", Type::UtcTime);
pub static GENERALIZED_TIME: Item = Item::primitive("GeneralizedTime", Type::GeneralizedTime);
pub static ANY: Item = Item::primitive("ANY", Type::Any);

pub static DIRECTORY_STRING: Item = Item::mstring("DirectoryString", StringMask::DIRECTORY_STRING);
pub static DISPLAY_TEXT: Item = Item::mstring(
    "DisplayText",
    StringMask::IA5
        .union(StringMask::VISIBLE)
        .union(StringMask::BMP)
        .union(StringMask::UTF8),
);
