//! Distinguished names.

use katagami_asn1::{Primitive, string_table};
use katagami_template::Value;
use katagami_template::item::{Adb, AdbEntry, AdbKey, Item, Template};
use katagami_template::universal::{ANY, DIRECTORY_STRING, IA5_STRING, OBJECT, PRINTABLE_STRING};

use crate::error::{Error, Result};

/*
RFC 5280 Section 4.1.2.4
Name ::= CHOICE { -- only one possibility for now --
    rdnSequence  RDNSequence }

RDNSequence ::= SEQUENCE OF RelativeDistinguishedName

RelativeDistinguishedName ::=
    SET SIZE (1..MAX) OF AttributeTypeAndValue

AttributeTypeAndValue ::= SEQUENCE {
    type     AttributeType,
    value    AttributeValue }
*/

const fn entry(arcs: &'static [u64], item: &'static Item) -> AdbEntry {
    AdbEntry {
        key: AdbKey::Oid(arcs),
        template: Template::new("value", item),
    }
}

static ATTRIBUTE_VALUES: [AdbEntry; 11] = [
    entry(&[2, 5, 4, 3], &DIRECTORY_STRING),
    entry(&[2, 5, 4, 4], &DIRECTORY_STRING),
    entry(&[2, 5, 4, 5], &PRINTABLE_STRING),
    entry(&[2, 5, 4, 6], &PRINTABLE_STRING),
    entry(&[2, 5, 4, 7], &DIRECTORY_STRING),
    entry(&[2, 5, 4, 8], &DIRECTORY_STRING),
    entry(&[2, 5, 4, 10], &DIRECTORY_STRING),
    entry(&[2, 5, 4, 11], &DIRECTORY_STRING),
    entry(&[2, 5, 4, 42], &DIRECTORY_STRING),
    entry(&[1, 2, 840, 113549, 1, 9, 1], &IA5_STRING),
    entry(&[0, 9, 2342, 19200300, 100, 1, 25], &IA5_STRING),
];

static OTHER_VALUE: Template = Template::new("value", &ANY);

static ATTRIBUTE_VALUE: Adb = Adb::new(0, &ATTRIBUTE_VALUES).with_default(&OTHER_VALUE);

static ATTRIBUTE_TYPE_AND_VALUE_FIELDS: [Template; 2] = [
    Template::new("type", &OBJECT),
    Template::adb("value", &ATTRIBUTE_VALUE),
];

pub static ATTRIBUTE_TYPE_AND_VALUE: Item =
    Item::sequence("AttributeTypeAndValue", &ATTRIBUTE_TYPE_AND_VALUE_FIELDS);

static RDN_BODY: Template = Template::new("attributes", &ATTRIBUTE_TYPE_AND_VALUE).set_of();

pub static RELATIVE_DISTINGUISHED_NAME: Item = Item::wrapper("RelativeDistinguishedName", &RDN_BODY);

static NAME_BODY: Template = Template::new("rdnSequence", &RELATIVE_DISTINGUISHED_NAME).sequence_of();

/// Names are compared and hashed by their encoding, so the received octets
/// are kept.
pub static NAME: Item = Item::wrapper("Name", &NAME_BODY).cached();

/// Checks one AttributeTypeAndValue against the size and string-type limits
/// of its attribute. Attributes without limits pass.
pub fn check_attribute(atav: &Value<'_>) -> Result<()> {
    let oid = atav
        .fields()
        .first()
        .and_then(|slot| slot.value())
        .and_then(Value::oid)
        .ok_or(Error::Field("type"))?;
    let Some(constraint) = string_table::lookup(oid) else {
        return Ok(());
    };
    let value = atav.fields().get(1).and_then(|slot| slot.value());
    let Some(Primitive::String(s)) = value.and_then(Value::as_primitive) else {
        return Err(Error::Field("value"));
    };
    constraint.check(s).map_err(|source| Error::Attribute {
        oid: oid.to_string(),
        source,
    })
}

/// Runs [`check_attribute`] over every attribute of a decoded [`NAME`].
pub fn check_name(name: &Value<'_>) -> Result<()> {
    let rdns = name.fields().first().ok_or(Error::Field("rdnSequence"))?;
    for rdn in rdns.values() {
        let attributes = rdn.fields().first().ok_or(Error::Field("attributes"))?;
        for atav in attributes.values() {
            check_attribute(atav)?;
        }
    }
    Ok(())
}
