use katagami_asn1::{Integer, ObjectIdentifier, Primitive};
use katagami_der::Tag;
use katagami_template::item::{Item, Template};
use katagami_template::universal::{BIT_STRING, INTEGER};
use katagami_template::{Slot, Value, reflect};

use crate::algorithm::{ALGORITHM_IDENTIFIER, SUBJECT_PUBLIC_KEY_INFO};
use crate::error::{Error, Result};
use crate::extension::EXTENSIONS;
use crate::name::NAME;
use crate::time::VALIDITY;

/*
RFC 5280 Section 4.1
Certificate  ::=  SEQUENCE  {
    tbsCertificate       TBSCertificate,
    signatureAlgorithm   AlgorithmIdentifier,
    signatureValue       BIT STRING  }

TBSCertificate  ::=  SEQUENCE  {
    version         [0]  EXPLICIT Version DEFAULT v1,
    serialNumber         CertificateSerialNumber,
    signature            AlgorithmIdentifier,
    issuer               Name,
    validity             Validity,
    subject              Name,
    subjectPublicKeyInfo SubjectPublicKeyInfo,
    issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
    subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
    extensions      [3]  EXPLICIT Extensions OPTIONAL }

Version  ::=  INTEGER  {  v1(0), v2(1), v3(2)  }
*/

fn v1() -> Primitive {
    Primitive::Integer(Integer::from(0))
}

static TBS_CERTIFICATE_FIELDS: [Template; 10] = [
    Template::new("version", &INTEGER)
        .explicit(Tag::context(0))
        .with_default(v1),
    Template::new("serialNumber", &INTEGER),
    Template::new("signature", &ALGORITHM_IDENTIFIER),
    Template::new("issuer", &NAME),
    Template::new("validity", &VALIDITY),
    Template::new("subject", &NAME),
    Template::new("subjectPublicKeyInfo", &SUBJECT_PUBLIC_KEY_INFO),
    Template::new("issuerUniqueID", &BIT_STRING)
        .implicit(Tag::context(1))
        .optional(),
    Template::new("subjectUniqueID", &BIT_STRING)
        .implicit(Tag::context(2))
        .optional(),
    Template::new("extensions", &EXTENSIONS)
        .explicit(Tag::context(3))
        .optional(),
];

/// The signed portion. Its received octets are kept so a signature can be
/// checked over exactly what the issuer signed.
pub static TBS_CERTIFICATE: Item = Item::sequence("TBSCertificate", &TBS_CERTIFICATE_FIELDS).cached();

static CERTIFICATE_FIELDS: [Template; 3] = [
    Template::new("tbsCertificate", &TBS_CERTIFICATE),
    Template::new("signatureAlgorithm", &ALGORITHM_IDENTIFIER),
    Template::new("signatureValue", &BIT_STRING),
];

pub static CERTIFICATE: Item = Item::sequence("Certificate", &CERTIFICATE_FIELDS);

fn tbs<'v, 'a>(certificate: &'v Value<'a>) -> Result<&'v Value<'a>> {
    reflect::field(certificate, &CERTIFICATE, "tbsCertificate")
        .and_then(Slot::value)
        .ok_or(Error::Field("tbsCertificate"))
}

/// The tbsCertificate octets of a decoded [`CERTIFICATE`] as they were
/// received.
///
/// A tree that was built or modified locally has no such octets; encode it
/// with [`TBS_CERTIFICATE`] instead.
pub fn tbs_bytes<'v>(certificate: &'v Value<'_>) -> Result<&'v [u8]> {
    let bytes = tbs(certificate)?
        .encoding()
        .restore()
        .ok_or(Error::NoTbsEncoding)?;
    tracing::debug!("tbsCertificate: {} received octets", bytes.len());
    Ok(bytes)
}

/// Finds the extension with `oid` in a decoded [`CERTIFICATE`].
pub fn extension<'v, 'a>(certificate: &'v Value<'a>, oid: &ObjectIdentifier) -> Result<Option<&'v Value<'a>>> {
    let extensions = match reflect::field(tbs(certificate)?, &TBS_CERTIFICATE, "extensions") {
        Some(Slot::One(extensions)) => extensions,
        Some(Slot::Absent) => return Ok(None),
        _ => return Err(Error::Field("extensions")),
    };
    let list = extensions.fields().first().ok_or(Error::Field("extensions"))?;
    Ok(list.values().iter().find(|extension| {
        extension
            .fields()
            .first()
            .and_then(Slot::value)
            .and_then(Value::oid)
            .is_some_and(|id| id == oid)
    }))
}

/// Decodes the extnValue of `extension` as `item`.
pub fn extension_value<'v>(extension: &'v Value<'_>, item: &Item) -> Result<Value<'v>> {
    let value = extension
        .fields()
        .get(2)
        .and_then(Slot::value)
        .and_then(Value::as_primitive);
    let Some(Primitive::OctetString(octets)) = value else {
        return Err(Error::Field("extnValue"));
    };
    Ok(katagami_template::decode(item, octets.as_bytes())?)
}
