use std::str::FromStr;

use katagami_asn1::{Integer, ObjectIdentifier, Primitive};
use katagami_pkix::extension::BASIC_CONSTRAINTS;
use katagami_pkix::general_name::GENERAL_NAMES;
use katagami_pkix::{CATALOG, CERTIFICATE, Error, TBS_CERTIFICATE, extension, extension_value, tbs_bytes};
use katagami_template::reflect::get_choice_selector;
use katagami_template::{Codec, DecodeConfig, Slot, Value, allocate, clear, decode, encode, free};
use rstest::rstest;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

const ECDSA_WITH_SHA256: [u8; 8] = [0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x02];
const EC_PUBLIC_KEY: [u8; 7] = [0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01];
const PRIME256V1: [u8; 8] = [0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07];

fn tlv(tag: u8, parts: &[&[u8]]) -> Vec<u8> {
    let content = parts.concat();
    let mut out = vec![tag];
    match content.len() {
        len @ 0..=0x7f => out.push(len as u8),
        len @ 0x80..=0xff => out.extend_from_slice(&[0x81, len as u8]),
        len => out.extend_from_slice(&[0x82, (len >> 8) as u8, len as u8]),
    }
    out.extend_from_slice(&content);
    out
}

fn algorithm() -> Vec<u8> {
    tlv(0x30, &[&tlv(0x06, &[&ECDSA_WITH_SHA256])])
}

fn name(cn: &str) -> Vec<u8> {
    let atav = tlv(0x30, &[&tlv(0x06, &[&[0x55, 0x04, 0x03]]), &tlv(0x0c, &[cn.as_bytes()])]);
    tlv(0x30, &[&tlv(0x31, &[&atav])])
}

fn validity() -> Vec<u8> {
    tlv(0x30, &[&tlv(0x17, &[b"250101000000Z"]), &tlv(0x18, &[b"20500101000000Z"])])
}

fn public_key() -> Vec<u8> {
    let algorithm = tlv(0x30, &[&tlv(0x06, &[&EC_PUBLIC_KEY]), &tlv(0x06, &[&PRIME256V1])]);
    tlv(0x30, &[&algorithm, &tlv(0x03, &[&[0x00, 0x04, 0x01, 0x02]])])
}

fn extensions() -> Vec<u8> {
    let basic_constraints = tlv(0x30, &[
        &tlv(0x06, &[&[0x55, 0x1d, 0x13]]),
        &tlv(0x01, &[&[0xff]]),
        &tlv(0x04, &[&tlv(0x30, &[&tlv(0x01, &[&[0xff]])])]),
    ]);
    let subject_alt_name = tlv(0x30, &[
        &tlv(0x06, &[&[0x55, 0x1d, 0x11]]),
        &tlv(0x04, &[&tlv(0x30, &[&tlv(0x82, &[b"a.example"])])]),
    ]);
    tlv(0xa3, &[&tlv(0x30, &[&basic_constraints, &subject_alt_name])])
}

fn tbs(version: Option<u8>, serial: u8, with_extensions: bool) -> Vec<u8> {
    let mut parts = Vec::new();
    if let Some(version) = version {
        parts.push(tlv(0xa0, &[&tlv(0x02, &[&[version]])]));
    }
    parts.push(tlv(0x02, &[&[serial]]));
    parts.push(algorithm());
    parts.push(name("issuer"));
    parts.push(validity());
    parts.push(name("subject"));
    parts.push(public_key());
    if with_extensions {
        parts.push(extensions());
    }
    let parts: Vec<&[u8]> = parts.iter().map(Vec::as_slice).collect();
    tlv(0x30, &parts)
}

fn certificate(tbs: &[u8]) -> Vec<u8> {
    tlv(0x30, &[tbs, &algorithm(), &tlv(0x03, &[&[0x00, 0xde, 0xad, 0xbe, 0xef]])])
}

fn v3() -> Vec<u8> {
    certificate(&tbs(Some(2), 1, true))
}

#[test]
fn test_certificate_round_trip() {
    init_tracing();
    let input = v3();
    let mut cert = decode(&CERTIFICATE, &input).unwrap();
    assert_eq!(&tbs(Some(2), 1, true)[..], tbs_bytes(&cert).unwrap());
    assert_eq!(input, encode(&cert, &CERTIFICATE).unwrap());

    cert.invalidate();
    assert_eq!(input, encode(&cert, &CERTIFICATE).unwrap());
}

#[test]
fn test_modified_tbs_is_rederived() {
    init_tracing();
    let input = v3();
    let mut cert = decode(&CERTIFICATE, &input).unwrap();
    let serial = cert
        .field_mut(0)
        .and_then(Slot::value_mut)
        .and_then(|tbs| tbs.field_mut(1))
        .and_then(Slot::value_mut)
        .and_then(Value::primitive_mut)
        .unwrap();
    *serial = Primitive::Integer(Integer::from(7));

    assert_eq!(Error::NoTbsEncoding, tbs_bytes(&cert).unwrap_err());
    assert_eq!(certificate(&tbs(Some(2), 7, true)), encode(&cert, &CERTIFICATE).unwrap());

    let tbs_value = cert.fields()[0].value().unwrap();
    assert_eq!(tbs(Some(2), 7, true), encode(tbs_value, &TBS_CERTIFICATE).unwrap());
}

#[test]
fn test_v1_certificate() {
    init_tracing();
    let input = certificate(&tbs(None, 1, false));
    let mut cert = decode(&CERTIFICATE, &input).unwrap();
    let tbs_value = cert.fields()[0].value().unwrap();
    assert_eq!(
        Some(&Primitive::Integer(Integer::from(0))),
        tbs_value.fields()[0].value().and_then(Value::as_primitive)
    );
    assert!(tbs_value.fields()[9].is_absent());

    let basic_constraints = ObjectIdentifier::from_str("2.5.29.19").unwrap();
    assert_eq!(None, extension(&cert, &basic_constraints).unwrap());

    // The version equals its DEFAULT and stays out when the TBS is rebuilt.
    if let Some(tbs) = cert.field_mut(0).and_then(Slot::value_mut) {
        tbs.invalidate();
    }
    assert_eq!(input, encode(&cert, &CERTIFICATE).unwrap());
}

#[test]
fn test_extensions() {
    init_tracing();
    let input = v3();
    let cert = decode(&CERTIFICATE, &input).unwrap();

    let oid = ObjectIdentifier::from_str("2.5.29.19").unwrap();
    let ext = extension(&cert, &oid).unwrap().unwrap();
    assert_eq!(
        Some(&Primitive::Boolean(true)),
        ext.fields()[1].value().and_then(Value::as_primitive)
    );
    let basic_constraints = extension_value(ext, &BASIC_CONSTRAINTS).unwrap();
    assert_eq!(
        Some(&Primitive::Boolean(true)),
        basic_constraints.fields()[0].value().and_then(Value::as_primitive)
    );

    let oid = ObjectIdentifier::from_str("2.5.29.17").unwrap();
    let ext = extension(&cert, &oid).unwrap().unwrap();
    // critical is absent and takes its DEFAULT.
    assert_eq!(
        Some(&Primitive::Boolean(false)),
        ext.fields()[1].value().and_then(Value::as_primitive)
    );
    let names = extension_value(ext, &GENERAL_NAMES).unwrap();
    let names = names.fields()[0].values();
    assert_eq!(1, names.len());
    assert_eq!(Some(2), get_choice_selector(&names[0]));

    let key_usage = ObjectIdentifier::from_str("2.5.29.15").unwrap();
    assert_eq!(None, extension(&cert, &key_usage).unwrap());
}

#[test]
fn test_interned_identifiers() {
    init_tracing();
    let input = v3();
    let first = decode(&CERTIFICATE, &input).unwrap();
    let second = decode(&CERTIFICATE, &input).unwrap();

    let oid = ObjectIdentifier::from_str("2.5.29.19").unwrap();
    let a = extension(&first, &oid).unwrap().unwrap();
    let b = extension(&second, &oid).unwrap().unwrap();
    let a = a.fields()[0].value().and_then(Value::as_object).unwrap();
    let b = b.fields()[0].value().and_then(Value::as_object).unwrap();
    assert!(a.ptr_eq(b));
}

#[test]
fn test_truncated_certificate() {
    init_tracing();
    let input = v3();
    for n in 0..input.len() {
        assert_eq!(
            katagami_template::Error::Truncated,
            decode(&CERTIFICATE, &input[..n]).unwrap_err(),
            "cut at {n}"
        );
    }
}

#[test]
fn test_tampered_length() {
    init_tracing();
    // validity claims one octet more than it holds; the TBS ends first.
    let mut tampered = tbs(Some(2), 1, false);
    let offset = tampered
        .windows(2)
        .position(|w| w == [0x30, 0x20])
        .unwrap();
    tampered[offset + 1] = 0x21;
    let input = certificate(&tampered);
    assert!(decode(&CERTIFICATE, &input).is_err());
}

#[test]
fn test_local_tree_has_no_tbs_bytes() {
    init_tracing();
    let cert = allocate(&CERTIFICATE).unwrap();
    assert_eq!(Error::NoTbsEncoding, tbs_bytes(&cert).unwrap_err());
    free(cert, &CERTIFICATE);
}

#[rstest]
#[case(DecodeConfig::default())]
#[case(DecodeConfig::default().max_depth(12))]
fn test_catalog_lifecycle(#[case] config: DecodeConfig) {
    init_tracing();
    let codec = Codec::with_config(config);
    for item in CATALOG {
        let value = codec.allocate(item).unwrap();
        free(value, item);

        let mut value = allocate(item).unwrap();
        clear(&mut value, item);
        clear(&mut value, item);
        free(value, item);
    }
}
