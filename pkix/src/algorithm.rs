use katagami_template::item::{Adb, AdbEntry, AdbKey, Item, Template};
use katagami_template::universal::{ANY, BIT_STRING, NULL, OBJECT};

/*
RFC 5280 Section 4.1.1.2
AlgorithmIdentifier  ::=  SEQUENCE  {
    algorithm               OBJECT IDENTIFIER,
    parameters              ANY DEFINED BY algorithm OPTIONAL  }
*/

const RSA_ENCRYPTION: &[u64] = &[1, 2, 840, 113549, 1, 1, 1];
const SHA1_WITH_RSA: &[u64] = &[1, 2, 840, 113549, 1, 1, 5];
const SHA256_WITH_RSA: &[u64] = &[1, 2, 840, 113549, 1, 1, 11];
const SHA384_WITH_RSA: &[u64] = &[1, 2, 840, 113549, 1, 1, 12];
const EC_PUBLIC_KEY: &[u64] = &[1, 2, 840, 10045, 2, 1];

const NULL_PARAMETERS: Template = Template::new("parameters", &NULL).optional();

static PARAMETER_ENTRIES: [AdbEntry; 5] = [
    AdbEntry {
        key: AdbKey::Oid(RSA_ENCRYPTION),
        template: NULL_PARAMETERS,
    },
    AdbEntry {
        key: AdbKey::Oid(SHA1_WITH_RSA),
        template: NULL_PARAMETERS,
    },
    AdbEntry {
        key: AdbKey::Oid(SHA256_WITH_RSA),
        template: NULL_PARAMETERS,
    },
    AdbEntry {
        key: AdbKey::Oid(SHA384_WITH_RSA),
        template: NULL_PARAMETERS,
    },
    // ECParameters; only the namedCurve form is described.
    AdbEntry {
        key: AdbKey::Oid(EC_PUBLIC_KEY),
        template: Template::new("namedCurve", &OBJECT),
    },
];

static OTHER_PARAMETERS: Template = Template::new("parameters", &ANY).optional();

static PARAMETERS: Adb = Adb::new(0, &PARAMETER_ENTRIES).with_default(&OTHER_PARAMETERS);

static ALGORITHM_IDENTIFIER_FIELDS: [Template; 2] = [
    Template::new("algorithm", &OBJECT),
    Template::adb("parameters", &PARAMETERS).optional(),
];

pub static ALGORITHM_IDENTIFIER: Item = Item::sequence("AlgorithmIdentifier", &ALGORITHM_IDENTIFIER_FIELDS);

/*
SubjectPublicKeyInfo  ::=  SEQUENCE  {
    algorithm            AlgorithmIdentifier,
    subjectPublicKey     BIT STRING  }
*/

static SUBJECT_PUBLIC_KEY_INFO_FIELDS: [Template; 2] = [
    Template::new("algorithm", &ALGORITHM_IDENTIFIER),
    Template::new("subjectPublicKey", &BIT_STRING),
];

pub static SUBJECT_PUBLIC_KEY_INFO: Item = Item::sequence("SubjectPublicKeyInfo", &SUBJECT_PUBLIC_KEY_INFO_FIELDS);

#[cfg(test)]
mod tests {
    use katagami_asn1::{Any, Primitive};
    use katagami_der::Tag;
    use katagami_template::{Error, decode, encode};
    use rstest::rstest;

    use super::*;

    #[rstest(input, expected,
        // rsaEncryption, NULL
        case(vec![0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01, 0x05, 0x00], Some(Primitive::Null)),
        // sha256WithRSAEncryption, parameters omitted
        case(vec![0x30, 0x0b, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b], None),
        // ecdsa-with-SHA256 has no entry and falls back to ANY
        case(vec![0x30, 0x0a, 0x06, 0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x02], None),
        case(vec![0x30, 0x08, 0x06, 0x03, 0x2a, 0x03, 0x04, 0x04, 0x01, 0x00], Some(Primitive::Any(Any { tag: Tag::universal(4), constructed: false, contents: vec![0x00] }))),
    )]
    fn test_algorithm_parameters(input: Vec<u8>, expected: Option<Primitive>) {
        let mut value = decode(&ALGORITHM_IDENTIFIER, &input).unwrap();
        assert_eq!(
            expected.as_ref(),
            value.fields()[1].value().and_then(|v| v.as_primitive())
        );
        value.invalidate();
        assert_eq!(input, encode(&value, &ALGORITHM_IDENTIFIER).unwrap());
    }

    #[test]
    fn test_ec_named_curve() {
        let input = [
            0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x08, 0x2a, 0x86,
            0x48, 0xce, 0x3d, 0x03, 0x01, 0x07,
        ];
        let value = decode(&ALGORITHM_IDENTIFIER, &input).unwrap();
        let curve = value.fields()[1].value().and_then(|v| v.oid()).unwrap();
        assert_eq!(*curve, "1.2.840.10045.3.1.7");

        // Either side of the ANY DEFINED BY being OPTIONAL lets the field go.
        let input = [0x30, 0x09, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01];
        let value = decode(&ALGORITHM_IDENTIFIER, &input).unwrap();
        assert!(value.fields()[1].is_absent());

        let input = [0x30, 0x0b, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x05, 0x00];
        assert_eq!(
            Error::UnexpectedTag {
                item: "OBJECT IDENTIFIER",
                found: Tag::universal(5)
            },
            decode(&ALGORITHM_IDENTIFIER, &input).unwrap_err()
        );
    }
}
