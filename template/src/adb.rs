//! ANY DEFINED BY resolution.

use katagami_asn1::Primitive;

use crate::error::{Error, Result};
use crate::item::{AdbKey, Target, Template};
use crate::value::{Slot, Value};

/// Picks the concrete template for `tt` given the already decoded `fields`
/// of its parent.
///
/// A template that is not ANY DEFINED BY comes back unchanged. `Ok(None)`
/// means the selector matched nothing; with `nullerr` set that case is an
/// [`Error::UnknownSelector`] instead.
pub fn resolve<'t>(fields: &[Slot<'_>], tt: &'t Template, nullerr: bool) -> Result<Option<&'t Template>> {
    let Target::Adb(adb) = tt.target else {
        return Ok(Some(tt));
    };

    let selector = match fields.get(adb.selector) {
        Some(Slot::One(value)) => value,
        Some(Slot::Absent) | None => {
            return match adb.null {
                Some(null) => Ok(Some(null)),
                None => no_match(tt, "<absent>".to_string(), nullerr),
            };
        }
        Some(Slot::Many(_)) => return Err(Error::InvalidDescriptor(tt.name)),
    };

    let found = adb
        .entries
        .iter()
        .find(|entry| key_matches(entry.key, selector))
        .map(|entry| &entry.template)
        .or(adb.default);

    match found {
        Some(template) => {
            tracing::debug!("{}: selector {} resolved to {}", tt.name, describe(selector), template.name);
            Ok(Some(template))
        }
        None => no_match(tt, describe(selector), nullerr),
    }
}

fn no_match<'t>(tt: &Template, selector: String, nullerr: bool) -> Result<Option<&'t Template>> {
    if nullerr {
        Err(Error::UnknownSelector {
            field: tt.name,
            selector,
        })
    } else {
        tracing::debug!("{}: no template for selector {}", tt.name, selector);
        Ok(None)
    }
}

fn key_matches(key: AdbKey, selector: &Value<'_>) -> bool {
    match key {
        AdbKey::Oid(arcs) => selector.oid().is_some_and(|oid| *oid == *arcs),
        AdbKey::Int(n) => match selector.as_primitive() {
            Some(Primitive::Integer(i)) | Some(Primitive::Enumerated(i)) => i.to_i64() == Some(n),
            _ => false,
        },
    }
}

fn describe(selector: &Value<'_>) -> String {
    match (selector.oid(), selector.as_primitive()) {
        (Some(oid), _) => oid.to_string(),
        (None, Some(value)) => value.to_string(),
        (None, None) => "<constructed>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use katagami_asn1::{Integer, ObjectIdentifier};
    use rstest::rstest;

    use super::*;
    use crate::item::{Adb, AdbEntry};
    use crate::universal::{BOOLEAN, INTEGER, NULL, OCTET_STRING};

    static BY_OID_ENTRIES: [AdbEntry; 2] = [
        AdbEntry {
            key: AdbKey::Oid(&[2, 5, 29, 19]),
            template: Template::new("flag", &BOOLEAN),
        },
        AdbEntry {
            key: AdbKey::Oid(&[1, 2, 840, 113549, 1, 1, 1]),
            template: Template::new("null", &NULL),
        },
    ];
    static BY_OID: Adb = Adb::new(0, &BY_OID_ENTRIES);
    static BY_OID_FIELD: Template = Template::adb("value", &BY_OID);

    static FALLBACK: Template = Template::new("raw", &OCTET_STRING);
    static BY_INT_ENTRIES: [AdbEntry; 1] = [AdbEntry {
        key: AdbKey::Int(3),
        template: Template::new("number", &INTEGER),
    }];
    static BY_INT: Adb = Adb::new(0, &BY_INT_ENTRIES)
        .with_default(&FALLBACK)
        .with_null(&FALLBACK);
    static BY_INT_FIELD: Template = Template::adb("value", &BY_INT);

    fn oid(s: &str) -> Slot<'static> {
        Slot::One(Value::primitive(Primitive::ObjectIdentifier(
            ObjectIdentifier::from_str(s).unwrap(),
        )))
    }

    fn int(n: i64) -> Slot<'static> {
        Slot::One(Value::primitive(Primitive::Integer(Integer::from(n))))
    }

    #[rstest(selector, expected,
        case(oid("2.5.29.19"), Some("flag")),
        case(oid("1.2.840.113549.1.1.1"), Some("null")),
        case(oid("1.2.3.4"), None),
        case(Slot::Absent, None),
    )]
    fn test_resolve_by_oid(selector: Slot<'static>, expected: Option<&str>) {
        let fields = vec![selector];
        let actual = resolve(&fields, &BY_OID_FIELD, false).unwrap();
        assert_eq!(expected, actual.map(|t| t.name));
    }

    #[test]
    fn test_resolve_strict() {
        let fields = vec![oid("1.2.3.4")];
        assert_eq!(
            Error::UnknownSelector {
                field: "value",
                selector: "1.2.3.4".to_string()
            },
            resolve(&fields, &BY_OID_FIELD, true).unwrap_err()
        );
    }

    #[rstest(selector, expected,
        case(int(3), "number"),
        case(int(4), "raw"),
        case(Slot::Absent, "raw"),
    )]
    fn test_resolve_by_int(selector: Slot<'static>, expected: &str) {
        let fields = vec![selector];
        let actual = resolve(&fields, &BY_INT_FIELD, true).unwrap().unwrap();
        assert_eq!(expected, actual.name);
    }

    #[test]
    fn test_resolve_identity() {
        let plain = Template::new("n", &INTEGER);
        let actual = resolve(&[], &plain, true).unwrap().unwrap();
        assert!(std::ptr::eq(&plain, actual));
    }
}
