use katagami_asn1::Primitive;
use katagami_template::item::{Item, Template};
use katagami_template::universal::{BOOLEAN, INTEGER, OBJECT, OCTET_STRING};

/*
RFC 5280 Section 4.1
Extensions  ::=  SEQUENCE SIZE (1..MAX) OF Extension

Extension  ::=  SEQUENCE  {
    extnID      OBJECT IDENTIFIER,
    critical    BOOLEAN DEFAULT FALSE,
    extnValue   OCTET STRING }
*/

fn not_critical() -> Primitive {
    Primitive::Boolean(false)
}

static EXTENSION_FIELDS: [Template; 3] = [
    Template::new("extnID", &OBJECT),
    Template::new("critical", &BOOLEAN).with_default(not_critical),
    Template::new("extnValue", &OCTET_STRING),
];

pub static EXTENSION: Item = Item::sequence("Extension", &EXTENSION_FIELDS);

static EXTENSIONS_BODY: Template = Template::new("extensions", &EXTENSION).sequence_of();

pub static EXTENSIONS: Item = Item::wrapper("Extensions", &EXTENSIONS_BODY);

/*
RFC 5280 Section 4.2.1.9
BasicConstraints ::= SEQUENCE {
    cA                      BOOLEAN DEFAULT FALSE,
    pathLenConstraint       INTEGER (0..MAX) OPTIONAL }
*/

static BASIC_CONSTRAINTS_FIELDS: [Template; 2] = [
    Template::new("cA", &BOOLEAN).with_default(not_critical),
    Template::new("pathLenConstraint", &INTEGER).optional(),
];

pub static BASIC_CONSTRAINTS: Item = Item::sequence("BasicConstraints", &BASIC_CONSTRAINTS_FIELDS);
