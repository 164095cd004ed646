use katagami_template::item::{Item, Template};
use katagami_template::universal::{GENERALIZED_TIME, UTC_TIME};

/*
RFC 5280 Section 4.1.2.5
Validity ::= SEQUENCE {
    notBefore      Time,
    notAfter       Time }

Time ::= CHOICE {
    utcTime        UTCTime,
    generalTime    GeneralizedTime }
*/

static TIME_ALTERNATIVES: [Template; 2] = [
    Template::new("utcTime", &UTC_TIME),
    Template::new("generalTime", &GENERALIZED_TIME),
];

pub static TIME: Item = Item::choice("Time", &TIME_ALTERNATIVES);

static VALIDITY_FIELDS: [Template; 2] = [
    Template::new("notBefore", &TIME),
    Template::new("notAfter", &TIME),
];

pub static VALIDITY: Item = Item::sequence("Validity", &VALIDITY_FIELDS);
