use katagami_der::Tag;
use katagami_template::item::{Item, Template};
use katagami_template::universal::{ANY, DIRECTORY_STRING, IA5_STRING, OBJECT, OCTET_STRING};

use crate::name::NAME;

/*
RFC 5280 Section 4.2.1.6
GeneralName ::= CHOICE {
    otherName                       [0]     OtherName,
    rfc822Name                      [1]     IA5String,
    dNSName                         [2]     IA5String,
    x400Address                     [3]     ORAddress,
    directoryName                   [4]     Name,
    ediPartyName                    [5]     EDIPartyName,
    uniformResourceIdentifier       [6]     IA5String,
    iPAddress                       [7]     OCTET STRING,
    registeredID                    [8]     OBJECT IDENTIFIER }

OtherName ::= SEQUENCE {
    type-id    OBJECT IDENTIFIER,
    value      [0] EXPLICIT ANY DEFINED BY type-id }

EDIPartyName ::= SEQUENCE {
    nameAssigner            [0]     DirectoryString OPTIONAL,
    partyName               [1]     DirectoryString }

The module is IMPLICIT TAGS, but a tag on a CHOICE (Name, DirectoryString)
is always explicit. x400Address is not described.
*/

static OTHER_NAME_FIELDS: [Template; 2] = [
    Template::new("type-id", &OBJECT),
    Template::new("value", &ANY).explicit(Tag::context(0)),
];

pub static OTHER_NAME: Item = Item::sequence("OtherName", &OTHER_NAME_FIELDS);

static EDI_PARTY_NAME_FIELDS: [Template; 2] = [
    Template::new("nameAssigner", &DIRECTORY_STRING)
        .explicit(Tag::context(0))
        .optional(),
    Template::new("partyName", &DIRECTORY_STRING).explicit(Tag::context(1)),
];

pub static EDI_PARTY_NAME: Item = Item::sequence("EDIPartyName", &EDI_PARTY_NAME_FIELDS);

static GENERAL_NAME_ALTERNATIVES: [Template; 8] = [
    Template::new("otherName", &OTHER_NAME).implicit(Tag::context(0)),
    Template::new("rfc822Name", &IA5_STRING).implicit(Tag::context(1)),
    Template::new("dNSName", &IA5_STRING).implicit(Tag::context(2)),
    Template::new("directoryName", &NAME).explicit(Tag::context(4)),
    Template::new("ediPartyName", &EDI_PARTY_NAME).implicit(Tag::context(5)),
    Template::new("uniformResourceIdentifier", &IA5_STRING).implicit(Tag::context(6)),
    Template::new("iPAddress", &OCTET_STRING).implicit(Tag::context(7)),
    Template::new("registeredID", &OBJECT).implicit(Tag::context(8)),
];

pub static GENERAL_NAME: Item = Item::choice("GeneralName", &GENERAL_NAME_ALTERNATIVES);

static GENERAL_NAMES_BODY: Template = Template::new("names", &GENERAL_NAME).sequence_of();

pub static GENERAL_NAMES: Item = Item::wrapper("GeneralNames", &GENERAL_NAMES_BODY);
