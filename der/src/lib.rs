use std::fmt::Display;

use katagami::decoder::{DecodableFrom, Decoder};
use katagami::encoder::{EncodableTo, Encoder};
use nom::{IResult, Parser};

pub mod error;

pub use error::{Error, Result};

pub const TAG_CONSTRUCTED: u8 = 0x20;
const TAG_CLASS_MASK: u8 = 0xc0;
const TAG_NUMBER_MASK: u8 = 0x1f;
const LENGTH_LONG_FORM: u8 = 0x80;
const LENGTH_RESERVED: u8 = 0xff;
const CONTINUATION: u8 = 0x80;
const MAX_UNIVERSAL_TAG: u32 = 30;

/// The two octets that close an indefinite-length encoding.
pub const END_OF_CONTENTS: [u8; 2] = [0x00, 0x00];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Class {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl Class {
    const fn from_identifier(identifier: u8) -> Self {
        match identifier & TAG_CLASS_MASK {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::ContextSpecific,
            _ => Class::Private,
        }
    }

    /// The class bits as they appear in the identifier octet.
    pub const fn bits(self) -> u8 {
        match self {
            Class::Universal => 0x00,
            Class::Application => 0x40,
            Class::ContextSpecific => 0x80,
            Class::Private => 0xc0,
        }
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Class::Universal => write!(f, "UNIVERSAL"),
            Class::Application => write!(f, "APPLICATION"),
            Class::ContextSpecific => write!(f, "CONTEXT"),
            Class::Private => write!(f, "PRIVATE"),
        }
    }
}

/// A tag number together with its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    pub class: Class,
    pub number: u32,
}

impl Tag {
    pub const END_OF_CONTENTS: Tag = Tag::universal(0);
    pub const SEQUENCE: Tag = Tag::universal(16);
    pub const SET: Tag = Tag::universal(17);

    pub const fn new(class: Class, number: u32) -> Self {
        Tag { class, number }
    }

    pub const fn universal(number: u32) -> Self {
        Tag::new(Class::Universal, number)
    }

    pub const fn application(number: u32) -> Self {
        Tag::new(Class::Application, number)
    }

    pub const fn context(number: u32) -> Self {
        Tag::new(Class::ContextSpecific, number)
    }

    pub const fn private(number: u32) -> Self {
        Tag::new(Class::Private, number)
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.class {
            Class::ContextSpecific => write!(f, "[{}]", self.number),
            class => write!(f, "[{} {}]", class, self.number),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Definite(usize),
    /// Content runs until a matching end-of-contents marker.
    Indefinite,
}

/// What kind of element a parsed header introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Primitive,
    Constructed,
    ConstructedIndefinite,
}

/// A parsed identifier + length header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub tag: Tag,
    pub constructed: bool,
    pub length: Length,
    /// Number of octets the header itself occupied.
    pub header_len: usize,
}

impl Header {
    pub fn form(&self) -> Form {
        match (self.constructed, self.length) {
            (false, _) => Form::Primitive,
            (true, Length::Definite(_)) => Form::Constructed,
            (true, Length::Indefinite) => Form::ConstructedIndefinite,
        }
    }

    pub fn content_len(&self) -> Option<usize> {
        match self.length {
            Length::Definite(len) => Some(len),
            Length::Indefinite => None,
        }
    }

    pub fn is_end_of_contents(&self) -> bool {
        self.tag == Tag::END_OF_CONTENTS && !self.constructed && self.length == Length::Definite(0)
    }
}

/// Encoding rules the header parser enforces.
///
/// `Ber` admits indefinite lengths, long-form lengths that are not minimal,
/// the end-of-contents tag and universal tag numbers beyond the assigned
/// range; `Der` rejects them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rules {
    #[default]
    Der,
    Ber,
}

impl Rules {
    pub fn allows_indefinite(self) -> bool {
        self == Rules::Ber
    }
}

impl<'a> DecodableFrom<&'a [u8]> for Header {}

impl<'a> Decoder<&'a [u8], Header> for &'a [u8] {
    type Error = Error;

    fn decode(&self) -> Result<Header> {
        parse_header(self, Rules::Der).map(|(_, header)| header)
    }
}

impl EncodableTo<Header> for Vec<u8> {}

impl Encoder<Header, Vec<u8>> for Header {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>> {
        if !self.constructed && self.length == Length::Indefinite {
            return Err(Error::IndefinitePrimitive);
        }
        let mut out = Vec::with_capacity(header_len(self.tag, self.length));
        write_header(&mut out, self.tag, self.constructed, self.length);
        Ok(out)
    }
}

/// Parses one header from the front of `input`.
///
/// On success returns the input following the header together with the
/// parsed header. A definite length is checked against the remaining input,
/// so the caller can slice the content without further bounds checks.
pub fn parse_header(input: &[u8], rules: Rules) -> Result<(&[u8], Header)> {
    let (rest, identifier) = parse_byte(input).map_err(|_| Error::Truncated)?;
    let class = Class::from_identifier(identifier);
    let constructed = identifier & TAG_CONSTRUCTED != 0;

    let (rest, number) = if identifier & TAG_NUMBER_MASK == TAG_NUMBER_MASK {
        parse_long_tag_number(rest)?
    } else {
        (rest, u32::from(identifier & TAG_NUMBER_MASK))
    };

    if rules == Rules::Der
        && class == Class::Universal
        && (number == 0 || number > MAX_UNIVERSAL_TAG)
    {
        return Err(Error::UniversalTag(number));
    }

    let (rest, length) = parse_length(rest, rules)?;
    match length {
        Length::Indefinite if !rules.allows_indefinite() => return Err(Error::IndefiniteLength),
        Length::Indefinite if !constructed => return Err(Error::IndefinitePrimitive),
        Length::Definite(len) if len > rest.len() => return Err(Error::Truncated),
        _ => {}
    }

    let header = Header {
        tag: Tag::new(class, number),
        constructed,
        length,
        header_len: input.len() - rest.len(),
    };
    Ok((rest, header))
}

/// Returns true when `input` starts with an end-of-contents marker.
pub fn is_end_of_contents(input: &[u8]) -> bool {
    input.starts_with(&END_OF_CONTENTS)
}

/// Splits one complete element (header and content) off the front of `input`.
///
/// Indefinite-length elements are walked through their nested elements until
/// the matching end-of-contents marker, which is part of the returned element.
pub fn skip_element(input: &[u8], rules: Rules, max_depth: usize) -> Result<(&[u8], &[u8])> {
    let (rest, header) = parse_header(input, rules)?;
    let end = match header.length {
        Length::Definite(len) => header.header_len + len,
        Length::Indefinite => {
            if max_depth == 0 {
                return Err(Error::NestingTooDeep(max_depth));
            }
            let mut cursor = rest;
            while !is_end_of_contents(cursor) {
                let (_, after) = skip_element(cursor, rules, max_depth - 1)
                    .map_err(|e| match e {
                        Error::NestingTooDeep(_) => Error::NestingTooDeep(max_depth),
                        e => e,
                    })?;
                cursor = after;
            }
            input.len() - cursor.len() + END_OF_CONTENTS.len()
        }
    };
    Ok(input.split_at(end))
}

/// Appends a header for `tag` to `out`, using the minimal length form.
pub fn write_header(out: &mut Vec<u8>, tag: Tag, constructed: bool, length: Length) {
    let mut identifier = tag.class.bits();
    if constructed {
        identifier |= TAG_CONSTRUCTED;
    }

    if tag.number < u32::from(TAG_NUMBER_MASK) {
        out.push(identifier | tag.number as u8);
    } else {
        out.push(identifier | TAG_NUMBER_MASK);
        let groups = base128_len(tag.number);
        for i in (0..groups).rev() {
            let group = ((tag.number >> (7 * i)) & 0x7f) as u8;
            out.push(if i == 0 { group } else { group | CONTINUATION });
        }
    }

    match length {
        Length::Indefinite => out.push(LENGTH_LONG_FORM),
        Length::Definite(len) if len < usize::from(LENGTH_LONG_FORM) => out.push(len as u8),
        Length::Definite(len) => {
            let octets = len.to_be_bytes();
            let skip = octets.iter().take_while(|&&b| b == 0).count();
            out.push(LENGTH_LONG_FORM | (octets.len() - skip) as u8);
            out.extend_from_slice(&octets[skip..]);
        }
    }
}

/// Number of octets [`write_header`] produces for `tag` and `length`.
pub fn header_len(tag: Tag, length: Length) -> usize {
    let identifier = if tag.number < u32::from(TAG_NUMBER_MASK) {
        1
    } else {
        1 + base128_len(tag.number)
    };
    let length = match length {
        Length::Indefinite => 1,
        Length::Definite(len) if len < usize::from(LENGTH_LONG_FORM) => 1,
        Length::Definite(len) => 1 + (usize::BITS - len.leading_zeros()).div_ceil(8) as usize,
    };
    identifier + length
}

fn base128_len(number: u32) -> usize {
    let bits = u32::BITS - number.leading_zeros();
    bits.div_ceil(7).max(1) as usize
}

fn parse_byte(input: &[u8]) -> IResult<&[u8], u8> {
    nom::number::be_u8().parse(input)
}

fn parse_bytes(input: &[u8], count: usize) -> IResult<&[u8], &[u8]> {
    nom::bytes::complete::take(count).parse(input)
}

fn parse_long_tag_number(input: &[u8]) -> Result<(&[u8], u32)> {
    let mut rest = input;
    let mut number = 0u32;
    let mut first = true;
    loop {
        let (next, b) = parse_byte(rest).map_err(|_| Error::Truncated)?;
        rest = next;
        if first && b == CONTINUATION {
            return Err(Error::NonMinimalTag);
        }
        first = false;
        if number > u32::MAX >> 7 {
            return Err(Error::TagOverflow);
        }
        number = (number << 7) | u32::from(b & 0x7f);
        if b & CONTINUATION == 0 {
            break;
        }
    }
    // Numbers below 31 have to use the single-octet form.
    if number < u32::from(TAG_NUMBER_MASK) {
        return Err(Error::NonMinimalTag);
    }
    Ok((rest, number))
}

fn parse_length(input: &[u8], rules: Rules) -> Result<(&[u8], Length)> {
    let (rest, n) = parse_byte(input).map_err(|_| Error::Truncated)?;
    if n & LENGTH_LONG_FORM == 0 {
        // short form: 0-127
        return Ok((rest, Length::Definite(usize::from(n))));
    }
    if n == LENGTH_LONG_FORM {
        return Ok((rest, Length::Indefinite));
    }
    if n == LENGTH_RESERVED {
        return Err(Error::ReservedLength);
    }

    // long form
    // The low 7 bits count the length octets that follow.
    let count = usize::from(n & !LENGTH_LONG_FORM);
    if count > std::mem::size_of::<u64>() {
        return Err(Error::LengthOverflow);
    }
    let (rest, bs) = parse_bytes(rest, count).map_err(|_| Error::Truncated)?;
    let value = bs.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    // DER: no leading zero octets, and the short form whenever it fits.
    if rules == Rules::Der && (bs.first() == Some(&0) || value < u64::from(LENGTH_LONG_FORM)) {
        return Err(Error::NonMinimalLength);
    }
    if value > isize::MAX as u64 {
        return Err(Error::LengthOverflow);
    }
    let len = usize::try_from(value).map_err(|_| Error::LengthOverflow)?;
    Ok((rest, Length::Definite(len)))
}

#[cfg(test)]
mod tests {
    use katagami::decoder::Decoder;
    use katagami::encoder::Encoder;
    use rstest::rstest;

    use super::*;

    #[rstest(input, expected,
        case(vec![0x02, 0x01, 0x05], Header { tag: Tag::universal(2), constructed: false, length: Length::Definite(1), header_len: 2 }),
        case(vec![0x30, 0x00], Header { tag: Tag::SEQUENCE, constructed: true, length: Length::Definite(0), header_len: 2 }),
        case(vec![0xa0, 0x03, 0x02, 0x01, 0x02], Header { tag: Tag::context(0), constructed: true, length: Length::Definite(3), header_len: 2 }),
        case(vec![0x81, 0x01, 0xff], Header { tag: Tag::context(1), constructed: false, length: Length::Definite(1), header_len: 2 }),
        case(vec![0x5f, 0x1f, 0x00], Header { tag: Tag::application(31), constructed: false, length: Length::Definite(0), header_len: 3 }),
        case(vec![0xdf, 0x81, 0x00, 0x00], Header { tag: Tag::private(128), constructed: false, length: Length::Definite(0), header_len: 4 }),
    )]
    fn test_parse_header(input: Vec<u8>, expected: Header) {
        let (_, actual) = parse_header(&input, Rules::Der).unwrap();
        assert_eq!(expected, actual);
    }

    #[rstest(input, rules, expected,
        case(vec![0x04, 0x81, 0x80], Rules::Der, 0x80),
        case(vec![0x04, 0x82, 0x01, 0x00], Rules::Der, 256),
        case(vec![0x04, 0x81, 0x01], Rules::Ber, 1),
        case(vec![0x04, 0x84, 0x00, 0x00, 0x00, 0x02], Rules::Ber, 2),
        case(vec![0x04, 0x82, 0x00, 0x80], Rules::Ber, 0x80),
    )]
    fn test_parse_long_length(input: Vec<u8>, rules: Rules, expected: usize) {
        let mut padded = input.clone();
        padded.extend(std::iter::repeat_n(0u8, expected));
        let (rest, header) = parse_header(&padded, rules).unwrap();
        assert_eq!(Length::Definite(expected), header.length);
        assert_eq!(input.len(), header.header_len);
        assert_eq!(expected, rest.len());
    }

    #[rstest(input, expected,
        case(vec![], Error::Truncated),
        case(vec![0x30], Error::Truncated),
        case(vec![0x30, 0x03, 0x02, 0x01], Error::Truncated),
        case(vec![0x04, 0x82, 0x01], Error::Truncated),
        case(vec![0x1f], Error::Truncated),
        case(vec![0x1f, 0x81], Error::Truncated),
        case(vec![0x5f, 0x80, 0x1f, 0x00], Error::NonMinimalTag),
        case(vec![0x5f, 0x1e, 0x00], Error::NonMinimalTag),
        case(vec![0x5f, 0x90, 0x80, 0x80, 0x80, 0x00, 0x00], Error::TagOverflow),
        case(vec![0x04, 0xff], Error::ReservedLength),
        case(vec![0x04, 0x81, 0x01, 0x00], Error::NonMinimalLength),
        case(vec![0x04, 0x84, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00], Error::NonMinimalLength),
        case(vec![0x04, 0x82, 0x00, 0x80], Error::NonMinimalLength),
        case(vec![0x04, 0x89, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], Error::LengthOverflow),
        case(vec![0x04, 0x88, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff], Error::LengthOverflow),
        case(vec![0x30, 0x80, 0x00, 0x00], Error::IndefiniteLength),
        case(vec![0x00, 0x00], Error::UniversalTag(0)),
        case(vec![0x1f, 0x1f, 0x00], Error::UniversalTag(31)),
    )]
    fn test_parse_header_error(input: Vec<u8>, expected: Error) {
        let actual = parse_header(&input, Rules::Der).unwrap_err();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_parse_header_indefinite_ber() {
        let input = [0x30, 0x80, 0x02, 0x01, 0x01, 0x00, 0x00];
        let (rest, header) = parse_header(&input, Rules::Ber).unwrap();
        assert_eq!(Form::ConstructedIndefinite, header.form());
        assert_eq!(None, header.content_len());
        assert_eq!(5, rest.len());

        let primitive = [0x04, 0x80, 0x00, 0x00];
        assert_eq!(
            Error::IndefinitePrimitive,
            parse_header(&primitive, Rules::Ber).unwrap_err()
        );

        let (_, eoc) = parse_header(&[0x00, 0x00], Rules::Ber).unwrap();
        assert!(eoc.is_end_of_contents());
    }

    #[rstest(input, expected,
        case(vec![0x02, 0x01, 0x05], Form::Primitive),
        case(vec![0x30, 0x00], Form::Constructed),
    )]
    fn test_header_form(input: Vec<u8>, expected: Form) {
        let header: Header = input.as_slice().decode().unwrap();
        assert_eq!(expected, header.form());
    }

    #[rstest(tag, constructed, length, expected,
        case(Tag::universal(2), false, Length::Definite(1), vec![0x02, 0x01]),
        case(Tag::SEQUENCE, true, Length::Definite(0x80), vec![0x30, 0x81, 0x80]),
        case(Tag::SET, true, Length::Definite(0x1234), vec![0x31, 0x82, 0x12, 0x34]),
        case(Tag::context(3), true, Length::Indefinite, vec![0xa3, 0x80]),
        case(Tag::application(31), false, Length::Definite(0), vec![0x5f, 0x1f, 0x00]),
        case(Tag::private(200), false, Length::Definite(0), vec![0xdf, 0x81, 0x48, 0x00]),
    )]
    fn test_write_header(tag: Tag, constructed: bool, length: Length, expected: Vec<u8>) {
        let mut out = Vec::new();
        write_header(&mut out, tag, constructed, length);
        assert_eq!(expected, out);
        assert_eq!(expected.len(), header_len(tag, length));
    }

    #[test]
    fn test_header_encoder_rejects_indefinite_primitive() {
        let header = Header {
            tag: Tag::universal(4),
            constructed: false,
            length: Length::Indefinite,
            header_len: 2,
        };
        assert_eq!(Error::IndefinitePrimitive, header.encode().unwrap_err());
    }

    #[rstest(input, element_len,
        case(vec![0x02, 0x01, 0x05, 0xff], 3),
        case(vec![0x30, 0x80, 0x02, 0x01, 0x05, 0x00, 0x00, 0xff], 7),
        case(vec![0x30, 0x80, 0x30, 0x80, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff], 10),
    )]
    fn test_skip_element(input: Vec<u8>, element_len: usize) {
        let (element, rest) = skip_element(&input, Rules::Ber, 8).unwrap();
        assert_eq!(&input[..element_len], element);
        assert_eq!(&input[element_len..], rest);
    }

    #[test]
    fn test_skip_element_limits() {
        let unterminated = [0x30, 0x80, 0x02, 0x01, 0x05];
        assert_eq!(
            Error::Truncated,
            skip_element(&unterminated, Rules::Ber, 8).unwrap_err()
        );

        let nested = [0x30, 0x80, 0x30, 0x80, 0x30, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert!(matches!(
            skip_element(&nested, Rules::Ber, 2).unwrap_err(),
            Error::NestingTooDeep(_)
        ));
    }
}
