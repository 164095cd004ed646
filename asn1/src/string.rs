use std::fmt::Display;

use crate::Type;
use crate::error::{Error, Result};
use crate::utf8;

/// Set of string subtypes a multi-string item accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringMask(u32);

impl StringMask {
    pub const NUMERIC: StringMask = StringMask(1 << 0);
    pub const PRINTABLE: StringMask = StringMask(1 << 1);
    pub const T61: StringMask = StringMask(1 << 2);
    pub const IA5: StringMask = StringMask(1 << 3);
    pub const VISIBLE: StringMask = StringMask(1 << 4);
    pub const UNIVERSAL: StringMask = StringMask(1 << 5);
    pub const BMP: StringMask = StringMask(1 << 6);
    pub const UTF8: StringMask = StringMask(1 << 7);

    /// The X.520 DirectoryString alternatives.
    pub const DIRECTORY_STRING: StringMask = StringMask::PRINTABLE
        .union(StringMask::T61)
        .union(StringMask::UNIVERSAL)
        .union(StringMask::BMP)
        .union(StringMask::UTF8);

    pub const fn union(self, other: StringMask) -> StringMask {
        StringMask(self.0 | other.0)
    }

    pub const fn of(ty: Type) -> Option<StringMask> {
        match ty {
            Type::NumericString => Some(StringMask::NUMERIC),
            Type::PrintableString => Some(StringMask::PRINTABLE),
            Type::T61String => Some(StringMask::T61),
            Type::Ia5String => Some(StringMask::IA5),
            Type::VisibleString => Some(StringMask::VISIBLE),
            Type::UniversalString => Some(StringMask::UNIVERSAL),
            Type::BmpString => Some(StringMask::BMP),
            Type::Utf8String => Some(StringMask::UTF8),
            _ => None,
        }
    }

    pub fn contains(self, ty: Type) -> bool {
        StringMask::of(ty).is_some_and(|bit| self.0 & bit.0 != 0)
    }
}

/// Content of one of the character string types, kept as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asn1String {
    ty: Type,
    data: Vec<u8>,
}

impl Asn1String {
    /// Wraps content octets after checking them against the subtype's
    /// character set.
    pub fn from_content(ty: Type, data: &[u8]) -> Result<Self> {
        validate(ty, data)?;
        Ok(Asn1String {
            ty,
            data: data.to_vec(),
        })
    }

    /// Encodes `s` in the representation `ty` uses.
    pub fn from_str(ty: Type, s: &str) -> Result<Self> {
        let data = match ty {
            Type::BmpString => s
                .encode_utf16()
                .flat_map(u16::to_be_bytes)
                .collect::<Vec<u8>>(),
            Type::UniversalString => s.chars().flat_map(|c| u32::from(c).to_be_bytes()).collect(),
            Type::T61String => s
                .chars()
                .map(|c| u8::try_from(u32::from(c)).map_err(|_| Error::InvalidString(ty.name())))
                .collect::<Result<Vec<u8>>>()?,
            _ => s.as_bytes().to_vec(),
        };
        Asn1String::from_content(ty, &data)
    }

    /// An empty string of the given subtype.
    pub fn empty(ty: Type) -> Self {
        Asn1String { ty, data: Vec::new() }
    }

    pub fn ty(&self) -> Type {
        self.ty
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Length in characters.
    pub fn char_len(&self) -> Result<usize> {
        match self.ty {
            Type::BmpString => Ok(self.data.len() / 2),
            Type::UniversalString => Ok(self.data.len() / 4),
            Type::Utf8String => utf8::count(&self.data),
            _ => Ok(self.data.len()),
        }
    }

    /// Converts the content to UTF-8.
    pub fn to_utf8(&self) -> Result<String> {
        let mut out = Vec::with_capacity(self.data.len());
        match self.ty {
            Type::BmpString => {
                for unit in self.data.chunks_exact(2) {
                    utf8::putc(u32::from(u16::from_be_bytes([unit[0], unit[1]])), &mut out)?;
                }
            }
            Type::UniversalString => {
                for unit in self.data.chunks_exact(4) {
                    utf8::putc(u32::from_be_bytes([unit[0], unit[1], unit[2], unit[3]]), &mut out)?;
                }
            }
            Type::T61String => {
                for &b in &self.data {
                    utf8::putc(u32::from(b), &mut out)?;
                }
            }
            _ => out.extend_from_slice(&self.data),
        }
        String::from_utf8(out).map_err(|_| Error::InvalidString(self.ty.name()))
    }
}

impl Display for Asn1String {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_utf8() {
            Ok(s) => write!(f, "{}", s),
            Err(_) => write!(f, "<invalid {}>", self.ty.name()),
        }
    }
}

fn is_printable(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b" '()+,-./:=?".contains(&b)
}

fn validate(ty: Type, data: &[u8]) -> Result<()> {
    let ok = match ty {
        Type::NumericString => data.iter().all(|&b| b.is_ascii_digit() || b == b' '),
        Type::PrintableString => data.iter().copied().all(is_printable),
        Type::Ia5String => data.is_ascii(),
        Type::VisibleString => data.iter().all(|&b| (0x20..=0x7e).contains(&b)),
        Type::T61String => true,
        Type::Utf8String => utf8::count(data).is_ok(),
        Type::BmpString => {
            if data.len() % 2 != 0 {
                return Err(Error::StringLength(ty.name(), data.len()));
            }
            data.chunks_exact(2)
                .all(|u| !(0xd800..=0xdfff).contains(&u16::from_be_bytes([u[0], u[1]])))
        }
        Type::UniversalString => {
            if data.len() % 4 != 0 {
                return Err(Error::StringLength(ty.name(), data.len()));
            }
            data.chunks_exact(4).all(|u| {
                let value = u32::from_be_bytes([u[0], u[1], u[2], u[3]]);
                utf8::encoded_len(value).is_ok()
            })
        }
        _ => return Err(Error::StringTypeNotPermitted(ty.name())),
    };
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidString(ty.name()))
    }
}
