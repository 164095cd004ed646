//! UTF-8 code point helpers used by the Unicode string subtypes.

use crate::error::{Error, Result};

const MAX_CODEPOINT: u32 = 0x10ffff;

fn is_scalar(value: u32) -> bool {
    value <= MAX_CODEPOINT && !(0xd800..=0xdfff).contains(&value)
}

/// Reads one code point from the front of `input`, returning it and the
/// number of octets it occupied.
///
/// Overlong forms, surrogates and values above U+10FFFF are rejected.
pub fn getc(input: &[u8]) -> Result<(u32, usize)> {
    let Some(&first) = input.first() else {
        return Err(Error::Utf8Truncated);
    };
    let (len, initial, min) = match first {
        0x00..=0x7f => return Ok((u32::from(first), 1)),
        b if b & 0xe0 == 0xc0 => (2, u32::from(b & 0x1f), 0x80),
        b if b & 0xf0 == 0xe0 => (3, u32::from(b & 0x0f), 0x800),
        b if b & 0xf8 == 0xf0 => (4, u32::from(b & 0x07), 0x10000),
        _ => return Err(Error::Utf8Invalid),
    };
    if input.len() < len {
        return Err(Error::Utf8Truncated);
    }
    let value = input[1..len].iter().try_fold(initial, |acc, &b| {
        if b & 0xc0 == 0x80 {
            Ok((acc << 6) | u32::from(b & 0x3f))
        } else {
            Err(Error::Utf8Invalid)
        }
    })?;
    if value < min || !is_scalar(value) {
        return Err(Error::Utf8Invalid);
    }
    Ok((value, len))
}

/// Number of octets `value` needs in UTF-8.
pub fn encoded_len(value: u32) -> Result<usize> {
    match value {
        v if !is_scalar(v) => Err(Error::CodepointOutOfRange(v)),
        0..0x80 => Ok(1),
        0x80..0x800 => Ok(2),
        0x800..0x10000 => Ok(3),
        _ => Ok(4),
    }
}

/// Appends the UTF-8 form of `value` to `out` and returns the octets written.
pub fn putc(value: u32, out: &mut Vec<u8>) -> Result<usize> {
    let len = encoded_len(value)?;
    match len {
        1 => out.push(value as u8),
        2 => out.extend_from_slice(&[0xc0 | (value >> 6) as u8, 0x80 | (value & 0x3f) as u8]),
        3 => out.extend_from_slice(&[
            0xe0 | (value >> 12) as u8,
            0x80 | ((value >> 6) & 0x3f) as u8,
            0x80 | (value & 0x3f) as u8,
        ]),
        _ => out.extend_from_slice(&[
            0xf0 | (value >> 18) as u8,
            0x80 | ((value >> 12) & 0x3f) as u8,
            0x80 | ((value >> 6) & 0x3f) as u8,
            0x80 | (value & 0x3f) as u8,
        ]),
    }
    Ok(len)
}

/// Counts the code points in a UTF-8 buffer, validating every one of them.
pub fn count(mut input: &[u8]) -> Result<usize> {
    let mut n = 0;
    while !input.is_empty() {
        let (_, len) = getc(input)?;
        input = &input[len..];
        n += 1;
    }
    Ok(n)
}
