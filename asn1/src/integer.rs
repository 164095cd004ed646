use std::fmt::Display;

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

// INTEGER and ENUMERATED content are arbitrary sized two's complement values.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    /// Parses content octets, rejecting empty and non-minimal encodings.
    pub fn from_content(content: &[u8]) -> Result<Self> {
        match content {
            [] => Err(Error::IntegerNoData),
            [0x00, b, ..] if b & 0x80 == 0 => Err(Error::IntegerNotMinimal),
            [0xff, b, ..] if b & 0x80 != 0 => Err(Error::IntegerNotMinimal),
            _ => Ok(Integer {
                inner: BigInt::from_signed_bytes_be(content),
            }),
        }
    }

    /// Minimal two's complement content octets.
    pub fn to_content(&self) -> Vec<u8> {
        self.inner.to_signed_bytes_be()
    }

    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl From<BigInt> for Integer {
    fn from(inner: BigInt) -> Self {
        Integer { inner }
    }
}

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.inner.to_string())
    }
}

impl<'de> Deserialize<'de> for Integer {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let inner = s.parse::<BigInt>().map_err(serde::de::Error::custom)?;
        Ok(Integer { inner })
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use num_bigint::BigInt;
    use rstest::rstest;

    use super::*;

    #[rstest(input, expected,
        case(vec![0x00], "0"),
        case(vec![0x01], "1"),
        case(vec![0x7f], "127"),
        case(vec![0x00, 0x80], "128"),
        case(vec![0xff], "-1"),
        case(vec![0x80], "-128"),
        case(vec![0xff, 0x7f], "-129"),
        case(vec![0x03, 0xd4, 0x15, 0x31, 0x8e, 0x2c, 0x57, 0x1d, 0x29, 0x05, 0xfc, 0x3e, 0x05, 0x27, 0x68, 0x9d, 0x0d, 0x09], "333504890676592408951587385614406537514249"),
    )]
    fn test_integer_from_content(input: Vec<u8>, expected: &str) {
        let expected = Integer {
            inner: BigInt::from_str(expected).unwrap(),
        };
        let actual = Integer::from_content(&input).unwrap();
        assert_eq!(expected, actual);
        assert_eq!(input, actual.to_content());
    }

    #[rstest(input, expected,
        case(vec![], Error::IntegerNoData),
        case(vec![0x00, 0x01], Error::IntegerNotMinimal),
        case(vec![0x00, 0x00], Error::IntegerNotMinimal),
        case(vec![0xff, 0x80], Error::IntegerNotMinimal),
    )]
    fn test_integer_from_content_error(input: Vec<u8>, expected: Error) {
        assert_eq!(expected, Integer::from_content(&input).unwrap_err());
    }

    #[rstest(input, expected_json,
        case(Integer::from(0), r#""0""#),
        case(Integer::from(255), r#""255""#),
        case(Integer::from(-1), r#""-1""#),
    )]
    fn test_integer_serialize(input: Integer, expected_json: &str) {
        let json = serde_json::to_string(&input).unwrap();
        assert_eq!(expected_json, json);
        let back: Integer = serde_json::from_str(&json).unwrap();
        assert_eq!(input, back);
    }
}
