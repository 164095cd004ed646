use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

const CONTINUATION: u8 = 0x80;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn from_arcs(arcs: &[u64]) -> Self {
        ObjectIdentifier {
            inner: arcs.to_vec(),
        }
    }

    pub fn arcs(&self) -> &[u64] {
        &self.inner
    }

    /// An identifier with no arcs stands for "undefined" and cannot be encoded.
    pub fn is_undefined(&self) -> bool {
        self.inner.is_empty()
    }

    /// Parses content octets into arcs.
    pub fn from_content(content: &[u8]) -> Result<Self> {
        if content.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }
        if content.last().is_some_and(|b| b & CONTINUATION != 0) {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        let mut subidentifiers = Vec::new();
        let mut val = 0u64;
        let mut start = true;
        for &b in content {
            if start && b == CONTINUATION {
                return Err(Error::ObjectIdentifierNotMinimal);
            }
            if val > u64::MAX >> 7 {
                return Err(Error::ObjectIdentifierOverflow);
            }
            val = (val << 7) | u64::from(b & !CONTINUATION);
            start = b & CONTINUATION == 0;
            if start {
                subidentifiers.push(val);
                val = 0;
            }
        }

        // The first sub-identifier packs the first two arcs.
        let first = subidentifiers[0];
        let (root, second) = match first {
            0..40 => (0, first),
            40..80 => (1, first - 40),
            _ => (2, first - 80),
        };
        let mut inner = Vec::with_capacity(subidentifiers.len() + 1);
        inner.push(root);
        inner.push(second);
        inner.extend_from_slice(&subidentifiers[1..]);
        Ok(ObjectIdentifier { inner })
    }

    pub fn to_content(&self) -> Result<Vec<u8>> {
        let [root, second, rest @ ..] = self.inner.as_slice() else {
            return Err(Error::ObjectIdentifierTooFewComponents);
        };
        if *root > 2 || (*root < 2 && *second >= 40) {
            return Err(Error::ObjectIdentifierInvalidRoot(*root, *second));
        }
        let first = (root * 40)
            .checked_add(*second)
            .ok_or(Error::ObjectIdentifierOverflow)?;

        let mut result = Vec::new();
        push_base128(&mut result, first);
        for &arc in rest {
            push_base128(&mut result, arc);
        }
        Ok(result)
    }
}

fn push_base128(out: &mut Vec<u8>, value: u64) {
    let groups = ((u64::BITS - value.leading_zeros()).div_ceil(7)).max(1);
    for i in (0..groups).rev() {
        let group = ((value >> (7 * i)) & 0x7f) as u8;
        out.push(if i == 0 { group } else { group | CONTINUATION });
    }
}

impl Serialize for ObjectIdentifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectIdentifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectIdentifier::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self.inner.first() {
            Some(n) => self.inner[1..]
                .iter()
                .fold(n.to_string(), |s, n| s + "." + &n.to_string()),
            None => String::new(),
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ObjectIdentifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split('.')
            .map(|s| s.parse::<u64>().map_err(Error::ObjectIdentifierInvalidComponent))
            .collect::<Result<Vec<u64>>>()?;
        if values.len() < 2 {
            return Err(Error::ObjectIdentifierTooFewComponents);
        }
        Ok(ObjectIdentifier { inner: values })
    }
}

impl PartialEq<&str> for ObjectIdentifier {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl PartialEq<[u64]> for ObjectIdentifier {
    fn eq(&self, other: &[u64]) -> bool {
        self.inner == other
    }
}
