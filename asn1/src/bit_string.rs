use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    pub fn new(unused: u8, data: Vec<u8>) -> Result<Self> {
        if unused > 7 {
            return Err(Error::BitStringUnusedBitsOutOfRange(unused));
        }
        match data.last() {
            None if unused != 0 => Err(Error::BitStringUnusedBitsOutOfRange(unused)),
            Some(last) if last & ((1u8 << unused) - 1) != 0 => Err(Error::BitStringNonZeroPadding),
            _ => Ok(BitString { unused, data }),
        }
    }

    /// Parses content octets: the leading octet counts the padding bits.
    pub fn from_content(content: &[u8]) -> Result<Self> {
        match content.split_first() {
            Some((&unused, data)) => BitString::new(unused, data.to_vec()),
            None => Err(Error::BitStringNoData),
        }
    }

    pub fn to_content(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(self.data.len() + 1);
        result.push(self.unused);
        result.extend_from_slice(&self.data);
        result
    }

    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.data.len() * 8 - usize::from(self.unused)
    }
}

impl Serialize for BitString {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            use serde::ser::SerializeStruct;
            let mut state = serializer.serialize_struct("BitString", 2)?;
            state.serialize_field("bit_length", &self.bit_len())?;
            let hex_string = self
                .data
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(":");
            state.serialize_field("bits", &hex_string)?;
            state.end()
        } else {
            (self.unused, &self.data).serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for BitString {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            return Err(serde::de::Error::custom(
                "BitString deserialization from a human readable form is not supported",
            ));
        }
        let (unused, data) = <(u8, Vec<u8>)>::deserialize(deserializer)?;
        BitString::new(unused, data).map_err(serde::de::Error::custom)
    }
}

impl Display for BitString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, byte) in self.data.iter().enumerate() {
            if i == self.data.len() - 1 && self.unused > 0 {
                let bit_count = 8 - usize::from(self.unused);
                write!(f, "{:0bit_count$b}", byte >> self.unused)?;
            } else {
                write!(f, "{:08b}", byte)?;
            }
        }
        Ok(())
    }
}
