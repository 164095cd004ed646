//! Size and subtype constraints for directory attribute values, keyed by the
//! attribute type OID.

use crate::error::{Error, Result};
use crate::oid::ObjectIdentifier;
use crate::string::{Asn1String, StringMask};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringConstraint {
    pub oid: &'static str,
    pub min: usize,
    /// `None` leaves the upper bound open.
    pub max: Option<usize>,
    pub mask: StringMask,
}

const UB_NAME: usize = 32768;
const UB_COMMON_NAME: usize = 64;
const UB_LOCALITY_NAME: usize = 128;
const UB_STATE_NAME: usize = 128;
const UB_ORGANIZATION_NAME: usize = 64;
const UB_ORGANIZATIONAL_UNIT_NAME: usize = 64;
const UB_SERIAL_NUMBER: usize = 64;
const UB_EMAIL_ADDRESS: usize = 128;

const fn entry(oid: &'static str, min: usize, max: Option<usize>, mask: StringMask) -> StringConstraint {
    StringConstraint { oid, min, max, mask }
}

static TABLE: [StringConstraint; 11] = [
    entry("0.9.2342.19200300.100.1.25", 1, Some(63), StringMask::IA5),
    entry("1.2.840.113549.1.9.1", 1, Some(UB_EMAIL_ADDRESS), StringMask::IA5),
    entry("2.5.4.3", 1, Some(UB_COMMON_NAME), StringMask::DIRECTORY_STRING),
    entry("2.5.4.4", 1, Some(UB_NAME), StringMask::DIRECTORY_STRING),
    entry("2.5.4.5", 1, Some(UB_SERIAL_NUMBER), StringMask::PRINTABLE),
    entry("2.5.4.6", 2, Some(2), StringMask::PRINTABLE),
    entry("2.5.4.7", 1, Some(UB_LOCALITY_NAME), StringMask::DIRECTORY_STRING),
    entry("2.5.4.8", 1, Some(UB_STATE_NAME), StringMask::DIRECTORY_STRING),
    entry("2.5.4.10", 1, Some(UB_ORGANIZATION_NAME), StringMask::DIRECTORY_STRING),
    entry("2.5.4.11", 1, Some(UB_ORGANIZATIONAL_UNIT_NAME), StringMask::DIRECTORY_STRING),
    entry("2.5.4.42", 1, Some(UB_NAME), StringMask::DIRECTORY_STRING),
];

pub fn table() -> &'static [StringConstraint] {
    &TABLE
}

pub fn lookup(oid: &ObjectIdentifier) -> Option<&'static StringConstraint> {
    TABLE.iter().find(|c| *oid == c.oid)
}

impl StringConstraint {
    /// Checks the subtype and character count of `value`.
    pub fn check(&self, value: &Asn1String) -> Result<()> {
        if !self.mask.contains(value.ty()) {
            return Err(Error::StringTypeNotPermitted(value.ty().name()));
        }
        let len = value.char_len()?;
        let max = self.max.unwrap_or(usize::MAX);
        if len < self.min || len > max {
            return Err(Error::StringLengthOutOfRange {
                len,
                min: self.min,
                max,
            });
        }
        Ok(())
    }
}
