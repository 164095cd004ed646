//! Interned object identifiers.
//!
//! Decoding an OBJECT IDENTIFIER that the table knows hands out another
//! owner of the table's shared copy instead of a fresh allocation, so the
//! same identifier can be referenced from any number of trees.

use std::collections::HashMap;

use katagami_asn1::ObjectIdentifier;
use once_cell::sync::Lazy;

use crate::refcount::Shared;

#[derive(Debug, Clone)]
pub struct ObjectInfo {
    /// Numeric id, unique within the table.
    pub nid: usize,
    pub short_name: &'static str,
    pub long_name: &'static str,
    pub oid: Shared<ObjectIdentifier>,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectTable {
    entries: Vec<ObjectInfo>,
    by_arcs: HashMap<Vec<u64>, usize>,
}

impl ObjectTable {
    pub fn new() -> Self {
        ObjectTable::default()
    }

    /// Adds an identifier. Re-adding known arcs keeps the first entry.
    pub fn with(mut self, short_name: &'static str, long_name: &'static str, arcs: &[u64]) -> Self {
        if !self.by_arcs.contains_key(arcs) {
            let nid = self.entries.len() + 1;
            self.by_arcs.insert(arcs.to_vec(), self.entries.len());
            self.entries.push(ObjectInfo {
                nid,
                short_name,
                long_name,
                oid: Shared::new(ObjectIdentifier::from_arcs(arcs)),
            });
        }
        self
    }

    pub fn lookup(&self, oid: &ObjectIdentifier) -> Option<&ObjectInfo> {
        self.by_arcs.get(oid.arcs()).map(|&i| &self.entries[i])
    }

    pub fn by_nid(&self, nid: usize) -> Option<&ObjectInfo> {
        self.entries.get(nid.checked_sub(1)?)
    }

    pub fn by_short_name(&self, short_name: &str) -> Option<&ObjectInfo> {
        self.entries.iter().find(|info| info.short_name == short_name)
    }

    /// A handle on the table's copy when `oid` is known, otherwise a new
    /// handle owning `oid`.
    pub fn intern(&self, oid: ObjectIdentifier) -> Shared<ObjectIdentifier> {
        match self.lookup(&oid) {
            Some(info) => {
                tracing::debug!("interned {} ({})", info.short_name, oid);
                info.oid.up_ref()
            }
            None => Shared::new(oid),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectInfo> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static BUILTIN: Lazy<ObjectTable> = Lazy::new(|| {
    ObjectTable::new()
        .with("rsaEncryption", "rsaEncryption", &[1, 2, 840, 113549, 1, 1, 1])
        .with("RSA-SHA1", "sha1WithRSAEncryption", &[1, 2, 840, 113549, 1, 1, 5])
        .with("RSA-SHA256", "sha256WithRSAEncryption", &[1, 2, 840, 113549, 1, 1, 11])
        .with("RSA-SHA384", "sha384WithRSAEncryption", &[1, 2, 840, 113549, 1, 1, 12])
        .with("id-ecPublicKey", "id-ecPublicKey", &[1, 2, 840, 10045, 2, 1])
        .with("prime256v1", "prime256v1", &[1, 2, 840, 10045, 3, 1, 7])
        .with("secp384r1", "secp384r1", &[1, 3, 132, 0, 34])
        .with("ecdsa-with-SHA256", "ecdsa-with-SHA256", &[1, 2, 840, 10045, 4, 3, 2])
        .with("ecdsa-with-SHA384", "ecdsa-with-SHA384", &[1, 2, 840, 10045, 4, 3, 3])
        .with("ED25519", "ED25519", &[1, 3, 101, 112])
        .with("emailAddress", "emailAddress", &[1, 2, 840, 113549, 1, 9, 1])
        .with("DC", "domainComponent", &[0, 9, 2342, 19200300, 100, 1, 25])
        .with("CN", "commonName", &[2, 5, 4, 3])
        .with("SN", "surname", &[2, 5, 4, 4])
        .with("serialNumber", "serialNumber", &[2, 5, 4, 5])
        .with("C", "countryName", &[2, 5, 4, 6])
        .with("L", "localityName", &[2, 5, 4, 7])
        .with("ST", "stateOrProvinceName", &[2, 5, 4, 8])
        .with("O", "organizationName", &[2, 5, 4, 10])
        .with("OU", "organizationalUnitName", &[2, 5, 4, 11])
        .with("GN", "givenName", &[2, 5, 4, 42])
        .with("subjectKeyIdentifier", "X509v3 Subject Key Identifier", &[2, 5, 29, 14])
        .with("keyUsage", "X509v3 Key Usage", &[2, 5, 29, 15])
        .with("subjectAltName", "X509v3 Subject Alternative Name", &[2, 5, 29, 17])
        .with("basicConstraints", "X509v3 Basic Constraints", &[2, 5, 29, 19])
        .with("authorityKeyIdentifier", "X509v3 Authority Key Identifier", &[2, 5, 29, 35])
        .with("extendedKeyUsage", "X509v3 Extended Key Usage", &[2, 5, 29, 37])
});

/// The process-wide table of well-known identifiers.
pub fn builtin() -> &'static ObjectTable {
    &BUILTIN
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_intern_known() {
        let table = ObjectTable::new().with("CN", "commonName", &[2, 5, 4, 3]);
        let info = table.lookup(&ObjectIdentifier::from_str("2.5.4.3").unwrap()).unwrap();
        assert_eq!(1, info.nid);
        assert_eq!(1, info.oid.count());

        let handle = table.intern(ObjectIdentifier::from_str("2.5.4.3").unwrap());
        assert!(handle.ptr_eq(&info.oid));
        assert_eq!(2, info.oid.count());
        drop(handle);
        assert_eq!(1, info.oid.count());
    }

    #[test]
    fn test_intern_unknown() {
        let table = ObjectTable::new();
        let handle = table.intern(ObjectIdentifier::from_str("1.2.3.4").unwrap());
        assert_eq!(1, handle.count());
        assert!(table.is_empty());
    }

    #[test]
    fn test_builtin() {
        let table = builtin();
        let cn = table.by_short_name("CN").unwrap();
        assert_eq!("commonName", cn.long_name);
        assert_eq!(cn.nid, table.by_nid(cn.nid).unwrap().nid);
        assert!(table.by_nid(0).is_none());
        assert!(table.by_nid(usize::MAX).is_none());
        assert_eq!(table.len(), table.iter().count());
        // Ids run 1..=len in insertion order.
        let last = table.iter().last().unwrap();
        assert_eq!(table.len(), last.nid);
        assert_eq!(last.short_name, table.by_nid(table.len()).unwrap().short_name);
    }

    #[test]
    fn test_duplicate_arcs() {
        let table = ObjectTable::new()
            .with("CN", "commonName", &[2, 5, 4, 3])
            .with("commonName", "commonName", &[2, 5, 4, 3]);
        assert_eq!(1, table.len());
    }
}
