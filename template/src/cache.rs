use std::borrow::Cow;

/// Original wire bytes of a decoded node: header plus content exactly as
/// they were read.
///
/// A borrowed cache views the caller's input buffer and cannot outlive it;
/// an owned cache holds a private copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoding<'a> {
    bytes: Option<Cow<'a, [u8]>>,
}

impl<'a> Encoding<'a> {
    pub fn empty() -> Self {
        Encoding { bytes: None }
    }

    /// Records `span`, replacing whatever was cached before.
    pub fn save(&mut self, span: &'a [u8], alias_only: bool) {
        self.bytes = Some(if alias_only {
            Cow::Borrowed(span)
        } else {
            Cow::Owned(span.to_vec())
        });
    }

    /// The cached bytes, if any.
    pub fn restore(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    /// Drops the cached bytes so the next encode re-derives them.
    pub fn invalidate(&mut self) {
        self.bytes = None;
    }

    pub fn is_cached(&self) -> bool {
        self.bytes.is_some()
    }

    pub fn is_alias(&self) -> bool {
        matches!(self.bytes, Some(Cow::Borrowed(_)))
    }

    pub fn into_owned(self) -> Encoding<'static> {
        Encoding {
            bytes: self.bytes.map(|b| Cow::Owned(b.into_owned())),
        }
    }
}
