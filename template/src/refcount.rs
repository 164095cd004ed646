//! Shared ownership for the value kinds that may be referenced from more
//! than one tree.

use std::fmt::Display;
use std::ops::Deref;
use std::sync::{Arc, Weak};

/// A reference-counted handle. A fresh handle has a count of one; every
/// [`Shared::up_ref`] adds an owner and every [`Shared::release`] drops one.
/// Storage goes away with the last owner.
#[derive(Debug)]
pub struct Shared<T>(Arc<T>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Shared(Arc::new(value))
    }

    /// Registers another owner.
    pub fn up_ref(&self) -> Self {
        Shared(Arc::clone(&self.0))
    }

    /// Current number of owners.
    pub fn count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// Gives up this owner. Returns the value when it was the last one, so
    /// the caller knows the storage is now released.
    pub fn release(self) -> Option<T> {
        Arc::into_inner(self.0)
    }

    pub fn ptr_eq(&self, other: &Shared<T>) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// A non-owning observer, mostly useful to check when storage is freed.
    pub fn downgrade(&self) -> Weak<T> {
        Arc::downgrade(&self.0)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        self.up_ref()
    }
}

impl<T> Deref for Shared<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: PartialEq> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: Eq> Eq for Shared<T> {}

impl<T: Display> Display for Shared<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
