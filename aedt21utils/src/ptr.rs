//!
//! # Shared-Pointer Types
//!

// Std-lib
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, RwLock};

// Crates.io
use by_address::ByAddress;

///
/// # Ptr
///
/// Shared, reference-counted pointer to registry-owned data,
/// most commonly entity proxies handed out by a registry lookup.
/// The registry and every caller holding a lookup result share the same proxy,
/// so a property parsed or edited through one handle is visible through all of them.
///
/// Access goes through the inner [RwLock]:
///
/// ```text
/// let comp = registry.lookup("U1")?;
/// let mut guard = comp.write()?;   // `?` converts the lock's [PoisonError]
/// let part = guard.get("PartName")?;
/// ```
///
/// Guards generally want a dedicated `let` binding;
/// a temporary guard is dropped at the end of its statement.
///
/// Comparison and hashing are *by address*, via [ByAddress]:
/// two [Ptr]s are equal only if they point at the same proxy,
/// regardless of whether the pointed-to values compare equal.
///
#[derive(Debug, Default)]
pub struct Ptr<T: ?Sized>(ByAddress<Arc<RwLock<T>>>);

impl<T> Ptr<T> {
    /// Pointer Constructor
    pub fn new(i: T) -> Self {
        Self(ByAddress(Arc::new(RwLock::new(i))))
    }
}
impl<T> From<T> for Ptr<T> {
    fn from(t: T) -> Self {
        Self::new(t)
    }
}
impl<T> Deref for Ptr<T> {
    type Target = ByAddress<Arc<RwLock<T>>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<T> DerefMut for Ptr<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
// With a [Deref] implementation in place, the derived versions of these
// would compare the pointed-to values. Implement them by hand, by address.
impl<T> Clone for Ptr<T> {
    fn clone(&self) -> Self {
        Self(ByAddress::clone(&self.0))
    }
}
impl<T> PartialEq for Ptr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}
impl<T> Eq for Ptr<T> {}
impl<T> Hash for Ptr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}
