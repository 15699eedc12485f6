//!
//! # Owning Contexts
//!
//! The boundary to the external system which actually holds entities.
//! Registries and entity proxies reach it only through the [Context] trait,
//! with payloads in the named-argument wire format.
//!

// Local Imports
use crate::args::Arg;
use crate::error::AedtResult;
use crate::kinds::EntityKind;

///
/// # Context Trait
///
/// Implementations report their own failures as [crate::AedtError::External].
/// Methods take `&self`; implementations handle any locking internally.
///
pub trait Context: Send + Sync {
    /// Fetch the payload of entity `name`
    fn fetch(&self, kind: EntityKind, name: &str) -> AedtResult<Vec<Arg>>;
    /// Replace the payload of existing entity `name`
    fn submit(&self, kind: EntityKind, name: &str, args: &[Arg]) -> AedtResult<()>;
    /// List the names of all entities of `kind`, in the system's own order
    fn enumerate(&self, kind: EntityKind) -> AedtResult<Vec<String>>;
    /// Create new entity `name`
    fn create(&self, kind: EntityKind, name: &str, args: &[Arg]) -> AedtResult<()>;
    /// Delete entity `name`
    fn delete(&self, kind: EntityKind, name: &str) -> AedtResult<()>;
}
