//!
//! # In-Memory Context
//!
//! A complete [Context] implementation holding flat argument arrays per kind and name.
//! Contents can be saved to and loaded from JSON or YAML snapshots.
//!

// Std-Lib
use std::path::Path;

// Crates.io
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::args::{Arg, NAME_TAG};
use crate::context::Context;
use crate::error::{AedtError, AedtResult};
use crate::kinds::EntityKind;
use crate::utils::{EnumStr, Ptr, SerdeFile, SerializationFormat};

///
/// # Context Snapshot
///
/// Kind (e.g. `"Component"`) => entity name => payload.
/// Saved snapshots are plain nested maps of arrays.
/// Note payloads mix strings and numbers within arrays, which TOML does not support.
///
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub entities: IndexMap<String, IndexMap<String, Vec<Arg>>>,
}
impl SerdeFile for Snapshot {}

///
/// # In-Memory Context
///
#[derive(Debug, Default)]
pub struct MemoryContext {
    data: Ptr<Snapshot>,
}
impl MemoryContext {
    /// Create a new, empty [MemoryContext]
    pub fn new() -> Self {
        Self::default()
    }
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            data: Ptr::new(snapshot),
        }
    }
    /// Load from snapshot file `fname`, with format inferred from its extension
    pub fn open(fname: impl AsRef<Path>) -> AedtResult<Self> {
        Ok(Self::from_snapshot(Snapshot::open_any(fname)?))
    }
    /// Save a snapshot of our current contents to `fname`
    pub fn save(&self, fmt: SerializationFormat, fname: impl AsRef<Path>) -> AedtResult<()> {
        self.snapshot()?.save(fmt, fname)?;
        Ok(())
    }
    /// Copy out our current contents
    pub fn snapshot(&self) -> AedtResult<Snapshot> {
        Ok(self.data.read()?.clone())
    }
    /// Insert or replace entity `name`, builder-style
    pub fn with(self, kind: EntityKind, name: impl Into<String>, args: Vec<Arg>) -> AedtResult<Self> {
        self.data
            .write()?
            .entities
            .entry(kind.to_str().to_string())
            .or_default()
            .insert(name.into(), args);
        Ok(self)
    }
}

/// Failure for entity `name` of `kind`
fn fail<T>(kind: EntityKind, name: &str, msg: &str) -> AedtResult<T> {
    Err(AedtError::external(kind.to_str(), name, msg))
}
/// The name carried by a payload's leading `NAME:` tag, if any
fn tag_name(args: &[Arg]) -> Option<&str> {
    args.first()?.as_str()?.strip_prefix(NAME_TAG)
}

impl Context for MemoryContext {
    fn fetch(&self, kind: EntityKind, name: &str) -> AedtResult<Vec<Arg>> {
        let data = self.data.read()?;
        match data.entities.get(kind.to_str()).and_then(|m| m.get(name)) {
            Some(args) => Ok(args.clone()),
            None => fail(kind, name, "no such entity"),
        }
    }
    /// Definitions are named by their payload's name tag; submitting a different tag renames them.
    fn submit(&self, kind: EntityKind, name: &str, args: &[Arg]) -> AedtResult<()> {
        let mut data = self.data.write()?;
        let entities = match data.entities.get_mut(kind.to_str()) {
            Some(e) if e.contains_key(name) => e,
            _ => return fail(kind, name, "no such entity"),
        };
        match tag_name(args) {
            Some(tag) if kind.is_definition() && tag != name => {
                if entities.contains_key(tag) {
                    return fail(kind, tag, "already exists");
                }
                entities.shift_remove(name);
                entities.insert(tag.to_string(), args.to_vec());
                debug!("Renamed {} {} to {}", kind, name, tag);
            }
            _ => {
                entities.insert(name.to_string(), args.to_vec());
            }
        }
        Ok(())
    }
    fn enumerate(&self, kind: EntityKind) -> AedtResult<Vec<String>> {
        let data = self.data.read()?;
        Ok(data
            .entities
            .get(kind.to_str())
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default())
    }
    fn create(&self, kind: EntityKind, name: &str, args: &[Arg]) -> AedtResult<()> {
        let mut data = self.data.write()?;
        let entities = data.entities.entry(kind.to_str().to_string()).or_default();
        if entities.keys().any(|k| k.eq_ignore_ascii_case(name)) {
            return fail(kind, name, "already exists");
        }
        entities.insert(name.to_string(), args.to_vec());
        Ok(())
    }
    fn delete(&self, kind: EntityKind, name: &str) -> AedtResult<()> {
        let mut data = self.data.write()?;
        match data.entities.get_mut(kind.to_str()).and_then(|m| m.shift_remove(name)) {
            Some(_) => Ok(()),
            None => fail(kind, name, "no such entity"),
        }
    }
}
