//!
//! # Entity Proxies
//!
//! Local stand-ins for remote entities.
//! Each is created unparsed, and fetches and decodes its payload on first access.
//! Edits mark it dirty; write-through kinds submit them immediately, others on [Entity::update].
//!

// Std-Lib
use std::fmt;
use std::sync::Arc;

// Crates.io
use log::{debug, info, warn};

// Local Imports
use crate::args::{decode, encode, Arg};
use crate::context::Context;
use crate::error::{AedtError, AedtResult};
use crate::keymap::KeyMap;
use crate::kinds::{prop_maps, EntityKind};
use crate::options::Options;
use crate::tree::{Node, Seq};
use crate::utils::ErrorContext;

///
/// # Entity Owner
///
/// Identity and surroundings of an [Entity], available to its derived properties.
///
#[derive(Clone)]
pub struct Owner {
    pub kind: EntityKind,
    pub name: String,
    pub context: Arc<dyn Context>,
    pub options: Arc<Options>,
}
impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Owner")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish()
    }
}

///
/// # Entity Proxy
///
/// Accessors take `&mut self`, as each first runs [Entity::ensure_parsed].
///
#[derive(Debug)]
pub struct Entity {
    info: KeyMap<Owner>,
    parsed: bool,
    dirty: bool,
}
impl Entity {
    /// Create a new, unparsed proxy
    pub fn new(owner: Owner) -> Self {
        Self {
            info: KeyMap::new(Seq::new(), owner),
            parsed: false,
            dirty: false,
        }
    }
    pub fn name(&self) -> &str {
        &self.info.owner().name
    }
    pub fn kind(&self) -> EntityKind {
        self.info.owner().kind
    }
    pub fn context(&self) -> &Arc<dyn Context> {
        &self.info.owner().context
    }
    pub fn is_parsed(&self) -> bool {
        self.parsed
    }
    /// Whether we hold edits not yet submitted
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
    /// Fetch and decode our payload, and install our kind's derived properties.
    ///
    /// A no-op if already parsed, unless `force`d.
    /// On failure we are left unparsed, and the next access retries.
    pub fn parse(&mut self, force: bool) -> AedtResult<()> {
        if self.parsed && !force {
            return Ok(());
        }
        if self.dirty {
            warn!("Re-parsing {} {} discards unsubmitted edits", self.kind(), self.name());
        }
        self.parsed = false;
        let owner = self.info.owner().clone();
        let raw = owner.context.fetch(owner.kind, &owner.name)?;
        let root = decode(&raw).map_err(|e| locate(e, &owner))?;
        let maps = prop_maps(owner.kind, &root);
        let mut info = KeyMap::new(root, owner);
        info.set_maps(maps)?;
        self.info = info;
        self.parsed = true;
        self.dirty = false;
        debug!("Parsed {} {}", self.kind(), self.name());
        Ok(())
    }
    /// Parse, if not done already
    pub fn ensure_parsed(&mut self) -> AedtResult<()> {
        self.parse(false)
    }
    /// Get the value resolving `key`
    pub fn get(&mut self, key: &str) -> AedtResult<Node> {
        self.ensure_parsed()?;
        Ok(self.info.get(key)?.into_owned())
    }
    pub fn has(&mut self, key: &str) -> AedtResult<bool> {
        self.ensure_parsed()?;
        Ok(self.info.has(key))
    }
    pub fn keys(&mut self) -> AedtResult<Vec<String>> {
        self.ensure_parsed()?;
        Ok(self.info.keys())
    }
    /// Our [KeyMap]
    pub fn info(&mut self) -> AedtResult<&KeyMap<Owner>> {
        self.ensure_parsed()?;
        Ok(&self.info)
    }
    /// Our encoded payload, including any unsubmitted edits
    pub fn raw(&mut self) -> AedtResult<Vec<Arg>> {
        self.ensure_parsed()?;
        Ok(encode(self.info.root()))
    }
    /// Set the value at existing `key`, per [KeyMap::set]
    pub fn set(&mut self, key: &str, value: impl Into<Node>) -> AedtResult<()> {
        self.edit(|m| m.set(key, value))
    }
    /// Insert or replace `key`, per [KeyMap::update]
    pub fn put(&mut self, key: &str, value: impl Into<Node>) -> AedtResult<()> {
        self.edit(|m| m.update(key, value))
    }
    /// Apply edit `f` to our [KeyMap], marking us dirty.
    /// Write-through kinds submit the result immediately.
    pub fn edit<T>(&mut self, f: impl FnOnce(&mut KeyMap<Owner>) -> AedtResult<T>) -> AedtResult<T> {
        self.ensure_parsed()?;
        let out = f(&mut self.info)?;
        self.dirty = true;
        if self.kind().write_through() {
            self.update()?;
        }
        Ok(out)
    }
    /// Submit our payload to the context, then re-parse
    pub fn update(&mut self) -> AedtResult<()> {
        self.ensure_parsed()?;
        let payload = encode(self.info.root());
        let owner = self.info.owner();
        owner.context.submit(owner.kind, &owner.name, &payload)?;
        info!("Submitted {} {}", owner.kind, owner.name);
        self.dirty = false;
        self.parse(true)
    }
}

/// Prefix malformed-payload failures with the kind and name of the entity carrying them
fn locate(err: AedtError, owner: &Owner) -> AedtError {
    match err {
        AedtError::MalformedTree { message, stack } => {
            let mut located = vec![
                ErrorContext::Kind(owner.kind.to_string()),
                ErrorContext::Entity(owner.name.clone()),
            ];
            located.extend(stack);
            AedtError::MalformedTree {
                message,
                stack: located,
            }
        }
        err => err,
    }
}
