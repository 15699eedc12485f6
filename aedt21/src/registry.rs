//!
//! # Named-Entity Registries
//!
//! One per entity kind and session.
//! The registry enumerates its context's entity names on first access,
//! and hands out shared [Ptr]s to lazily-parsed [Entity] proxies.
//! Its cache is then authoritative until [Registry::refresh]; callers keep it current
//! with [Registry::push] and [Registry::pop] after creating or deleting entities themselves,
//! or with [Registry::create] and [Registry::delete], which do both.
//!

// Std-Lib
use std::ops::Range;
use std::sync::{Arc, TryLockError};

// Crates.io
use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};

// Local Imports
use crate::args::Arg;
use crate::context::Context;
use crate::entity::{Entity, Owner};
use crate::error::{AedtError, AedtResult};
use crate::kinds::EntityKind;
use crate::options::{anchored, Options};
use crate::utils::Ptr;

/// Cache of entity names and proxies, keyed by folded name.
/// Names are held beside their proxies, so that listing them never waits on an entity lock.
type Cache = IndexMap<String, (String, Ptr<Entity>)>;

///
/// # Entity Selectors
///
/// The typed forms of registry lookup. See [Registry::select].
///
#[derive(Debug, Clone)]
pub enum Selector<'a> {
    /// Position, in enumeration order
    Index(usize),
    /// Range of positions, truncated to those which exist
    Slice(Range<usize>),
    /// Exact name
    Name(&'a str),
    /// Exact name, or else regular expression over whole names
    Pattern(&'a str),
    /// Names or patterns
    Names(&'a [&'a str]),
}

///
/// # Named-Entity Registry
///
pub struct Registry {
    kind: EntityKind,
    context: Arc<dyn Context>,
    options: Arc<Options>,
    cache: Option<Cache>,
}
impl Registry {
    /// Create a new, unpopulated [Registry]
    pub fn new(kind: EntityKind, context: Arc<dyn Context>, options: Arc<Options>) -> Self {
        Self {
            kind,
            context,
            options,
            cache: None,
        }
    }
    pub fn kind(&self) -> EntityKind {
        self.kind
    }
    pub fn context(&self) -> &Arc<dyn Context> {
        &self.context
    }
    /// Boolean indication of whether the cache is populated
    pub fn is_populated(&self) -> bool {
        self.cache.is_some()
    }
    /// Get the entity named `name`, failing with [AedtError::NotFound] on a miss
    pub fn lookup(&mut self, name: &str) -> AedtResult<Ptr<Entity>> {
        let key = self.fold(name);
        let found = self.cache()?.get(&key).map(|(_, e)| e.clone());
        found.ok_or_else(|| self.not_found(name))
    }
    /// Get the entity named `name`, if it exists
    pub fn get(&mut self, name: &str) -> AedtResult<Option<Ptr<Entity>>> {
        let key = self.fold(name);
        Ok(self.cache()?.get(&key).map(|(_, e)| e.clone()))
    }
    pub fn contains(&mut self, name: &str) -> AedtResult<bool> {
        Ok(self.get(name)?.is_some())
    }
    /// Get all entities matching `pattern`.
    ///
    /// An exact name match is returned alone. Otherwise `pattern` is a regular expression over whole names,
    /// case-insensitive unless names are case-sensitive.
    /// Fails with [AedtError::NotFound] if nothing matches.
    pub fn lookup_pattern(&mut self, pattern: &str) -> AedtResult<Vec<Ptr<Entity>>> {
        if let Some(e) = self.get(pattern)? {
            return Ok(vec![e]);
        }
        let re = anchored(pattern, self.options.case_sensitive_names)?;
        let found: Vec<Ptr<Entity>> = self
            .cache()?
            .iter()
            .filter(|(key, _)| re.is_match(key))
            .map(|(_, (_, e))| e.clone())
            .collect();
        if found.is_empty() {
            return Err(self.not_found(pattern));
        }
        Ok(found)
    }
    /// Look up each of `names`, as names or patterns, flattening the results.
    /// Entities matched more than once are returned once, in order of first match.
    pub fn lookup_many(&mut self, names: &[&str]) -> AedtResult<Vec<Ptr<Entity>>> {
        let mut found = IndexSet::new();
        for name in names {
            found.extend(self.lookup_pattern(name)?);
        }
        Ok(found.into_iter().collect())
    }
    pub fn by_index(&mut self, idx: usize) -> AedtResult<Ptr<Entity>> {
        let found = self.cache()?.get_index(idx).map(|(_, (_, e))| e.clone());
        found.ok_or_else(|| self.not_found(&format!("[{}]", idx)))
    }
    pub fn by_slice(&mut self, range: Range<usize>) -> AedtResult<Vec<Ptr<Entity>>> {
        let len = range.end.saturating_sub(range.start);
        Ok(self
            .cache()?
            .values()
            .skip(range.start)
            .take(len)
            .map(|(_, e)| e.clone())
            .collect())
    }
    pub fn by_name(&mut self, name: &str) -> AedtResult<Ptr<Entity>> {
        self.lookup(name)
    }
    pub fn by_pattern(&mut self, pattern: &str) -> AedtResult<Vec<Ptr<Entity>>> {
        self.lookup_pattern(pattern)
    }
    pub fn by_names(&mut self, names: &[&str]) -> AedtResult<Vec<Ptr<Entity>>> {
        self.lookup_many(names)
    }
    /// Look up entities by [Selector]
    pub fn select(&mut self, sel: Selector) -> AedtResult<Vec<Ptr<Entity>>> {
        match sel {
            Selector::Index(idx) => Ok(vec![self.by_index(idx)?]),
            Selector::Slice(range) => self.by_slice(range),
            Selector::Name(name) => Ok(vec![self.by_name(name)?]),
            Selector::Pattern(pattern) => self.by_pattern(pattern),
            Selector::Names(names) => self.by_names(names),
        }
    }
    /// All entities, in enumeration order
    pub fn all(&mut self) -> AedtResult<Vec<Ptr<Entity>>> {
        Ok(self.cache()?.values().map(|(_, e)| e.clone()).collect())
    }
    pub fn count(&mut self) -> AedtResult<usize> {
        Ok(self.cache()?.len())
    }
    /// Entity names, as enumerated (not folded)
    pub fn names(&mut self) -> AedtResult<Vec<String>> {
        Ok(self.cache()?.values().map(|(name, _)| name.clone()).collect())
    }
    /// Entities for which `pred` holds.
    ///
    /// Entities for which `pred` fails, e.g. as they fail to parse, are logged and skipped.
    /// So are entities already locked elsewhere, e.g. by a guard the caller holds.
    pub fn filter(
        &mut self,
        mut pred: impl FnMut(&mut Entity) -> AedtResult<bool>,
    ) -> AedtResult<Vec<Ptr<Entity>>> {
        let mut found = Vec::new();
        for (name, e) in self.cache()?.values().cloned().collect::<Vec<_>>() {
            let keep = {
                let mut entity = match e.try_write() {
                    Ok(entity) => entity,
                    Err(TryLockError::WouldBlock) => {
                        warn!("Skipping {} {}: locked", self.kind, name);
                        continue;
                    }
                    Err(TryLockError::Poisoned(_)) => return Err(AedtError::PtrLock),
                };
                match pred(&mut *entity) {
                    Ok(keep) => keep,
                    Err(err) => {
                        warn!("Skipping {} {}: {}", self.kind, name, err);
                        false
                    }
                }
            };
            if keep {
                found.push(e);
            }
        }
        Ok(found)
    }
    /// A name starting with `prefix` not yet in use: `prefix` itself if possible,
    /// else `prefix` with the smallest numeric suffix `_1`, `_2`, ... which is free.
    ///
    /// Note the bare `prefix` comes first, and suffixes are separated by an underscore:
    /// `via`, `via_1`, `via_2`, never `via1`.
    pub fn unique_name(&mut self, prefix: &str) -> AedtResult<String> {
        if !self.contains(prefix)? {
            return Ok(prefix.to_string());
        }
        let mut idx = 1;
        loop {
            let name = format!("{}_{}", prefix, idx);
            if !self.contains(&name)? {
                return Ok(name);
            }
            idx += 1;
        }
    }
    /// Add a proxy for entity `name`, newly created in our context.
    /// An existing proxy of the same name is kept, and returned.
    pub fn push(&mut self, name: &str) -> AedtResult<Ptr<Entity>> {
        let key = self.fold(name);
        let entry = (name.to_string(), self.proxy(name));
        let cache = self.cache()?;
        let entity = cache.entry(key).or_insert(entry).1.clone();
        debug!("Pushed {} {}", self.kind, name);
        Ok(entity)
    }
    /// Remove the proxy for entity `name`, newly deleted from our context
    pub fn pop(&mut self, name: &str) -> AedtResult<Ptr<Entity>> {
        let key = self.fold(name);
        let found = self.cache()?.shift_remove(&key).map(|(_, e)| e);
        let entity = found.ok_or_else(|| self.not_found(name))?;
        debug!("Popped {} {}", self.kind, name);
        Ok(entity)
    }
    /// Drop the cache, to be re-populated on next access
    pub fn refresh(&mut self) {
        self.cache = None;
        debug!("Refreshed {} registry", self.kind);
    }
    /// Create entity `name` in our context from `payload`, and push its proxy
    pub fn create(&mut self, name: &str, payload: &[Arg]) -> AedtResult<Ptr<Entity>> {
        self.context.create(self.kind, name, payload)?;
        info!("Created {} {}", self.kind, name);
        self.push(name)
    }
    /// Delete entity `name` from our context, and pop its proxy
    pub fn delete(&mut self, name: &str) -> AedtResult<()> {
        let key = self.fold(name);
        let found = self.cache()?.get(&key).map(|(n, _)| n.clone());
        let name = found.ok_or_else(|| self.not_found(name))?;
        self.context.delete(self.kind, &name)?;
        info!("Deleted {} {}", self.kind, name);
        self.pop(&name)?;
        Ok(())
    }
    /// Our cache, populated on first access
    fn cache(&mut self) -> AedtResult<&mut Cache> {
        let cache = match self.cache.take() {
            Some(cache) => cache,
            None => self.populate()?,
        };
        Ok(self.cache.insert(cache))
    }
    /// Enumerate our context's entities into a new cache
    fn populate(&self) -> AedtResult<Cache> {
        let names = self.context.enumerate(self.kind)?;
        let mut cache = Cache::with_capacity(names.len());
        for name in names {
            let key = self.fold(&name);
            if cache.contains_key(&key) {
                warn!("Ignoring duplicate {} name {}", self.kind, name);
                continue;
            }
            let entity = self.proxy(&name);
            cache.insert(key, (name, entity));
        }
        debug!("Populated {} registry with {} entities", self.kind, cache.len());
        Ok(cache)
    }
    /// Create a new proxy for entity `name`
    fn proxy(&self, name: &str) -> Ptr<Entity> {
        Ptr::new(Entity::new(Owner {
            kind: self.kind,
            name: name.to_string(),
            context: Arc::clone(&self.context),
            options: Arc::clone(&self.options),
        }))
    }
    /// Cache key for `name`
    fn fold(&self, name: &str) -> String {
        if self.options.case_sensitive_names {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }
    fn not_found(&self, name: &str) -> AedtError {
        AedtError::NotFound {
            kind: self.kind.to_string(),
            name: name.to_string(),
        }
    }
}
