//!
//! # Key-Resolution Maps
//!
//! A [Seq] tree, plus two tables layered over it:
//! * Aliases, mapping alternate names to canonical keys or paths, many-to-one.
//! * Derived properties, computed on demand from the map and its owner, optionally writable.
//!
//! Resolution of a key runs in a fixed order:
//! 1. Paths split on `/` or `\`; the first segment resolves (by the rest of this list), then the remainder within it.
//!    Tree keys which themselves contain a separator are tried whole, before splitting.
//! 2. Tree keys, exact case first, then case-insensitively.
//! 3. Aliases, recursively.
//! 4. Derived properties.
//!

// Std-Lib
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

// Crates.io
use indexmap::IndexMap;

// Local Imports
use crate::error::{AedtError, AedtResult};
use crate::tree::{is_path, split_path, Node, Seq};
use crate::utils::{DepOrder, DepOrderer};

/// Derived-property getter
pub type Getter<O> = Arc<dyn Fn(&KeyMap<O>) -> AedtResult<Node> + Send + Sync>;
/// Derived-property setter
pub type Setter<O> = Arc<dyn Fn(&mut KeyMap<O>, Node) -> AedtResult<()> + Send + Sync>;

///
/// # Derived Property
///
/// A getter, and an optional setter. Properties without setters are read-only.
///
pub struct Derived<O> {
    pub getter: Getter<O>,
    pub setter: Option<Setter<O>>,
}
impl<O> Derived<O> {
    /// Create a read-only [Derived] property from `getter`
    pub fn getter(getter: impl Fn(&KeyMap<O>) -> AedtResult<Node> + Send + Sync + 'static) -> Self {
        Self {
            getter: Arc::new(getter),
            setter: None,
        }
    }
    /// Add a `setter`
    pub fn with_setter(
        mut self,
        setter: impl Fn(&mut KeyMap<O>, Node) -> AedtResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.setter = Some(Arc::new(setter));
        self
    }
    pub fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }
}
impl<O> Clone for Derived<O> {
    fn clone(&self) -> Self {
        Self {
            getter: Arc::clone(&self.getter),
            setter: self.setter.clone(),
        }
    }
}

///
/// # Property Maps
///
/// Aliases and derived properties, as installed by [KeyMap::set_maps].
///
pub struct PropMaps<O> {
    /// Alternate name => canonical key or path
    pub aliases: IndexMap<String, String>,
    /// Name => [Derived] property
    pub derived: IndexMap<String, Derived<O>>,
}
impl<O> PropMaps<O> {
    pub fn new() -> Self {
        Self {
            aliases: IndexMap::new(),
            derived: IndexMap::new(),
        }
    }
    /// Add an alias, builder-style
    pub fn alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), canonical.into());
        self
    }
    /// Add a derived property, builder-style
    pub fn derive(mut self, name: impl Into<String>, derived: Derived<O>) -> Self {
        self.derived.insert(name.into(), derived);
        self
    }
}
impl<O> Default for PropMaps<O> {
    fn default() -> Self {
        Self::new()
    }
}
impl<O> Clone for PropMaps<O> {
    fn clone(&self) -> Self {
        Self {
            aliases: self.aliases.clone(),
            derived: self.derived.clone(),
        }
    }
}

///
/// # Key-Resolution Map
///
/// A root [Seq], owner `O`, and the alias and derived-property tables.
/// Maps over plain trees use the unit owner, `KeyMap<()>`.
///
pub struct KeyMap<O = ()> {
    root: Seq,
    owner: O,
    aliases: IndexMap<String, String>,
    derived: IndexMap<String, Derived<O>>,
}
impl KeyMap<()> {
    /// Create an owner-less map over `root`
    pub fn from_seq(root: Seq) -> Self {
        Self::new(root, ())
    }
}
impl From<Seq> for KeyMap<()> {
    fn from(root: Seq) -> Self {
        Self::from_seq(root)
    }
}
impl<O> KeyMap<O> {
    /// Create a new map over `root`, owned by `owner`, with empty alias and derived tables
    pub fn new(root: Seq, owner: O) -> Self {
        Self {
            root,
            owner,
            aliases: IndexMap::new(),
            derived: IndexMap::new(),
        }
    }
    pub fn root(&self) -> &Seq {
        &self.root
    }
    pub fn root_mut(&mut self) -> &mut Seq {
        &mut self.root
    }
    pub fn owner(&self) -> &O {
        &self.owner
    }
    pub fn into_root(self) -> Seq {
        self.root
    }
    /// Get the value resolving `key`
    pub fn get(&self, key: &str) -> AedtResult<Cow<'_, Node>> {
        self.resolve(key)?.ok_or_else(|| AedtError::key(key))
    }
    /// Get the value at `key` as text, whatever its scalar type
    pub fn get_text(&self, key: &str) -> AedtResult<String> {
        match self.get(key)?.as_ref() {
            Node::Scalar(s) => Ok(s.to_string()),
            Node::Seq(_) => AedtError::fail(format!("{} is a sequence, not text", key)),
        }
    }
    /// Boolean indication of whether `key` resolves.
    /// Derived getters are not invoked, so paths continuing *into* a derived property report `false`.
    pub fn has(&self, key: &str) -> bool {
        if is_path(key) && self.root.contains(key) {
            return true;
        }
        let (first, rest) = split_path(key);
        if let Some(node) = self.root.get(first) {
            return match rest {
                None => true,
                Some(rest) => node.get(rest).is_some(),
            };
        }
        if let Some(target) = self.alias(first) {
            return match rest {
                None => self.has(target),
                Some(rest) => self.has(&format!("{}/{}", target, rest)),
            };
        }
        if self.derived(first).is_some() {
            return rest.is_none();
        }
        self.root.get_path(key).is_some()
    }
    /// All resolvable top-level names: tree keys, then aliases, then derived properties
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.root.keys().into_iter().map(String::from).collect();
        for k in self.aliases.keys().chain(self.derived.keys()) {
            if !keys.iter().any(|e| e.eq_ignore_ascii_case(k)) {
                keys.push(k.clone());
            }
        }
        keys
    }
    /// Set the value at `key`.
    ///
    /// Existing tree paths are overwritten; aliases write through to their canonical path;
    /// derived properties use their setter, or fail with [AedtError::ReadOnly].
    /// Keys which resolve to none of these fail with [AedtError::KeyNotFound]; nothing is created implicitly.
    pub fn set(&mut self, key: &str, value: impl Into<Node>) -> AedtResult<()> {
        let value = value.into();
        if let Some(node) = self.root.get_path_mut(key) {
            *node = value;
            return Ok(());
        }
        let (first, rest) = split_path(key);
        if let Some(target) = self.alias(first) {
            let target = match rest {
                None => target.to_string(),
                Some(rest) => format!("{}/{}", target, rest),
            };
            return self.set(&target, value);
        }
        if let Some(derived) = self.derived(first) {
            return match (rest, derived.setter.clone()) {
                (None, Some(setter)) => setter(self, value),
                _ => Err(AedtError::ReadOnly {
                    key: key.to_string(),
                }),
            };
        }
        Err(AedtError::key(key))
    }
    /// Install the aliases and derived properties in `maps`, adding to any already present.
    ///
    /// Fails with [AedtError::Alias], installing nothing, if an alias names an existing tree key,
    /// or if the combined alias table contains a cycle.
    pub fn set_maps(&mut self, maps: PropMaps<O>) -> AedtResult<()> {
        for alias in maps.aliases.keys() {
            if self.root.contains(alias) {
                return Err(AedtError::Alias(format!(
                    "alias {:?} shadows an existing key",
                    alias
                )));
            }
        }
        let mut aliases = self.aliases.clone();
        aliases.extend(maps.aliases);
        let graph = AliasGraph(&aliases);
        let names: Vec<String> = aliases.keys().map(|k| k.to_lowercase()).collect();
        graph.order(&names)?;
        self.aliases = aliases;
        self.derived.extend(maps.derived);
        Ok(())
    }
    /// Insert or replace `key`, whose parent must already exist.
    /// A key differing from an existing one only by case replaces it, keeping the original spelling.
    pub fn update(&mut self, key: &str, value: impl Into<Node>) -> AedtResult<()> {
        let (parent, leaf) = split_parent(key);
        let seq = match parent {
            None => &mut self.root,
            Some(parent) => self
                .root
                .get_path_mut(parent)
                .ok_or_else(|| AedtError::key(parent))?
                .as_seq_mut()
                .ok_or_else(|| AedtError::msg(format!("{} is not a sequence", parent)))?,
        };
        seq.insert(leaf, value);
        Ok(())
    }
    /// Append positional item `value` to the root
    pub fn append(&mut self, value: impl Into<Node>) {
        self.root.push(value);
    }
    /// Append positional item `value` to the sequence at `path`
    pub fn append_at(&mut self, path: &str, value: impl Into<Node>) -> AedtResult<()> {
        self.root
            .get_path_mut(path)
            .ok_or_else(|| AedtError::key(path))?
            .as_seq_mut()
            .ok_or_else(|| AedtError::msg(format!("{} is not a sequence", path)))?
            .push(value);
        Ok(())
    }
    /// Resolve `key`, reporting misses as `None` and getter failures as errors
    fn resolve(&self, key: &str) -> AedtResult<Option<Cow<'_, Node>>> {
        if is_path(key) {
            if let Some(node) = self.root.get(key) {
                return Ok(Some(Cow::Borrowed(node)));
            }
        }
        let (first, rest) = split_path(key);
        let head = match self.resolve_one(first)? {
            Some(node) => node,
            None => return Ok(None),
        };
        let rest = match rest {
            Some(rest) => rest,
            None => return Ok(Some(head)),
        };
        Ok(match head {
            Cow::Borrowed(node) => node.get(rest).map(Cow::Borrowed),
            Cow::Owned(node) => node.get(rest).cloned().map(Cow::Owned),
        })
    }
    /// Resolve a single path segment
    fn resolve_one(&self, seg: &str) -> AedtResult<Option<Cow<'_, Node>>> {
        if let Some(node) = self.root.get(seg) {
            return Ok(Some(Cow::Borrowed(node)));
        }
        if let Some(target) = self.alias(seg) {
            return self.resolve(target);
        }
        if let Some(derived) = self.derived(seg) {
            return Ok(Some(Cow::Owned((derived.getter)(self)?)));
        }
        Ok(self.root.get_path(seg).map(Cow::Borrowed))
    }
    /// Look up an alias, exact case first
    fn alias(&self, name: &str) -> Option<&str> {
        lookup(&self.aliases, name).map(String::as_str)
    }
    /// Look up a derived property, exact case first
    fn derived(&self, name: &str) -> Option<&Derived<O>> {
        lookup(&self.derived, name)
    }
}
impl<O: Clone> Clone for KeyMap<O> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            owner: self.owner.clone(),
            aliases: self.aliases.clone(),
            derived: self.derived.clone(),
        }
    }
}
impl<O> fmt::Debug for KeyMap<O> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("KeyMap")
            .field("root", &self.root)
            .field("aliases", &self.aliases)
            .field("derived", &self.derived.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Find `name` in `table`, exact case first and then case-insensitively
fn lookup<'t, V>(table: &'t IndexMap<String, V>, name: &str) -> Option<&'t V> {
    table.get(name).or_else(|| {
        table
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}

/// Split `path` into its parent path, if any, and its final segment
fn split_parent(path: &str) -> (Option<&str>, &str) {
    let path = path.trim_matches(|c| c == '/' || c == '\\');
    match path.rfind(|c| c == '/' || c == '\\') {
        Some(idx) => (Some(&path[..idx]), &path[idx + 1..]),
        None => (None, path),
    }
}

/// Alias table as a dependency graph: each alias depends on the alias its target starts with, if any
struct AliasGraph<'a>(&'a IndexMap<String, String>);
impl DepOrder for AliasGraph<'_> {
    type Item = String;
    type Error = AedtError;

    fn process(&self, item: &String, orderer: &mut DepOrderer<Self>) -> AedtResult<()> {
        if let Some(target) = lookup(self.0, item) {
            let (first, _) = split_path(target);
            if lookup(self.0, first).is_some() {
                orderer.push(&first.to_lowercase())?;
            }
        }
        Ok(())
    }
    fn fail(&self, item: &String) -> AedtResult<()> {
        Err(AedtError::Alias(format!("alias cycle through {:?}", item)))
    }
}
