//!
//! # Argument Trees
//!
//! The addressable form of an argument array.
//! A [Seq] holds ordered [Entry]s, each either a `key:=`/value pair or a positional item,
//! and optionally carries the name from its leading `NAME:` tag.
//! Leaves are [Scalar]s.
//!
//! Keys are found case-insensitively, preferring an exact-case match.
//! Keys repeated at one level all stay in place positionally; the last one wins for lookup.
//! Named sub-sequences (positional items with a `NAME:` tag) are found by their name, same as keys.
//!

// Std-Lib
use std::fmt;

// Crates.io
use log::warn;

// Local Imports
use crate::args::Arg;
use crate::units::{Quantity, Unit};

///
/// # Scalar Leaf Values
///
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Free text
    Text(String),
    /// Engineering quantity, from text in its canonical form, e.g. `"10mil"`
    Quantity(Quantity),
    Int(i64),
    Float(f64),
    Bool(bool),
}
impl Scalar {
    /// Create from wire text.
    /// Text which is exactly the canonical rendering of a suffixed quantity becomes a [Scalar::Quantity];
    /// anything else stays [Scalar::Text], so re-encoding reproduces it verbatim.
    pub fn from_text(s: impl Into<String>) -> Self {
        let s = s.into();
        match Quantity::parse_suffixed(&s) {
            Some(q) if q.to_string() == s => Self::Quantity(q),
            _ => Self::Text(s),
        }
    }
    /// Convert to the wire format
    pub fn to_arg(&self) -> Arg {
        match self {
            Self::Text(s) => Arg::Str(s.clone()),
            Self::Quantity(q) => Arg::Str(q.to_string()),
            Self::Int(i) => Arg::Int(*i),
            Self::Float(f) => Arg::Float(*f),
            Self::Bool(b) => Arg::Bool(*b),
        }
    }
}
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Quantity(q) => write!(f, "{}", q),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

///
/// # Tree Node
///
/// Either a [Scalar] leaf or a nested [Seq].
/// Absent keys are never represented as nodes; lookups report them as misses.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Seq(Seq),
}
impl Node {
    /// Get a reference to our [Seq], if we are one
    pub fn as_seq(&self) -> Option<&Seq> {
        match self {
            Self::Seq(s) => Some(s),
            _ => None,
        }
    }
    /// Get a mutable reference to our [Seq], if we are one
    pub fn as_seq_mut(&mut self) -> Option<&mut Seq> {
        match self {
            Self::Seq(s) => Some(s),
            _ => None,
        }
    }
    /// Get a reference to our [Scalar], if we are one
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }
    /// Our text, for [Scalar::Text] only
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::Text(s)) => Some(s),
            _ => None,
        }
    }
    /// Interpret as a [Quantity].
    /// Text is parsed with `default` applied to bare numbers; numbers take `default` directly.
    pub fn as_quantity(&self, default: Unit) -> Option<Quantity> {
        match self {
            Self::Scalar(Scalar::Quantity(q)) => Some(*q),
            Self::Scalar(Scalar::Text(s)) => Quantity::parse(s, default).ok(),
            Self::Scalar(Scalar::Int(i)) => Some(Quantity::new(*i as f64, default)),
            Self::Scalar(Scalar::Float(x)) => Some(Quantity::new(*x, default)),
            _ => None,
        }
    }
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(Scalar::Int(i)) => Some(*i),
            Self::Scalar(Scalar::Text(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Scalar(Scalar::Int(i)) => Some(*i as f64),
            Self::Scalar(Scalar::Float(x)) => Some(*x),
            Self::Scalar(Scalar::Text(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }
    /// Booleans, including the textual `"true"`/`"false"` some producers emit
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(b)) => Some(*b),
            Self::Scalar(Scalar::Text(s)) => match s.to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
    /// Resolve `path` beneath us. Scalars have nothing beneath them.
    pub fn get(&self, path: &str) -> Option<&Node> {
        self.as_seq()?.get_path(path)
    }
}
impl fmt::Display for Node {
    /// Scalars display as their wire text, sequences as their wire arrays
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{}", s),
            Self::Seq(s) => write!(f, "{}", Arg::Array(s.to_args())),
        }
    }
}
impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::from_text(s))
    }
}
impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::from_text(s))
    }
}
impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Self::Scalar(Scalar::Int(i))
    }
}
impl From<i32> for Node {
    fn from(i: i32) -> Self {
        Self::Scalar(Scalar::Int(i as i64))
    }
}
impl From<usize> for Node {
    fn from(i: usize) -> Self {
        Self::Scalar(Scalar::Int(i as i64))
    }
}
impl From<f64> for Node {
    fn from(x: f64) -> Self {
        Self::Scalar(Scalar::Float(x))
    }
}
impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}
impl From<Quantity> for Node {
    fn from(q: Quantity) -> Self {
        Self::Scalar(Scalar::Quantity(q))
    }
}
impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}
impl From<Seq> for Node {
    fn from(s: Seq) -> Self {
        Self::Seq(s)
    }
}
/// Lists of text become unnamed sequences of positional items
impl From<Vec<String>> for Node {
    fn from(v: Vec<String>) -> Self {
        Self::Seq(Seq::from_items(v.into_iter().map(Node::from)))
    }
}

///
/// # Sequence Entry
///
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// `key:=` and its value
    Pair(String, Node),
    /// Positional item
    Item(Node),
}
impl Entry {
    /// The key under which this entry resolves: a pair's key, or a named item-sequence's name
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Pair(k, _) => Some(k),
            Self::Item(Node::Seq(s)) => s.name(),
            Self::Item(_) => None,
        }
    }
    /// Our value
    pub fn node(&self) -> &Node {
        match self {
            Self::Pair(_, n) | Self::Item(n) => n,
        }
    }
    pub fn node_mut(&mut self) -> &mut Node {
        match self {
            Self::Pair(_, n) | Self::Item(n) => n,
        }
    }
}

///
/// # Argument Sequence
///
/// An ordered list of [Entry]s, optionally named.
/// The name is written first, as a `NAME:<name>` tag, when encoded.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Seq {
    name: Option<String>,
    entries: Vec<Entry>,
}
impl Seq {
    /// Create a new, empty and unnamed [Seq]
    pub fn new() -> Self {
        Self::default()
    }
    /// Create a new, empty [Seq] named `name`
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            entries: Vec::new(),
        }
    }
    /// Create an unnamed [Seq] of positional `items`
    pub fn from_items(items: impl IntoIterator<Item = Node>) -> Self {
        Self {
            name: None,
            entries: items.into_iter().map(Entry::Item).collect(),
        }
    }
    /// Decode from the wire format. Shorthand for [crate::args::decode].
    pub fn from_args(args: &[Arg]) -> crate::AedtResult<Self> {
        crate::args::decode(args)
    }
    /// Encode to the wire format. Shorthand for [crate::args::encode].
    pub fn to_args(&self) -> Vec<Arg> {
        crate::args::encode(self)
    }
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }
    /// Positional access to entry `idx`, pairs and items alike
    pub fn entry(&self, idx: usize) -> Option<&Entry> {
        self.entries.get(idx)
    }
    pub fn entry_mut(&mut self, idx: usize) -> Option<&mut Entry> {
        self.entries.get_mut(idx)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    /// Iterate over positional items
    pub fn items(&self) -> impl Iterator<Item = &Node> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Item(n) => Some(n),
            _ => None,
        })
    }
    /// Iterate over `key:=`/value pairs, duplicates included
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Pair(k, n) => Some((k.as_str(), n)),
            _ => None,
        })
    }
    /// Resolvable keys, in order of first appearance.
    /// Duplicates (by exact spelling) are listed once.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for k in self.entries.iter().filter_map(Entry::key) {
            if !keys.contains(&k) {
                keys.push(k);
            }
        }
        keys
    }
    /// Find the index of the entry resolving `key`.
    ///
    /// Exact-case matches are tried first, then a case-insensitive scan.
    /// Either way the *last* matching entry wins.
    /// A case-insensitive hit among differently-spelled keys is ambiguous; it is logged, and the last still wins.
    pub fn find(&self, key: &str) -> Option<usize> {
        if let Some(idx) = self.entries.iter().rposition(|e| e.key() == Some(key)) {
            return Some(idx);
        }
        let mut hits = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e.key(), Some(k) if k.eq_ignore_ascii_case(key)));
        let (idx, first) = hits.next()?;
        let mut last = (idx, first);
        let mut ambiguous = false;
        for hit in hits {
            if hit.1.key() != first.key() {
                ambiguous = true;
            }
            last = hit;
        }
        if ambiguous {
            warn!(
                "Key {:?} matches several differently-cased keys in {:?}; using the last",
                key,
                self.name().unwrap_or("<unnamed>")
            );
        }
        Some(last.0)
    }
    /// Get the node at single-level `key`
    pub fn get(&self, key: &str) -> Option<&Node> {
        let idx = self.find(key)?;
        Some(self.entries[idx].node())
    }
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        let idx = self.find(key)?;
        Some(self.entries[idx].node_mut())
    }
    /// Boolean indication of whether single-level `key` resolves
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }
    /// Get the node at multi-level `path`, e.g. `"psd/hle/Szs"`.
    ///
    /// A key spelled with a separator, e.g. `"a/b"`, is tried whole first.
    /// Otherwise segments are split on `/` or `\`. A segment which resolves as no key,
    /// but parses as an integer, addresses an entry positionally.
    pub fn get_path(&self, path: &str) -> Option<&Node> {
        if let Some(idx) = self.find_literal(path) {
            return Some(self.entries[idx].node());
        }
        let (first, rest) = split_path(path);
        let node = self.get_segment(first)?;
        match rest {
            None => Some(node),
            Some(rest) => node.as_seq()?.get_path(rest),
        }
    }
    pub fn get_path_mut(&mut self, path: &str) -> Option<&mut Node> {
        if let Some(idx) = self.find_literal(path) {
            return Some(self.entries[idx].node_mut());
        }
        let (first, rest) = split_path(path);
        let node = self.get_segment_mut(first)?;
        match rest {
            None => Some(node),
            Some(rest) => node.as_seq_mut()?.get_path_mut(rest),
        }
    }
    /// Find a key containing path separators, matched whole
    fn find_literal(&self, path: &str) -> Option<usize> {
        if is_path(path) {
            self.find(path)
        } else {
            None
        }
    }
    /// Resolve a single segment, by key and then by position
    fn get_segment(&self, seg: &str) -> Option<&Node> {
        match self.find(seg) {
            Some(idx) => Some(self.entries[idx].node()),
            None => self.entries.get(seg.parse::<usize>().ok()?).map(Entry::node),
        }
    }
    fn get_segment_mut(&mut self, seg: &str) -> Option<&mut Node> {
        let idx = match self.find(seg) {
            Some(idx) => idx,
            None => seg.parse::<usize>().ok()?,
        };
        self.entries.get_mut(idx).map(Entry::node_mut)
    }
    /// Insert or replace single-level `key`.
    ///
    /// An existing key matching case-insensitively is replaced in place, keeping its original spelling,
    /// so two keys differing only by case never become separately resolvable.
    /// Returns the replaced value, if any.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        let key = key.into();
        let node = node.into();
        match self.find(&key) {
            Some(idx) => {
                let entry = &mut self.entries[idx];
                if entry.key() != Some(key.as_str()) {
                    warn!(
                        "Key {:?} replaces differently-cased {:?}",
                        key,
                        entry.key().unwrap_or_default()
                    );
                }
                Some(std::mem::replace(entry.node_mut(), node))
            }
            None => {
                self.entries.push(Entry::Pair(key, node));
                None
            }
        }
    }
    /// Append a `key:=`/value pair, without checking for existing keys
    pub fn push_pair(&mut self, key: impl Into<String>, node: impl Into<Node>) {
        self.entries.push(Entry::Pair(key.into(), node.into()));
    }
    /// Append a positional item
    pub fn push(&mut self, node: impl Into<Node>) {
        self.entries.push(Entry::Item(node.into()));
    }
    /// Remove the entry resolving `key`, returning its value
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let idx = self.find(key)?;
        Some(match self.entries.remove(idx) {
            Entry::Pair(_, n) | Entry::Item(n) => n,
        })
    }
    /// Remove all entries, keeping our name
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Boolean indication of whether `key` contains a path separator
pub(crate) fn is_path(key: &str) -> bool {
    key.contains(|c| c == '/' || c == '\\')
}

/// Split `path` into its first non-empty segment and the remainder, if any
pub(crate) fn split_path(path: &str) -> (&str, Option<&str>) {
    let path = path.trim_matches(|c| c == '/' || c == '\\');
    match path.find(|c| c == '/' || c == '\\') {
        Some(idx) => {
            let rest = path[idx + 1..].trim_start_matches(|c| c == '/' || c == '\\');
            let rest = if rest.is_empty() { None } else { Some(rest) };
            (&path[..idx], rest)
        }
        None => (path, None),
    }
}
