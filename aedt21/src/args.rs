//!
//! # Named-Argument Arrays
//!
//! The flat, nested wire format accepted and returned by the scripting object model,
//! and its codec to and from [Seq] trees.
//!
//! ```text
//! ["NAME:pad", "lay:=", "TOP", "Szs:=", ["16mil"], ["NAME:sub", "x:=", 1]]
//! ```
//!
//! * A leading `"NAME:<id>"` string names the sequence.
//! * A string ending in `":="` is a key; the element after it is its value.
//! * Anything else is a positional item. Nested arrays recurse.
//!

// Std-Lib
use std::fmt;

// Crates.io
use serde::{Deserialize, Serialize};

// Local Imports
use crate::error::{AedtError, AedtResult};
use crate::tree::{Entry, Node, Scalar, Seq};
use crate::utils::{ErrorContext, ErrorHelper, Unwrapper};

/// Prefix of the name tag leading a named sequence
pub const NAME_TAG: &str = "NAME:";
/// Suffix marking a string as a key
pub const KEY_MARK: &str = ":=";

///
/// # Wire Element
///
/// Serializes as the corresponding plain JSON/YAML/TOML value.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arg {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Arg>),
}
impl Arg {
    /// Our string content, for [Arg::Str] only
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
    /// Our elements, for [Arg::Array] only
    pub fn as_array(&self) -> Option<&[Arg]> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }
}
impl fmt::Display for Arg {
    /// Formats like the scripting API's own array literals, e.g. `["NAME:x", "w:=", 1]`
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{:?}", x),
            Self::Str(s) => write!(f, "{:?}", s),
            Self::Array(a) => {
                write!(f, "[")?;
                for (idx, arg) in a.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, "]")
            }
        }
    }
}
impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}
impl From<String> for Arg {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Self::Str(s.clone())
    }
}
impl From<i64> for Arg {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}
impl From<i32> for Arg {
    fn from(i: i32) -> Self {
        Self::Int(i as i64)
    }
}
impl From<f64> for Arg {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}
impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
impl From<Vec<Arg>> for Arg {
    fn from(v: Vec<Arg>) -> Self {
        Self::Array(v)
    }
}

///
/// # Argument-Array Literal Macro
///
/// Builds a `Vec<Arg>`, converting each element with [Arg::from].
/// Bracketed elements become nested arrays.
/// Elements longer than a single token must be parenthesized.
///
/// ```rust
/// use aedt21::{args, Arg};
/// let a = args!["NAME:Box", "w:=", "10mil", "ids:=", [1, 2], (-3)];
/// assert_eq!(a[4], Arg::Array(vec![Arg::Int(1), Arg::Int(2)]));
/// ```
///
#[macro_export]
macro_rules! args {
    (@one [$($e:tt),* $(,)?]) => {
        $crate::Arg::Array($crate::args![$($e),*])
    };
    (@one $e:expr) => {
        $crate::Arg::from($e)
    };
    ($($e:tt),* $(,)?) => {{
        let v: ::std::vec::Vec<$crate::Arg> = vec![$($crate::args!(@one $e)),*];
        v
    }};
}

/// Decode flat array `args` into a [Seq]
pub fn decode(args: &[Arg]) -> AedtResult<Seq> {
    Decoder::default().decode_seq(args)
}

/// Encode [Seq] `seq` into a flat array.
/// The exact inverse of [decode]: name tag first, then entries in stored order.
pub fn encode(seq: &Seq) -> Vec<Arg> {
    let mut out = Vec::with_capacity(seq.len() + 1);
    if let Some(name) = seq.name() {
        out.push(Arg::Str(format!("{}{}", NAME_TAG, name)));
    }
    for entry in seq.entries() {
        match entry {
            Entry::Pair(key, node) => {
                out.push(Arg::Str(format!("{}{}", key, KEY_MARK)));
                out.push(encode_node(node));
            }
            Entry::Item(node) => out.push(encode_node(node)),
        }
    }
    out
}
fn encode_node(node: &Node) -> Arg {
    match node {
        Node::Scalar(s) => s.to_arg(),
        Node::Seq(s) => Arg::Array(encode(s)),
    }
}

/// # Argument-Array Decoder
/// Tracks its location, as a stack of [ErrorContext]s, for failure reporting.
#[derive(Debug, Default)]
struct Decoder {
    stack: Vec<ErrorContext>,
}
impl Decoder {
    fn decode_seq(&mut self, args: &[Arg]) -> AedtResult<Seq> {
        let mut seq = Seq::new();
        let mut rest = args;
        if let Some(Arg::Str(first)) = args.first() {
            if let Some(name) = first.strip_prefix(NAME_TAG) {
                self.assert(!name.is_empty(), "Empty name tag")?;
                seq.set_name(name);
                self.stack.push(ErrorContext::Group(name.to_string()));
                rest = &args[1..];
            }
        }
        let mut iter = rest.iter();
        while let Some(arg) = iter.next() {
            match arg {
                Arg::Str(s) if s.ends_with(KEY_MARK) => {
                    let key = &s[..s.len() - KEY_MARK.len()];
                    self.stack.push(ErrorContext::Key(key.to_string()));
                    self.assert(!key.is_empty(), "Empty key")?;
                    let value = iter
                        .next()
                        .unwrapper(self, format!("Key {:?} has no value", key))?;
                    let node = self.decode_node(value)?;
                    seq.push_pair(key, node);
                    self.stack.pop();
                }
                _ => {
                    // Entry index, as accepted by path lookups
                    self.stack.push(ErrorContext::Index(seq.len()));
                    let node = self.decode_node(arg)?;
                    seq.push(node);
                    self.stack.pop();
                }
            }
        }
        if seq.name().is_some() {
            self.stack.pop();
        }
        Ok(seq)
    }
    fn decode_node(&mut self, arg: &Arg) -> AedtResult<Node> {
        Ok(match arg {
            Arg::Array(a) => Node::Seq(self.decode_seq(a)?),
            Arg::Str(s) => Node::Scalar(Scalar::from_text(s.as_str())),
            Arg::Int(i) => Node::Scalar(Scalar::Int(*i)),
            Arg::Float(x) => Node::Scalar(Scalar::Float(*x)),
            Arg::Bool(b) => Node::Scalar(Scalar::Bool(*b)),
        })
    }
}
impl ErrorHelper for Decoder {
    type Error = AedtError;
    fn err(&self, msg: impl Into<String>) -> AedtError {
        AedtError::MalformedTree {
            message: msg.into(),
            stack: self.stack.clone(),
        }
    }
}
