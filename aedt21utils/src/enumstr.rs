//!
//! # Enum-String Mapping Module
//!
//! Defines the [enumstr] macro and paired [EnumStr] trait,
//! mapping fieldless enums to and from the fixed strings the scripting interface uses:
//! unit suffixes, entity-kind names, and the like.
//!
//! Example:
//!
//! ```rs
//! use aedt21utils::enumstr;
//!
//! enumstr!(
//! /// # Pad Shapes
//! PadShape {
//!     Circle: "Cir",
//!     Square: "Sq",
//!     Rect: "Rct",
//!  }
//! );
//! ```
//!

///
/// # String-Enumeration Trait
///
/// * `to_str(&self) -> &'static str` converts the enum to its string value.
/// * `from_str(&str) -> Option<Self>` does the opposite, case-sensitively.
/// * `from_str_nocase(&str) -> Option<Self>` matches ignoring ASCII case.
/// * `variants()` lists every variant, in declaration order.
///
/// Generally implemented by the [enumstr] macro.
///
pub trait EnumStr: std::marker::Sized + Copy + 'static {
    fn to_str(&self) -> &'static str;
    fn from_str(txt: &str) -> Option<Self>;
    fn variants() -> &'static [Self];

    /// Create from a string-value, ignoring ASCII case
    fn from_str_nocase(txt: &str) -> Option<Self> {
        Self::variants()
            .iter()
            .find(|v| v.to_str().eq_ignore_ascii_case(txt))
            .copied()
    }
}

///
/// # Enum-String Pairing Macro
///
/// Creates an `enum` which:
/// * (a) Has paired string-values, as they appear in argument arrays.
/// * (b) Implements the [EnumStr] trait for conversions to and from these strings.
/// * (c) Implements [std::fmt::Display], writing the string-values.
///
/// All variants are fieldless. Derives include `serde::{Serialize,Deserialize}` and `Hash`,
/// so those names must be in scope at the invocation site.
///
#[macro_export]
macro_rules! enumstr {
    (   $(#[$meta: meta])*
        $enum_name: ident {
        $( $variant: ident : $strval: literal ),* $(,)?
    }) => {
        $(#[$meta])*
        #[allow(dead_code)]
        #[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
        pub enum $enum_name {
            $( #[doc=$strval]
                $variant ),*
        }
        impl EnumStr for $enum_name {
            /// Convert a [$enum_name] variant to its paired (static) string value.
            fn to_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $strval),*,
                }
            }
            /// Create a [$enum_name] from one of its string-values.
            /// Returns `None` if `txt` matches none of them. Case *sensitive*;
            /// see `from_str_nocase` for the alternative.
            fn from_str(txt: &str) -> Option<Self> {
                match txt {
                    $( $strval => Some(Self::$variant)),*,
                    _ => None,
                }
            }
            fn variants() -> &'static [Self] {
                &[ $( Self::$variant ),* ]
            }
        }
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(f, "{}", self.to_str())
            }
        }
    }
}
