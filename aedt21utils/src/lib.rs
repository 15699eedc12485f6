//!
//! # aedt21 Internal Utilities Crate
//!
//! Shared pointers, error-helper traits, enum-string mappings,
//! dependency ordering, and serialization helpers used across aedt21.
//!

pub mod ptr;
pub use ptr::*;

pub mod ser;
pub use ser::*;

pub mod error;
pub use error::*;

pub mod context;
pub use context::*;

pub mod dep_order;
pub use dep_order::*;

pub mod enumstr;
pub use enumstr::*;
