//!
//! # aedt21
//!
//! Data-modeling core for scripting EM-layout tools through their object models.
//!
//! Two layers:
//!
//! * A codec between the scripting API's flat, nested *named-argument arrays*
//!   and addressable trees. [Arg]s are the wire format; [Seq]s and [Node]s the tree;
//!   [KeyMap]s layer aliases and derived properties over a tree.
//! * Lazily populated [Registry]s of named remote entities (components, pins, nets, layers, definitions),
//!   handing out [Entity] proxies which fetch and parse their payloads on first access.
//!
//! Entities live behind a [Context], the boundary to the external system.
//! [MemoryContext] is a complete in-process implementation.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use aedt21::{args, AedtResult, EntityKind, MemoryContext, Session};
//!
//! fn main() -> AedtResult<()> {
//!     let ctx = MemoryContext::new()
//!         .with(EntityKind::Component, "U1", args!["NAME:U1", "PartName:=", "MCU"])?
//!         .with(EntityKind::Component, "R1", args!["NAME:R1", "PartName:=", "RES_0402"])?;
//!     let mut session = Session::new(Arc::new(ctx));
//!
//!     let u1 = session.components().lookup("u1")?;
//!     let mut u1 = u1.write()?;
//!     assert_eq!(u1.get("PartName")?.as_str(), Some("MCU"));
//!     assert_eq!(u1.get("PartClass")?.as_str(), Some("Other"));
//!     Ok(())
//! }
//! ```
//!

// Internal modules & re-exports
pub use aedt21utils as utils;

pub mod error;
pub use error::*;

pub mod units;
pub use units::{Category, Quantity, Unit};

pub mod args;
pub use args::{decode, encode, Arg};

pub mod tree;
pub use tree::{Entry, Node, Scalar, Seq};

pub mod keymap;
pub use keymap::{Derived, KeyMap, PropMaps};

pub mod context;
pub use context::Context;

pub mod memory;
pub use memory::{MemoryContext, Snapshot};

pub mod kinds;
pub use kinds::{EntityKind, NetClass, PartClass};

pub mod entity;
pub use entity::{Entity, Owner};

pub mod registry;
pub use registry::{Registry, Selector};

pub mod options;
pub use options::Options;

pub mod session;
pub use session::Session;

#[cfg(test)]
mod tests;
