//!
//! # Sessions
//!
//! A [Context], its [Options], and one [Registry] per [EntityKind].
//! Sessions are independent: each receives its context explicitly, and nothing is shared globally.
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use indexmap::IndexMap;

// Local Imports
use crate::context::Context;
use crate::kinds::EntityKind;
use crate::options::Options;
use crate::registry::Registry;

pub struct Session {
    context: Arc<dyn Context>,
    options: Arc<Options>,
    registries: IndexMap<EntityKind, Registry>,
}
impl Session {
    /// Create a new [Session] over `context`, with default [Options]
    pub fn new(context: Arc<dyn Context>) -> Self {
        Self::with_options(context, Options::default())
    }
    pub fn with_options(context: Arc<dyn Context>, options: Options) -> Self {
        Self {
            context,
            options: Arc::new(options),
            registries: IndexMap::new(),
        }
    }
    pub fn context(&self) -> &Arc<dyn Context> {
        &self.context
    }
    pub fn options(&self) -> &Options {
        &self.options
    }
    /// The [Registry] of entities of `kind`, created on first request
    pub fn registry(&mut self, kind: EntityKind) -> &mut Registry {
        let context = &self.context;
        let options = &self.options;
        self.registries
            .entry(kind)
            .or_insert_with(|| Registry::new(kind, Arc::clone(context), Arc::clone(options)))
    }
    pub fn components(&mut self) -> &mut Registry {
        self.registry(EntityKind::Component)
    }
    pub fn pins(&mut self) -> &mut Registry {
        self.registry(EntityKind::Pin)
    }
    pub fn nets(&mut self) -> &mut Registry {
        self.registry(EntityKind::Net)
    }
    pub fn layers(&mut self) -> &mut Registry {
        self.registry(EntityKind::Layer)
    }
    pub fn padstacks(&mut self) -> &mut Registry {
        self.registry(EntityKind::Padstack)
    }
    pub fn pin_groups(&mut self) -> &mut Registry {
        self.registry(EntityKind::PinGroup)
    }
    pub fn component_defs(&mut self) -> &mut Registry {
        self.registry(EntityKind::ComponentDef)
    }
    pub fn models(&mut self) -> &mut Registry {
        self.registry(EntityKind::Model)
    }
    /// Refresh every registry, after bulk edits made outside this session
    pub fn refresh(&mut self) {
        for registry in self.registries.values_mut() {
            registry.refresh();
        }
    }
}
