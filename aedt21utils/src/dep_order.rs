//!
//! # Dependency-Ordering Trait and Helpers
//!

// Std-lib
use std::collections::HashSet;

///
/// # Dependency-Ordering Trait
///
/// Orders items such that each comes after everything it depends on,
/// and detects dependency cycles along the way.
/// Key-alias tables are the prime example: an alias may point at another alias,
/// and resolution must bottom out at a real key rather than loop forever.
///
/// Implementers supply `process`, which visits a single `Item` and passes each of its
/// direct dependencies to `orderer.push`, and `fail`, which produces the cycle error.
/// Unlike a free function, `process` receives `&self`,
/// so the graph being ordered (e.g. the alias table) lives in the implementer.
///
/// ```text
/// struct AliasGraph<'a>(&'a HashMap<String, String>);
/// impl DepOrder for AliasGraph<'_> {
///     type Item = String;
///     type Error = MyError;
///
///     fn process(&self, item: &String, orderer: &mut DepOrderer<Self>) -> Result<(), MyError> {
///         if let Some(target) = self.0.get(item) {
///             orderer.push(target)?;
///         }
///         Ok(())
///     }
///     fn fail(&self, item: &String) -> Result<(), MyError> {
///         Err(MyError::cycle(item))
///     }
/// }
/// ```
///
pub trait DepOrder: Sized {
    /// Item Type. Typically keys or pointers to the nodes of the dependency graph.
    type Item: Clone + Eq + std::hash::Hash;
    /// Error Type
    type Error;

    /// Dependency-order all entries in slice `items`
    fn order(&self, items: &[Self::Item]) -> Result<Vec<Self::Item>, Self::Error> {
        DepOrderer::order(self, items)
    }

    /// Process a single `item`, pushing its direct dependencies
    fn process(&self, item: &Self::Item, orderer: &mut DepOrderer<Self>)
        -> Result<(), Self::Error>;
    /// Failure-handler, invoked with the item at which a cycle closed
    fn fail(&self, item: &Self::Item) -> Result<(), Self::Error>;
}
/// # Dependency Order Helper
/// Public solely for use in the call-signature of [DepOrder::process].
pub struct DepOrderer<'p, P: DepOrder> {
    /// Graph processor
    p: &'p P,
    /// Ordered, completed items
    stack: Vec<P::Item>,
    /// Completed items, for quick membership tests
    seen: HashSet<P::Item>,
    /// Pending items, for cycle detection
    pending: HashSet<P::Item>,
}
impl<'p, P: DepOrder> DepOrderer<'p, P> {
    /// Dependency-order all entries in slice `items`
    pub fn order(p: &'p P, items: &[P::Item]) -> Result<Vec<P::Item>, P::Error> {
        let len = items.len();
        let mut this = Self {
            p,
            stack: Vec::with_capacity(len),
            seen: HashSet::with_capacity(len),
            pending: HashSet::new(),
        };
        for item in items.iter() {
            this.push(item)?;
        }
        Ok(this.stack)
    }
    /// Push `item`'s dependencies, and then itself, onto the stack
    pub fn push(&mut self, item: &P::Item) -> Result<(), P::Error> {
        if self.seen.contains(item) {
            return Ok(());
        }
        // An item still pending means an open frame further up: a cycle.
        if self.pending.contains(item) {
            return self.p.fail(item);
        }
        self.pending.insert(item.clone());
        let p = self.p;
        p.process(item, self)?;
        if !self.pending.remove(item) {
            return self.p.fail(item);
        }
        self.seen.insert(item.clone());
        self.stack.push(item.clone());
        Ok(())
    }
}
