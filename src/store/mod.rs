//! The store abstraction (component G): a backend-agnostic interface over
//! quadruples, implemented here by [`memory::MemoryStore`] and composed by
//! [`federation::Federation`].

pub mod federation;
pub mod memory;

pub use federation::Federation;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::graph::Graph;
use crate::term::{Resource, Term};
use crate::triple::Quadruple;

/// A quadruple selector: any slot left `None` is a wildcard.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    pub context: Option<Resource>,
    pub subject: Option<Resource>,
    pub predicate: Option<Resource>,
    pub object: Option<Term>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(mut self, context: Resource) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_subject(mut self, subject: Resource) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn with_predicate(mut self, predicate: Resource) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_object(mut self, object: Term) -> Self {
        self.object = Some(object);
        self
    }

    fn matches(&self, q: &Quadruple) -> bool {
        self.context.as_ref().map_or(true, |c| c == &q.context)
            && self.subject.as_ref().map_or(true, |s| s == &q.subject)
            && self.predicate.as_ref().map_or(true, |p| p == &q.predicate)
            && self.object.as_ref().map_or(true, |o| o == &q.object)
    }
}

/// A quadruple store. All operations are atomic per call (§5); backed
/// implementations are expected to wrap each call in a single transaction
/// that commits on success or rolls back on failure, closing the connection
/// on both paths.
pub trait Store {
    fn add_quadruple(&mut self, quad: Quadruple) -> Result<bool, StoreError>;

    fn remove_quadruple(&mut self, quad: &Quadruple) -> Result<bool, StoreError>;

    fn remove_by_context(&mut self, context: &Resource) -> Result<usize, StoreError>;

    fn remove_by_subject(&mut self, subject: &Resource) -> Result<usize, StoreError>;

    fn remove_by_predicate(&mut self, predicate: &Resource) -> Result<usize, StoreError>;

    fn remove_by_object(&mut self, object: &Term) -> Result<usize, StoreError>;

    /// Removes every quadruple whose object is a literal (plain or typed)
    /// with lexical value `literal`, regardless of language tag or
    /// datatype — a value-only match, unlike `remove_by_object`'s exact-term
    /// match, mirroring the legacy schema's separate Object/ObjectID+Flavor
    /// indexing for literal vs. resource objects (§6).
    fn remove_by_literal(&mut self, literal: &str) -> Result<usize, StoreError>;

    fn clear(&mut self) -> Result<(), StoreError>;

    fn contains(&self, quad: &Quadruple) -> Result<bool, StoreError>;

    /// Any slot left unset in `selector` is a wildcard.
    fn select_quadruples(&self, selector: &Selector) -> Result<Vec<Quadruple>, StoreError>;

    /// Groups the store's quadruples into one [`Graph`] per context.
    fn extract_graphs(&self) -> Result<Vec<Graph>, StoreError>;

    /// Adds every triple of `graph` to the store under `graph`'s own context.
    fn merge_graph(&mut self, graph: &Graph) -> Result<(), StoreError>;
}
