//! In-memory reference [`Store`] implementation, indexed the same way
//! [`crate::graph::metadata::GraphMetadata`] indexes a single graph's
//! containers and collections: a flat set plus a few lookup maps kept in
//! sync on every mutation.

use std::collections::HashMap;

use crate::error::StoreError;
use crate::graph::Graph;
use crate::term::{Resource, Term};
use crate::triple::Quadruple;

use super::{Selector, Store};

/// A flat, process-local quadruple store keyed by [`crate::triple::QuadrupleId`]
/// for O(1) duplicate detection.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    quads: HashMap<i64, Quadruple>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }
}

impl Store for MemoryStore {
    fn add_quadruple(&mut self, quad: Quadruple) -> Result<bool, StoreError> {
        let id = quad.id();
        let is_new = !self.quads.contains_key(&id);
        self.quads.insert(id, quad);
        Ok(is_new)
    }

    fn remove_quadruple(&mut self, quad: &Quadruple) -> Result<bool, StoreError> {
        Ok(self.quads.remove(&quad.id()).is_some())
    }

    fn remove_by_context(&mut self, context: &Resource) -> Result<usize, StoreError> {
        let before = self.quads.len();
        self.quads.retain(|_, q| &q.context != context);
        Ok(before - self.quads.len())
    }

    fn remove_by_subject(&mut self, subject: &Resource) -> Result<usize, StoreError> {
        let before = self.quads.len();
        self.quads.retain(|_, q| &q.subject != subject);
        Ok(before - self.quads.len())
    }

    fn remove_by_predicate(&mut self, predicate: &Resource) -> Result<usize, StoreError> {
        let before = self.quads.len();
        self.quads.retain(|_, q| &q.predicate != predicate);
        Ok(before - self.quads.len())
    }

    fn remove_by_object(&mut self, object: &Term) -> Result<usize, StoreError> {
        let before = self.quads.len();
        self.quads.retain(|_, q| &q.object != object);
        Ok(before - self.quads.len())
    }

    fn remove_by_literal(&mut self, literal: &str) -> Result<usize, StoreError> {
        let before = self.quads.len();
        self.quads.retain(|_, q| match &q.object {
            Term::Plain(l) => l.value != literal,
            Term::Typed(l) => l.value != literal,
            Term::Resource(_) => true,
        });
        Ok(before - self.quads.len())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.quads.clear();
        Ok(())
    }

    fn contains(&self, quad: &Quadruple) -> Result<bool, StoreError> {
        Ok(self.quads.contains_key(&quad.id()))
    }

    fn select_quadruples(&self, selector: &Selector) -> Result<Vec<Quadruple>, StoreError> {
        Ok(self
            .quads
            .values()
            .filter(|q| selector.matches(q))
            .cloned()
            .collect())
    }

    fn extract_graphs(&self) -> Result<Vec<Graph>, StoreError> {
        let mut by_context: HashMap<Resource, Graph> = HashMap::new();
        for quad in self.quads.values() {
            let graph = by_context
                .entry(quad.context.clone())
                .or_insert_with(|| Graph::new(quad.context.clone()));
            graph
                .insert(quad.as_triple())
                .map_err(|e| StoreError::wrap("failed to rebuild graph from store", e))?;
        }
        Ok(by_context.into_values().collect())
    }

    fn merge_graph(&mut self, graph: &Graph) -> Result<(), StoreError> {
        for triple in graph.triples() {
            self.add_quadruple(Quadruple::from_triple(graph.context().clone(), triple.clone()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::PlainLiteral;

    fn quad(ctx: &str, s: &str, p: &str, o: &str) -> Quadruple {
        Quadruple::new(
            Resource::new(ctx).unwrap(),
            Resource::new(s).unwrap(),
            Resource::new(p).unwrap(),
            PlainLiteral::new(o, ""),
        )
    }

    #[test]
    fn adding_the_same_quadruple_twice_reports_duplicate() {
        let mut store = MemoryStore::new();
        let q = quad("http://e/g", "http://e/s", "http://e/p", "o");
        assert!(store.add_quadruple(q.clone()).unwrap());
        assert!(!store.add_quadruple(q).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn select_with_wildcards_filters_only_on_set_slots() {
        let mut store = MemoryStore::new();
        store
            .add_quadruple(quad("http://e/g", "http://e/s1", "http://e/p", "o1"))
            .unwrap();
        store
            .add_quadruple(quad("http://e/g", "http://e/s2", "http://e/p", "o2"))
            .unwrap();

        let selector = Selector::new().with_subject(Resource::new("http://e/s1").unwrap());
        let results = store.select_quadruples(&selector).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].subject.as_str(), "http://e/s1");
    }

    #[test]
    fn remove_by_literal_matches_value_regardless_of_type() {
        let mut store = MemoryStore::new();
        store
            .add_quadruple(quad("http://e/g", "http://e/s1", "http://e/p", "42"))
            .unwrap();
        store
            .add_quadruple(Quadruple::new(
                Resource::new("http://e/g").unwrap(),
                Resource::new("http://e/s2").unwrap(),
                Resource::new("http://e/p").unwrap(),
                crate::term::Term::Typed(crate::term::TypedLiteral::new(
                    "42",
                    crate::term::Datatype::XsdInteger,
                )),
            ))
            .unwrap();
        store
            .add_quadruple(quad("http://e/g", "http://e/s3", "http://e/p", "other"))
            .unwrap();

        let removed = store.remove_by_literal("42").unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn extract_graphs_groups_by_context() {
        let mut store = MemoryStore::new();
        store
            .add_quadruple(quad("http://e/g1", "http://e/s", "http://e/p", "o"))
            .unwrap();
        store
            .add_quadruple(quad("http://e/g2", "http://e/s", "http://e/p", "o"))
            .unwrap();
        let graphs = store.extract_graphs().unwrap();
        assert_eq!(graphs.len(), 2);
    }
}
