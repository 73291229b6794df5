//! The RDF graph (§3): an unordered set of triples plus a context URI and
//! derived [`GraphMetadata`].

pub mod container;
pub mod metadata;

pub use container::{Container, ContainerKind, ItemKind};
pub use metadata::{CollectionItem, GraphMetadata};

use std::cell::Cell;
use std::collections::HashSet;

use crate::error::ModelError;
use crate::term::Resource;
use crate::triple::Triple;

/// An unordered set of triples, with no duplicates, plus a base IRI
/// (`context`) and a metadata collector rebuilt on every insertion.
#[derive(Debug, Clone)]
pub struct Graph {
    context: Resource,
    triples: HashSet<Triple>,
    metadata: GraphMetadata,
    /// Backs [`Graph::fresh_blank`]: a monotonically increasing counter
    /// scoped to this graph, not global, so two graphs minting blanks
    /// independently don't have to coordinate (§4.A). Only graph-internal
    /// uniqueness is promised; identifiers may coincide across graphs.
    blank_counter: Cell<u64>,
}

impl Graph {
    pub fn new(context: Resource) -> Self {
        Graph {
            context,
            triples: HashSet::new(),
            metadata: GraphMetadata::new(),
            blank_counter: Cell::new(0),
        }
    }

    /// A graph with a synthetic blank-node context, useful when no
    /// particular base IRI is meaningful. The context id is drawn from this
    /// graph's own counter before any data blanks are minted, under a `g`
    /// prefix distinct from `fresh_blank`'s `b` prefix.
    pub fn anonymous() -> Self {
        let blank_counter = Cell::new(0);
        let id = blank_counter.get();
        blank_counter.set(id + 1);
        Graph {
            context: Resource::blank(format!("g{id}")),
            triples: HashSet::new(),
            metadata: GraphMetadata::new(),
            blank_counter,
        }
    }

    /// Mints a fresh blank node scoped to this graph's own counter (§4.A),
    /// used by the deserializer when synthesizing cons-cell and container
    /// identifiers while populating this graph.
    pub fn fresh_blank(&self) -> Resource {
        let n = self.blank_counter.get();
        self.blank_counter.set(n + 1);
        Resource::blank(format!("b{n}"))
    }

    pub fn context(&self) -> &Resource {
        &self.context
    }

    pub fn set_context(&mut self, context: Resource) {
        self.context = context;
    }

    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Inserts a triple, updating metadata. Returns `true` if it was new.
    /// Set semantics: inserting the same triple twice, or two triples in
    /// either order, yields the same final content (§8).
    pub fn insert(&mut self, triple: Triple) -> Result<bool, ModelError> {
        let inserted = self.triples.insert(triple.clone());
        if inserted {
            self.metadata.update(&triple);
        }
        Ok(inserted)
    }

    /// Removes a triple and rebuilds metadata from the remaining triples,
    /// since a single triple's removal can invalidate a container or
    /// collection-chain entry that depended on it.
    pub fn remove(&mut self, triple: &Triple) -> bool {
        let removed = self.triples.remove(triple);
        if removed {
            self.rebuild_metadata();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.triples.clear();
        self.metadata.clear();
    }

    fn rebuild_metadata(&mut self) {
        self.metadata.clear();
        for triple in &self.triples {
            self.metadata.update(triple);
        }
    }

    /// Subjects that are containers but never appear as any triple's object:
    /// they must be emitted inline by the serializer (§4.C step 3).
    pub fn floating_containers(&self) -> HashSet<Resource> {
        self.metadata
            .containers()
            .keys()
            .filter(|subject| !self.appears_as_object(subject))
            .cloned()
            .collect()
    }

    /// Collection heads that never appear as any triple's object.
    pub fn floating_collections(&self) -> HashSet<Resource> {
        self.metadata
            .collections()
            .keys()
            .filter(|subject| !self.appears_as_object(subject))
            .cloned()
            .collect()
    }

    fn appears_as_object(&self, subject: &Resource) -> bool {
        self.triples.iter().any(|t| {
            t.object
                .as_resource()
                .map(|r| r == subject)
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ns::rdf;
    use crate::term::Term;

    fn res(s: &str) -> Resource {
        Resource::new(s).unwrap()
    }

    #[test]
    fn insertion_order_does_not_affect_final_content() {
        let t1 = Triple::new(res("http://e/s1"), res("http://e/p"), Term::Resource(res("http://e/o")));
        let t2 = Triple::new(res("http://e/s2"), res("http://e/p"), Term::Resource(res("http://e/o")));

        let mut g1 = Graph::new(res("http://e/ctx"));
        g1.insert(t1.clone()).unwrap();
        g1.insert(t2.clone()).unwrap();

        let mut g2 = Graph::new(res("http://e/ctx"));
        g2.insert(t2).unwrap();
        g2.insert(t1).unwrap();

        assert_eq!(g1.triples().collect::<HashSet<_>>(), g2.triples().collect::<HashSet<_>>());
    }

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let mut g = Graph::new(res("http://e/ctx"));
        let t = Triple::new(res("http://e/s"), res("http://e/p"), Term::Resource(res("http://e/o")));
        assert!(g.insert(t.clone()).unwrap());
        assert!(!g.insert(t).unwrap());
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn fresh_blank_nodes_are_distinct_within_a_graph() {
        let g = Graph::new(res("http://e/ctx"));
        let a = g.fresh_blank();
        let b = g.fresh_blank();
        assert_ne!(a, b);
    }

    #[test]
    fn floating_container_detection() {
        let mut g = Graph::new(res("http://e/ctx"));
        g.insert(Triple::new(
            res("bnode:c"),
            rdf::TYPE.clone(),
            Term::Resource(rdf::BAG.clone()),
        ))
        .unwrap();
        assert!(g.floating_containers().contains(&res("bnode:c")));

        g.insert(Triple::new(
            res("http://e/s"),
            res("http://e/p"),
            Term::Resource(res("bnode:c")),
        ))
        .unwrap();
        assert!(!g.floating_containers().contains(&res("bnode:c")));
    }
}
