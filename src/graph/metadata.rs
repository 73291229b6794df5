//! The graph metadata collector (component B): namespaces, container
//! subjects, and collection node chains, rebuilt incrementally on every
//! triple insertion.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::graph::container::{ContainerKind, ItemKind};
use crate::ns::{Namespace, REGISTRY};
use crate::term::{Datatype, Resource, Term};
use crate::triple::{Flavor, Triple};

/// One cell of a collection (`rdf:first`/`rdf:rest` cons chain).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionItem {
    pub item_type: ItemKind,
    pub item_value: Option<Term>,
    pub next: Option<Resource>,
}

impl Default for CollectionItem {
    fn default() -> Self {
        CollectionItem {
            item_type: ItemKind::Resource,
            item_value: None,
            next: None,
        }
    }
}

/// Derived metadata about a [`Graph`](super::Graph), rebuilt on every
/// insertion per §4.B.
#[derive(Debug, Clone, Default)]
pub struct GraphMetadata {
    namespaces: HashSet<Namespace>,
    containers: HashMap<Resource, ContainerKind>,
    collections: HashMap<Resource, CollectionItem>,
}

impl GraphMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.namespaces.clear();
        self.containers.clear();
        self.collections.clear();
    }

    pub fn namespaces(&self) -> &HashSet<Namespace> {
        &self.namespaces
    }

    pub fn containers(&self) -> &HashMap<Resource, ContainerKind> {
        &self.containers
    }

    pub fn collections(&self) -> &HashMap<Resource, CollectionItem> {
        &self.collections
    }

    /// Applies the three update rules of §4.B, in order, for one inserted
    /// triple. Idempotent: re-applying the same triple is a no-op in effect.
    pub fn update(&mut self, triple: &Triple) {
        self.collect_namespaces(triple);
        self.collect_container(triple);
        self.collect_collection(triple);
    }

    fn collect_namespaces(&mut self, triple: &Triple) {
        let object_str = match triple.flavor() {
            Flavor::Spo => Some(triple.object.lexical()),
            Flavor::Spl => None,
        };
        let datatype_uri = match &triple.object {
            Term::Typed(l) => Some(l.datatype.iri()),
            _ => None,
        };

        let components: [Option<&str>; 4] = [
            Some(triple.subject.as_str()),
            Some(triple.predicate.as_str()),
            object_str,
            datatype_uri,
        ];

        // Open question (i) in §9: substring containment can match spurious
        // infixes. Preserved as specified, not "fixed" to be stricter.
        for ns in REGISTRY.all() {
            let matches = components.iter().flatten().any(|component| {
                component.contains(ns.uri.as_str()) || component.starts_with(&format!("{}:", ns.prefix))
            });
            if matches {
                self.namespaces.insert(ns);
            }
        }
    }

    fn collect_container(&mut self, triple: &Triple) {
        use crate::ns::rdf;

        if triple.flavor() != Flavor::Spo || triple.predicate != *rdf::TYPE {
            return;
        }
        let Term::Resource(object) = &triple.object else {
            return;
        };
        let kind = if *object == *rdf::BAG {
            ContainerKind::Bag
        } else if *object == *rdf::SEQ {
            ContainerKind::Seq
        } else if *object == *rdf::ALT {
            ContainerKind::Alt
        } else {
            return;
        };
        self.containers.entry(triple.subject.clone()).or_insert(kind);
    }

    fn collect_collection(&mut self, triple: &Triple) {
        use crate::ns::rdf;

        if triple.predicate == *rdf::TYPE {
            if let Term::Resource(object) = &triple.object {
                if *object == *rdf::LIST {
                    self.collections
                        .entry(triple.subject.clone())
                        .or_insert_with(CollectionItem::default);
                }
            }
            return;
        }

        if triple.predicate == *rdf::FIRST {
            if let Some(cell) = self.collections.get_mut(&triple.subject) {
                cell.item_type = ItemKind::of(&triple.object);
                cell.item_value = Some(triple.object.clone());
            }
            return;
        }

        if triple.predicate == *rdf::REST {
            if let Term::Resource(next) = &triple.object {
                if let Some(cell) = self.collections.get_mut(&triple.subject) {
                    cell.next = Some(next.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ns::rdf;
    use crate::term::PlainLiteral;

    fn res(s: &str) -> Resource {
        Resource::new(s).unwrap()
    }

    #[test]
    fn container_collection_records_kind_once() {
        let mut meta = GraphMetadata::new();
        let t = Triple::new(
            res("bnode:c"),
            rdf::TYPE.clone(),
            Term::Resource(rdf::BAG.clone()),
        );
        meta.update(&t);
        meta.update(&t);
        assert_eq!(meta.containers().get(&res("bnode:c")), Some(&ContainerKind::Bag));
        assert_eq!(meta.containers().len(), 1);
    }

    #[test]
    fn collection_chain_is_assembled_from_three_triples_per_cell() {
        let mut meta = GraphMetadata::new();
        let head = res("bnode:h");
        meta.update(&Triple::new(
            head.clone(),
            rdf::TYPE.clone(),
            Term::Resource(rdf::LIST.clone()),
        ));
        meta.update(&Triple::new(
            head.clone(),
            rdf::FIRST.clone(),
            Term::Resource(res("http://example.org/a")),
        ));
        meta.update(&Triple::new(
            head.clone(),
            rdf::REST.clone(),
            Term::Resource(rdf::NIL.clone()),
        ));

        let cell = meta.collections().get(&head).unwrap();
        assert_eq!(cell.item_type, ItemKind::Resource);
        assert_eq!(cell.next.as_ref(), Some(&*rdf::NIL));
    }

    #[test]
    fn update_is_idempotent() {
        let mut meta = GraphMetadata::new();
        let t = Triple::new(
            res("http://example.org/s"),
            res("http://example.org/p"),
            Term::Plain(PlainLiteral::new("v", "")),
        );
        meta.update(&t);
        let snapshot = meta.clone();
        meta.update(&t);
        assert_eq!(meta.namespaces(), snapshot.namespaces());
        assert_eq!(meta.containers(), snapshot.containers());
    }
}
