//! RDF containers (Bag/Seq/Alt) and their reification (§3).

use crate::error::ModelError;
use crate::ns::rdf;
use crate::term::{Resource, Term};
use crate::triple::Triple;

/// The kind of container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Bag,
    Seq,
    Alt,
}

impl ContainerKind {
    pub fn type_resource(&self) -> Resource {
        match self {
            ContainerKind::Bag => rdf::BAG.clone(),
            ContainerKind::Seq => rdf::SEQ.clone(),
            ContainerKind::Alt => rdf::ALT.clone(),
        }
    }
}

/// Whether a container or collection's items are resources or literals.
/// All items in a single container/collection must share one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Resource,
    Literal,
}

impl ItemKind {
    pub fn of(term: &Term) -> Self {
        if term.is_resource() {
            ItemKind::Resource
        } else {
            ItemKind::Literal
        }
    }
}

/// A typed sequence of items, all of the same [`ItemKind`] (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub subject: Resource,
    pub kind: ContainerKind,
    items: Vec<Term>,
    item_kind: Option<ItemKind>,
}

impl Container {
    pub fn new(subject: Resource, kind: ContainerKind) -> Self {
        Container {
            subject,
            kind,
            items: Vec::new(),
            item_kind: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Term] {
        &self.items
    }

    /// Appends an item, enforcing the single-item-kind invariant and, for
    /// `Alt`, value-equality deduplication (§3, §8 scenario 2).
    pub fn push(&mut self, item: Term) -> Result<(), ModelError> {
        let kind = ItemKind::of(&item);
        match self.item_kind {
            None => self.item_kind = Some(kind),
            Some(expected) if expected != kind => {
                return Err(ModelError::MixedContainerItemKind {
                    expected,
                    actual: kind,
                })
            }
            _ => {}
        }

        if self.kind == ContainerKind::Alt && self.items.contains(&item) {
            return Err(ModelError::DuplicateAltItem(item.to_string()));
        }

        self.items.push(item);
        Ok(())
    }

    /// For `Alt`, pushes only if the item is not already present; otherwise
    /// silently no-ops instead of erroring. Used by the deserializer, which
    /// must de-duplicate rather than reject (§4.D container expansion).
    pub fn push_dedup(&mut self, item: Term) -> Result<(), ModelError> {
        if self.kind == ContainerKind::Alt && self.items.contains(&item) {
            return Ok(());
        }
        self.push(item)
    }

    /// Emits `(C, rdf:type, rdf:K)` and `(C, rdf:_j, iⱼ)` for j=1..n.
    /// With zero items, only the `rdf:type` triple is produced (§8).
    pub fn reify(&self) -> Vec<Triple> {
        let mut triples = Vec::with_capacity(1 + self.items.len());
        triples.push(Triple::new(
            self.subject.clone(),
            rdf::TYPE.clone(),
            Term::Resource(self.kind.type_resource()),
        ));
        for (i, item) in self.items.iter().enumerate() {
            triples.push(Triple::new(
                self.subject.clone(),
                rdf::li_n(i + 1),
                item.clone(),
            ));
        }
        triples
    }
}
