//! Triples and quadruples (§3), with a stable, deterministic quadruple ID.

use crate::term::{Resource, Term};

/// Which kind of object a triple carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    /// Subject-Predicate-Object: object is a resource.
    Spo,
    /// Subject-Predicate-Literal: object is a literal.
    Spl,
}

/// An ordered (subject, predicate, object) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Resource,
    pub predicate: Resource,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Resource, predicate: Resource, object: impl Into<Term>) -> Self {
        Triple {
            subject,
            predicate,
            object: object.into(),
        }
    }

    pub fn flavor(&self) -> Flavor {
        match &self.object {
            Term::Resource(_) => Flavor::Spo,
            _ => Flavor::Spl,
        }
    }
}

/// A numeric quadruple identifier, stable across processes (§3).
pub type QuadrupleId = i64;

/// A named-graph quadruple: (context, subject, predicate, object).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quadruple {
    pub context: Resource,
    pub subject: Resource,
    pub predicate: Resource,
    pub object: Term,
}

impl Quadruple {
    pub fn new(
        context: Resource,
        subject: Resource,
        predicate: Resource,
        object: impl Into<Term>,
    ) -> Self {
        Quadruple {
            context,
            subject,
            predicate,
            object: object.into(),
        }
    }

    pub fn from_triple(context: Resource, triple: Triple) -> Self {
        Quadruple {
            context,
            subject: triple.subject,
            predicate: triple.predicate,
            object: triple.object,
        }
    }

    pub fn flavor(&self) -> Flavor {
        match &self.object {
            Term::Resource(_) => Flavor::Spo,
            _ => Flavor::Spl,
        }
    }

    pub fn as_triple(&self) -> Triple {
        Triple {
            subject: self.subject.clone(),
            predicate: self.predicate.clone(),
            object: self.object.clone(),
        }
    }

    /// The quadruple's stable 64-bit ID: a deterministic hash of
    /// `ctx + " " + subj + " " + pred + " " + obj`.
    pub fn id(&self) -> QuadrupleId {
        quadruple_id(
            self.context.as_str(),
            self.subject.as_str(),
            self.predicate.as_str(),
            &self.object.to_string(),
        )
    }
}

/// FNV-1a, 64-bit: simple, dependency-free, and deterministic across
/// processes and platforms, unlike `std`'s randomized `SipHash`.
fn fnv1a64(s: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET_BASIS;
    for byte in s.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// A pure function of the four string forms, per the stability invariant in §8.
pub fn quadruple_id(ctx: &str, subject: &str, predicate: &str, object: &str) -> QuadrupleId {
    let combined = format!("{ctx} {subject} {predicate} {object}");
    fnv1a64(&combined) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::PlainLiteral;

    fn r(s: &str) -> Resource {
        Resource::new(s).unwrap()
    }

    #[test]
    fn quadruple_id_is_deterministic() {
        let q = Quadruple::new(
            r("http://example.org/g"),
            r("http://example.org/s"),
            r("http://example.org/p"),
            Term::Plain(PlainLiteral::new("o", "")),
        );
        let id1 = q.id();
        let id2 = q.id();
        assert_eq!(id1, id2);

        let id3 = quadruple_id(
            "http://example.org/g",
            "http://example.org/s",
            "http://example.org/p",
            "\"o\"",
        );
        assert_eq!(id1, id3);
    }

    #[test]
    fn flavor_reflects_object_kind() {
        let spo = Triple::new(r("s"), r("p"), Term::Resource(r("o")));
        assert_eq!(spo.flavor(), Flavor::Spo);
        let spl = Triple::new(r("s"), r("p"), Term::Plain(PlainLiteral::new("o", "")));
        assert_eq!(spl.flavor(), Flavor::Spl);
    }
}
