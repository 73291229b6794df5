//! Process-wide namespace registry (component H) and the well-known
//! `rdf:`/`rdfs:`/`xsd:` namespace modules.
//!
//! Readers are metadata collection, serialization, and deserialization;
//! writers are explicit registration calls and deserialization of documents
//! that declare new `xmlns:*` prefixes. Guarded by an `RwLock` per §5.

use std::collections::HashMap;
use std::sync::RwLock;

use lazy_static::lazy_static;

pub const RDF_URI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_URI: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD_URI: &str = "http://www.w3.org/2001/XMLSchema#";
pub const XML_URI: &str = "http://www.w3.org/XML/1998/namespace#";

/// A namespace: a prefix bound to a URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace {
    pub prefix: String,
    pub uri: String,
}

/// The shared, lock-guarded prefix<->URI table (component H).
pub struct NamespaceRegistry {
    inner: RwLock<HashMap<String, String>>,
}

impl NamespaceRegistry {
    fn new() -> Self {
        let registry = NamespaceRegistry {
            inner: RwLock::new(HashMap::new()),
        };
        registry.register("rdf", RDF_URI);
        registry.register("rdfs", RDFS_URI);
        registry.register("xsd", XSD_URI);
        registry
    }

    /// Registers (or re-binds) a prefix to a URI in the shared table.
    pub fn register(&self, prefix: &str, uri: &str) {
        self.inner
            .write()
            .expect("namespace registry lock poisoned")
            .insert(prefix.to_string(), uri.to_string());
    }

    pub fn lookup_uri(&self, prefix: &str) -> Option<String> {
        self.inner
            .read()
            .expect("namespace registry lock poisoned")
            .get(prefix)
            .cloned()
    }

    /// Reverse lookup: the first prefix currently bound to this URI, if any.
    pub fn lookup_prefix(&self, uri: &str) -> Option<String> {
        self.inner
            .read()
            .expect("namespace registry lock poisoned")
            .iter()
            .find(|(_, v)| v.as_str() == uri)
            .map(|(k, _)| k.clone())
    }

    /// All namespaces currently registered, as a snapshot.
    pub fn all(&self) -> Vec<Namespace> {
        self.inner
            .read()
            .expect("namespace registry lock poisoned")
            .iter()
            .map(|(prefix, uri)| Namespace {
                prefix: prefix.clone(),
                uri: uri.clone(),
            })
            .collect()
    }
}

lazy_static! {
    /// The process-wide namespace registry.
    pub static ref REGISTRY: NamespaceRegistry = NamespaceRegistry::new();
}

/// Well-known RDF vocabulary terms.
pub mod rdf {
    use crate::term::Resource;
    use lazy_static::lazy_static;

    use super::RDF_URI;

    lazy_static! {
        pub static ref TYPE: Resource = Resource::new(format!("{RDF_URI}type")).unwrap();
        pub static ref BAG: Resource = Resource::new(format!("{RDF_URI}Bag")).unwrap();
        pub static ref SEQ: Resource = Resource::new(format!("{RDF_URI}Seq")).unwrap();
        pub static ref ALT: Resource = Resource::new(format!("{RDF_URI}Alt")).unwrap();
        pub static ref LIST: Resource = Resource::new(format!("{RDF_URI}List")).unwrap();
        pub static ref FIRST: Resource = Resource::new(format!("{RDF_URI}first")).unwrap();
        pub static ref REST: Resource = Resource::new(format!("{RDF_URI}rest")).unwrap();
        pub static ref NIL: Resource = Resource::new(format!("{RDF_URI}nil")).unwrap();
        pub static ref DESCRIPTION: Resource =
            Resource::new(format!("{RDF_URI}Description")).unwrap();
        pub static ref LI: Resource = Resource::new(format!("{RDF_URI}li")).unwrap();
        pub static ref SUBJECT: Resource = Resource::new(format!("{RDF_URI}subject")).unwrap();
        pub static ref PREDICATE: Resource = Resource::new(format!("{RDF_URI}predicate")).unwrap();
        pub static ref OBJECT: Resource = Resource::new(format!("{RDF_URI}object")).unwrap();
        pub static ref STATEMENT: Resource = Resource::new(format!("{RDF_URI}Statement")).unwrap();
    }

    /// `rdf:_<n>`, the numbered container membership predicate.
    pub fn li_n(index: usize) -> Resource {
        Resource::new(format!("{RDF_URI}_{index}")).unwrap()
    }
}

/// Well-known RDF Schema vocabulary terms.
pub mod rdfs {
    use crate::term::Resource;
    use lazy_static::lazy_static;

    use super::RDFS_URI;

    lazy_static! {
        pub static ref LITERAL: Resource = Resource::new(format!("{RDFS_URI}Literal")).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_prefixes_are_preregistered() {
        assert_eq!(REGISTRY.lookup_uri("rdf").as_deref(), Some(RDF_URI));
        assert_eq!(REGISTRY.lookup_uri("xsd").as_deref(), Some(XSD_URI));
    }

    #[test]
    fn register_is_idempotent_for_the_same_binding() {
        REGISTRY.register("ex", "http://example.org/");
        REGISTRY.register("ex", "http://example.org/");
        assert_eq!(
            REGISTRY.lookup_uri("ex").as_deref(),
            Some("http://example.org/")
        );
    }
}
