//! The RDF term model (component A): resources, blank nodes, and literals.

mod datatype;

pub use datatype::Datatype;

use std::fmt;

use crate::error::ModelError;

/// Prefix used to encode blank node identifiers in the internal string form.
///
/// See §6 of the specification: blank nodes are `bnode:<id>` internally and
/// appear as bare identifiers inside `rdf:nodeID`/`nodeID` on the wire.
pub const BLANK_PREFIX: &str = "bnode:";

/// A resource: either an absolute (or document-relative, pre-resolution) URI,
/// or a blank node identified by the `bnode:` prefix convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Resource(String);

impl Resource {
    /// Builds a resource from a URI string. Blank nodes must already carry
    /// the `bnode:` prefix; use [`Resource::blank`] to construct one from a
    /// bare local identifier, or [`crate::graph::Graph::fresh_blank`] to mint
    /// one scoped to a particular graph's own counter.
    pub fn new(uri: impl Into<String>) -> Result<Self, ModelError> {
        let uri = uri.into();
        if uri.is_empty() || uri.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ModelError::InvalidUri(uri));
        }
        Ok(Resource(uri))
    }

    /// Builds a blank node resource from a bare local identifier (no `bnode:` prefix).
    pub fn blank(local_id: impl AsRef<str>) -> Self {
        Resource(format!("{}{}", BLANK_PREFIX, local_id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.starts_with(BLANK_PREFIX)
    }

    /// The blank node's bare local identifier, stripped of the `bnode:` prefix,
    /// or `None` if this resource is not a blank node.
    pub fn blank_local_id(&self) -> Option<&str> {
        self.0.strip_prefix(BLANK_PREFIX)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Resource {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A plain (untyped) literal with an optional BCP-47 language tag.
/// An empty language tag means "no language".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlainLiteral {
    pub value: String,
    pub lang: String,
}

impl PlainLiteral {
    pub fn new(value: impl Into<String>, lang: impl Into<String>) -> Self {
        PlainLiteral {
            value: value.into(),
            lang: lang.into(),
        }
    }

    pub fn has_lang(&self) -> bool {
        !self.lang.is_empty()
    }

    /// Case-insensitive BCP-47 language comparison, as required by §3:
    /// "language tag comparison is case-insensitive per BCP-47, but kept as given".
    pub fn lang_eq(&self, other: &str) -> bool {
        self.lang.eq_ignore_ascii_case(other)
    }
}

/// A literal with an explicit datatype drawn from the closed vocabulary in [`Datatype`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedLiteral {
    pub value: String,
    pub datatype: Datatype,
}

impl TypedLiteral {
    pub fn new(value: impl Into<String>, datatype: Datatype) -> Self {
        TypedLiteral {
            value: value.into(),
            datatype,
        }
    }
}

/// A tagged union over the three term kinds, replacing runtime type-testing
/// ("is Resource", "is Literal") with exhaustive matching (§9).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Resource(Resource),
    Plain(PlainLiteral),
    Typed(TypedLiteral),
}

impl Term {
    pub fn is_resource(&self) -> bool {
        matches!(self, Term::Resource(_))
    }

    pub fn is_literal(&self) -> bool {
        !self.is_resource()
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Resource(r) if r.is_blank())
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Term::Resource(r) => Some(r),
            _ => None,
        }
    }

    /// The term's lexical string form, used by namespace collection (§4.B)
    /// and literal datatype comparisons.
    pub fn lexical(&self) -> &str {
        match self {
            Term::Resource(r) => r.as_str(),
            Term::Plain(l) => &l.value,
            Term::Typed(l) => &l.value,
        }
    }
}

impl From<Resource> for Term {
    fn from(r: Resource) -> Self {
        Term::Resource(r)
    }
}

impl From<PlainLiteral> for Term {
    fn from(l: PlainLiteral) -> Self {
        Term::Plain(l)
    }
}

impl From<TypedLiteral> for Term {
    fn from(l: TypedLiteral) -> Self {
        Term::Typed(l)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Resource(r) => write!(f, "{r}"),
            Term::Plain(l) if l.has_lang() => write!(f, "\"{}\"@{}", l.value, l.lang),
            Term::Plain(l) => write!(f, "\"{}\"", l.value),
            Term::Typed(l) => write!(f, "\"{}\"^^<{}>", l.value, l.datatype.iri()),
        }
    }
}
