//! Error kinds surfaced to callers of the graph, (de)serialization, and query APIs.

use thiserror::Error;

use crate::graph::container::ItemKind;

/// Top-level error type returned by every fallible public operation.
#[derive(Debug, Error)]
pub enum RdfError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid utf-8 in document: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid regular expression: {0}")]
    Regex(#[from] regex::Error),
}

/// Invalid RDF: bad URIs, mixed-kind containers, XML shape violations.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid URI or blank node identifier: {0:?}")]
    InvalidUri(String),

    #[error("container item kind mismatch: expected {expected:?}, got {actual:?}")]
    MixedContainerItemKind { expected: ItemKind, actual: ItemKind },

    #[error("duplicate item in rdf:Alt container: {0}")]
    DuplicateAltItem(String),

    #[error("malformed RDF/XML: {0}")]
    MalformedXml(String),

    #[error("cyclic rdf:rest chain detected starting at {0}")]
    CyclicCollection(String),
}

/// Null data source, or an otherwise ill-formed query structure.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query data source is null")]
    NullSource,

    #[error("ill-formed query: {0}")]
    IllFormed(String),

    #[error("join exceeded the configured maximum of {0} rows")]
    TooManyRows(usize),
}

/// Backend I/O or schema problems, wrapped with the underlying message.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StoreError {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn wrap(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

pub type Result<T> = std::result::Result<T, RdfError>;
