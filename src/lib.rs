//! An RDF graph model, RDF/XML reader and writer, and a SPARQL DESCRIBE
//! query engine over graphs, quadruple stores, and store federations.

pub mod config;
pub mod error;
pub mod graph;
pub mod ns;
pub mod parser;
pub mod pattern;
pub mod query;
pub mod serializer;
pub mod store;
pub mod term;
pub mod triple;

pub use config::{EngineConfig, XmlConfig};
pub use error::{ModelError, QueryError, RdfError, Result, StoreError};
pub use graph::Graph;
pub use parser::XmlParser;
pub use query::{DescribeEngine, DescribeQuery, DescribeQueryResult, DescribeTerm, PatternSource};
pub use serializer::XmlSerializer;
pub use store::{Federation, MemoryStore, Selector, Store};
pub use term::{Datatype, PlainLiteral, Resource, Term, TypedLiteral};
pub use triple::{Quadruple, Triple};
