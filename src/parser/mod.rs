//! RDF/XML deserialization (component D).

pub mod xml;

pub use xml::XmlParser;
