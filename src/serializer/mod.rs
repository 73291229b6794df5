//! RDF/XML serialization (component C).

pub mod xml;

pub use xml::XmlSerializer;
