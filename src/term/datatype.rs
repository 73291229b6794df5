//! The closed datatype vocabulary for typed literals (xsd:* plus rdfs:Literal).

use std::fmt;

use lazy_static::lazy_static;

use crate::ns::{RDFS_URI, XSD_URI};

lazy_static! {
    static ref XSD_STRING: String = format!("{XSD_URI}string");
    static ref XSD_BOOLEAN: String = format!("{XSD_URI}boolean");
    static ref XSD_DECIMAL: String = format!("{XSD_URI}decimal");
    static ref XSD_INTEGER: String = format!("{XSD_URI}integer");
    static ref XSD_INT: String = format!("{XSD_URI}int");
    static ref XSD_LONG: String = format!("{XSD_URI}long");
    static ref XSD_SHORT: String = format!("{XSD_URI}short");
    static ref XSD_BYTE: String = format!("{XSD_URI}byte");
    static ref XSD_NON_NEGATIVE_INTEGER: String = format!("{XSD_URI}nonNegativeInteger");
    static ref XSD_DOUBLE: String = format!("{XSD_URI}double");
    static ref XSD_FLOAT: String = format!("{XSD_URI}float");
    static ref XSD_DATE: String = format!("{XSD_URI}date");
    static ref XSD_DATE_TIME: String = format!("{XSD_URI}dateTime");
    static ref XSD_TIME: String = format!("{XSD_URI}time");
    static ref XSD_ANY_URI: String = format!("{XSD_URI}anyURI");
    static ref RDFS_LITERAL: String = format!("{RDFS_URI}Literal");
}

/// A symbolic datatype, round-trippable to and from its URI form (§6).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Datatype {
    XsdString,
    XsdBoolean,
    XsdDecimal,
    XsdInteger,
    XsdInt,
    XsdLong,
    XsdShort,
    XsdByte,
    XsdNonNegativeInteger,
    XsdDouble,
    XsdFloat,
    XsdDate,
    XsdDateTime,
    XsdTime,
    XsdAnyUri,
    RdfsLiteral,
    /// Any datatype URI outside the closed enumeration above. The enumeration
    /// covers the common xsd:* family plus rdfs:Literal; anything else
    /// encountered while parsing a document is preserved verbatim rather than
    /// rejected, so that round-tripping an unusual `rdf:datatype` value
    /// never loses information.
    Other(String),
}

impl Datatype {
    pub fn iri(&self) -> &str {
        match self {
            Datatype::XsdString => &XSD_STRING,
            Datatype::XsdBoolean => &XSD_BOOLEAN,
            Datatype::XsdDecimal => &XSD_DECIMAL,
            Datatype::XsdInteger => &XSD_INTEGER,
            Datatype::XsdInt => &XSD_INT,
            Datatype::XsdLong => &XSD_LONG,
            Datatype::XsdShort => &XSD_SHORT,
            Datatype::XsdByte => &XSD_BYTE,
            Datatype::XsdNonNegativeInteger => &XSD_NON_NEGATIVE_INTEGER,
            Datatype::XsdDouble => &XSD_DOUBLE,
            Datatype::XsdFloat => &XSD_FLOAT,
            Datatype::XsdDate => &XSD_DATE,
            Datatype::XsdDateTime => &XSD_DATE_TIME,
            Datatype::XsdTime => &XSD_TIME,
            Datatype::XsdAnyUri => &XSD_ANY_URI,
            Datatype::RdfsLiteral => &RDFS_LITERAL,
            Datatype::Other(uri) => uri,
        }
    }

    pub fn from_iri(iri: &str) -> Self {
        if iri == XSD_STRING.as_str() {
            Datatype::XsdString
        } else if iri == XSD_BOOLEAN.as_str() {
            Datatype::XsdBoolean
        } else if iri == XSD_DECIMAL.as_str() {
            Datatype::XsdDecimal
        } else if iri == XSD_INTEGER.as_str() {
            Datatype::XsdInteger
        } else if iri == XSD_INT.as_str() {
            Datatype::XsdInt
        } else if iri == XSD_LONG.as_str() {
            Datatype::XsdLong
        } else if iri == XSD_SHORT.as_str() {
            Datatype::XsdShort
        } else if iri == XSD_BYTE.as_str() {
            Datatype::XsdByte
        } else if iri == XSD_NON_NEGATIVE_INTEGER.as_str() {
            Datatype::XsdNonNegativeInteger
        } else if iri == XSD_DOUBLE.as_str() {
            Datatype::XsdDouble
        } else if iri == XSD_FLOAT.as_str() {
            Datatype::XsdFloat
        } else if iri == XSD_DATE.as_str() {
            Datatype::XsdDate
        } else if iri == XSD_DATE_TIME.as_str() {
            Datatype::XsdDateTime
        } else if iri == XSD_TIME.as_str() {
            Datatype::XsdTime
        } else if iri == XSD_ANY_URI.as_str() {
            Datatype::XsdAnyUri
        } else if iri == RDFS_LITERAL.as_str() {
            Datatype::RdfsLiteral
        } else {
            Datatype::Other(iri.to_string())
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iri())
    }
}
