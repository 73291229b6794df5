//! Ambient configuration (component K): knobs the engine and the RDF/XML
//! writer accept explicitly rather than reading from global state.

/// Tuning for the DESCRIBE engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// A safety valve, not a cost-based optimizer: once a join's row count
    /// would exceed this, the engine fails fast with
    /// [`crate::error::QueryError::TooManyRows`] rather than building an
    /// unbounded intermediate table.
    pub max_join_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_join_rows: 1_000_000,
        }
    }
}

/// Tuning for the RDF/XML writer.
#[derive(Debug, Clone)]
pub struct XmlConfig {
    /// Base IRI used to relativize resource URIs on write, and to resolve
    /// relative URIs and `rdf:ID` on read. `None` means write/keep absolute
    /// forms.
    pub base_uri: Option<String>,
    /// Pretty-print with indentation instead of compact output.
    pub pretty: bool,
    /// Abbreviate `rdf:first`/`rdf:rest` chains as `rdf:parseType="Collection"`
    /// on write. Has no effect on read, which always expands explicitly.
    pub abbreviate_collections: bool,
    /// The literal local-name the writer substitutes when a predicate's
    /// namespace can't be split into a non-empty local part, and the reader
    /// looks for to reverse that substitution (§4.C/§4.D).
    pub auto_prefix: String,
}

impl Default for XmlConfig {
    fn default() -> Self {
        XmlConfig {
            base_uri: None,
            pretty: true,
            abbreviate_collections: true,
            auto_prefix: "autoNS".to_string(),
        }
    }
}
