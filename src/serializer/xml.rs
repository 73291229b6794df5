//! RDF/XML serializer (component C): renders a [`Graph`] to a UTF-8 XML
//! document via a two-pass algorithm — build an element tree keyed by
//! subject, then write it with `quick_xml`'s event-based [`Writer`] — since
//! containers and collections are only discovered through the predicate
//! that references them.

use std::collections::{HashMap, HashSet};
use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::XmlConfig;
use crate::error::Result;
use crate::graph::container::ItemKind;
use crate::graph::Graph;
use crate::ns::{self, rdf};
use crate::term::{Datatype, Resource, Term};
use crate::triple::{Flavor, Triple};

/// A pre-built element, independent of `quick_xml`'s borrowed event types,
/// so a container or collection sequence can be assembled once and spliced
/// into whichever subject element references it.
enum XmlNode {
    Element {
        qname: String,
        xmlns: Vec<(String, String)>,
        attrs: Vec<(String, String)>,
        children: Vec<XmlNode>,
    },
    Text(String),
}

impl XmlNode {
    fn element(qname: impl Into<String>) -> Self {
        XmlNode::Element {
            qname: qname.into(),
            xmlns: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let XmlNode::Element { attrs, .. } = &mut self {
            attrs.push((key.into(), value.into()));
        }
        self
    }

    fn with_xmlns(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        if let XmlNode::Element { xmlns, .. } = &mut self {
            xmlns.push((prefix.into(), uri.into()));
        }
        self
    }

    fn push_child(&mut self, child: XmlNode) {
        if let XmlNode::Element { children, .. } = self {
            children.push(child);
        }
    }
}

/// Mints opaque prefixes for predicate namespaces with no registered
/// binding, per §4.C step 5.
struct AutoNamespaces {
    declared: HashMap<String, String>,
    counter: usize,
}

impl AutoNamespaces {
    fn new() -> Self {
        AutoNamespaces {
            declared: HashMap::new(),
            counter: 0,
        }
    }

    /// Resolves `uri` (the predicate's namespace component) to a qname
    /// prefix, registering a fresh opaque one if none is already known.
    /// Returns `(prefix, is_fresh)`.
    fn resolve(&mut self, uri: &str) -> (String, bool) {
        if let Some(prefix) = ns::REGISTRY.lookup_prefix(uri) {
            return (prefix, false);
        }
        if let Some(prefix) = self.declared.iter().find(|(_, u)| u.as_str() == uri) {
            return (prefix.0.clone(), false);
        }
        self.counter += 1;
        let prefix = format!("ns{}", self.counter);
        self.declared.insert(prefix.clone(), uri.to_string());
        (prefix, true)
    }
}

/// Splits a predicate/type URI into (namespace, localname) at the last `#`
/// or `/`, the conventional RDF/XML split point.
fn split_uri(uri: &str) -> (String, String) {
    match uri.rfind(['#', '/']) {
        Some(i) => (uri[..=i].to_string(), uri[i + 1..].to_string()),
        None => (String::new(), uri.to_string()),
    }
}

/// Resolves a predicate (or rdf:type object) URI to an XML qname, minting
/// and declaring an opaque `nsN` prefix when the namespace isn't already
/// known to the registry. When the namespace can't be split into a
/// non-empty local name, falls back to the configured auto-prefix local-name
/// convention the deserializer reverses (§4.C/§4.D).
fn resolve_qname(uri: &str, auto: &mut AutoNamespaces, auto_prefix: &str) -> (String, Option<(String, String)>) {
    let (namespace, local) = split_uri(uri);
    let (prefix, is_fresh) = auto.resolve(&namespace);
    let local = if local.is_empty() { auto_prefix.to_string() } else { local };
    let qname = format!("{prefix}:{local}");
    let xmlns_decl = if is_fresh { Some((prefix, namespace)) } else { None };
    (qname, xmlns_decl)
}

fn strip_blank_prefix(r: &Resource) -> (&str, bool) {
    match r.blank_local_id() {
        Some(id) => (id, true),
        None => (r.as_str(), false),
    }
}

pub struct XmlSerializer {
    config: XmlConfig,
}

impl XmlSerializer {
    pub fn new(config: XmlConfig) -> Self {
        XmlSerializer { config }
    }

    pub fn serialize(&self, graph: &Graph) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write(graph, &mut buf)?;
        Ok(buf)
    }

    /// Strips `config.base_uri` as a prefix when present, so absolute URIs
    /// under the base are emitted relative (§4.C step 1/5.c reversed by the
    /// deserializer's `xml:base` resolution).
    fn relativize(&self, uri: &str) -> String {
        match &self.config.base_uri {
            Some(base) if !base.is_empty() && uri.starts_with(base.as_str()) => uri[base.len()..].to_string(),
            _ => uri.to_string(),
        }
    }

    pub fn write<W: Write>(&self, graph: &Graph, sink: W) -> Result<()> {
        let tree = self.build_tree(graph);
        let mut writer = if self.config.pretty {
            Writer::new_with_indent(sink, b' ', 2)
        } else {
            Writer::new(sink)
        };
        write_node(&mut writer, &tree)?;
        Ok(())
    }

    /// Pass 1 (§4.C steps 1-4, 6): groups triples by subject, classifies
    /// each subject, and assembles the full root `rdf:RDF` element tree.
    fn build_tree(&self, graph: &Graph) -> XmlNode {
        let metadata = graph.metadata();
        let floating_containers = graph.floating_containers();
        let floating_collections = graph.floating_collections();

        let mut groups: HashMap<Resource, Vec<&Triple>> = HashMap::new();
        for triple in graph.triples() {
            groups.entry(triple.subject.clone()).or_default().push(triple);
        }
        let mut subjects: Vec<&Resource> = groups.keys().collect();
        subjects.sort();

        let mut auto = AutoNamespaces::new();
        let mut root = XmlNode::element("rdf:RDF").with_xmlns("rdf", ns::RDF_URI);
        if let XmlNode::Element { xmlns, attrs, .. } = &mut root {
            for ns_entry in metadata.namespaces() {
                if ns_entry.prefix != "rdf" && ns_entry.prefix != "base" {
                    xmlns.push((ns_entry.prefix.clone(), ns_entry.uri.clone()));
                }
            }
            let base_attr = self.config.base_uri.clone().unwrap_or_else(|| {
                if graph.context().is_blank() {
                    String::new()
                } else {
                    graph.context().as_str().to_string()
                }
            });
            if !base_attr.is_empty() {
                attrs.push(("xml:base".to_string(), base_attr));
            }
        }

        // Side dictionary: container subject -> its rendered (not yet
        // attached) element, populated while walking subjects (§4.C step 4).
        let mut containers: HashMap<Resource, XmlNode> = HashMap::new();
        let mut root_elements: Vec<(Resource, XmlNode)> = Vec::new();

        for subject in subjects {
            let triples = &groups[subject];
            let is_container = metadata.containers().get(subject).copied();
            let is_collection_head = self.config.abbreviate_collections
                && metadata
                    .collections()
                    .get(subject)
                    .filter(|cell| cell.item_type == ItemKind::Resource)
                    .is_some();

            if let Some(kind) = is_container {
                if !floating_containers.contains(subject) {
                    let element = self.build_subject_element(
                        subject,
                        triples,
                        metadata,
                        &floating_containers,
                        &floating_collections,
                        &containers,
                        &mut auto,
                        true,
                        Some(kind.type_resource()),
                    );
                    containers.insert(subject.clone(), element);
                    continue;
                }
            }

            if is_collection_head && !floating_collections.contains(subject) {
                // Reconstructed inline wherever referenced; not written standalone.
                continue;
            }

            let element = self.build_subject_element(
                subject,
                triples,
                metadata,
                &floating_containers,
                &floating_collections,
                &containers,
                &mut auto,
                false,
                None,
            );
            root_elements.push((subject.clone(), element));
        }

        if let XmlNode::Element { children, .. } = &mut root {
            for (_, element) in root_elements {
                children.push(element);
            }
        }
        root
    }

    /// Builds one subject's element: a `rdf:Bag|Seq|Alt` shell
    /// (`is_container_shell`) or an `rdf:Description`, with its predicate
    /// children (§4.C step 5).
    #[allow(clippy::too_many_arguments)]
    fn build_subject_element(
        &self,
        subject: &Resource,
        triples: &[&Triple],
        metadata: &crate::graph::GraphMetadata,
        floating_containers: &HashSet<Resource>,
        floating_collections: &HashSet<Resource>,
        containers: &HashMap<Resource, XmlNode>,
        auto: &mut AutoNamespaces,
        is_container_shell: bool,
        container_type: Option<Resource>,
    ) -> XmlNode {
        let qname = match &container_type {
            Some(type_resource) if type_resource == &*rdf::BAG => "rdf:Bag",
            Some(type_resource) if type_resource == &*rdf::SEQ => "rdf:Seq",
            Some(type_resource) if type_resource == &*rdf::ALT => "rdf:Alt",
            _ => "rdf:Description",
        };
        let mut element = XmlNode::element(qname);
        let (id, is_blank) = strip_blank_prefix(subject);
        element = if is_blank {
            element.with_attr("rdf:nodeID", id)
        } else {
            element.with_attr("rdf:about", self.relativize(id))
        };

        for triple in triples {
            if is_container_shell && triple.predicate == *rdf::TYPE {
                continue;
            }
            let child = self.build_predicate_child(
                triple,
                metadata,
                floating_containers,
                floating_collections,
                containers,
                auto,
            );
            element.push_child(child);
        }
        element
    }

    /// Builds the `<predicate>` child element for one triple, rendering its
    /// object per the priority order in §4.C step 5.
    fn build_predicate_child(
        &self,
        triple: &Triple,
        metadata: &crate::graph::GraphMetadata,
        floating_containers: &HashSet<Resource>,
        floating_collections: &HashSet<Resource>,
        containers: &HashMap<Resource, XmlNode>,
        auto: &mut AutoNamespaces,
    ) -> XmlNode {
        let (qname, xmlns_decl) = resolve_qname(triple.predicate.as_str(), auto, &self.config.auto_prefix);
        let mut element = XmlNode::element(qname);
        if let Some((prefix, uri)) = xmlns_decl {
            element = element.with_xmlns(prefix, uri);
        }

        match &triple.object {
            Term::Resource(object) if metadata.containers().contains_key(object) && !floating_containers.contains(object) => {
                if let Some(container_element) = containers.get(object) {
                    element.push_child(clone_node(container_element));
                }
            }
            Term::Resource(object)
                if self.config.abbreviate_collections
                    && metadata
                        .collections()
                        .get(object)
                        .filter(|cell| cell.item_type == ItemKind::Resource)
                        .is_some()
                    && !floating_collections.contains(object) =>
            {
                element = element.with_attr("rdf:parseType", "Collection");
                for item_node in self.build_collection_sequence(object, metadata) {
                    element.push_child(item_node);
                }
            }
            Term::Resource(object) => {
                let (id, is_blank) = strip_blank_prefix(object);
                element = if is_blank {
                    element.with_attr("rdf:nodeID", id)
                } else {
                    element.with_attr("rdf:resource", self.relativize(id))
                };
            }
            Term::Plain(literal) => {
                if literal.has_lang() {
                    element = element.with_attr("xml:lang", literal.lang.clone());
                }
                element.push_child(XmlNode::Text(literal.value.clone()));
            }
            Term::Typed(literal) => {
                element = element.with_attr("rdf:datatype", literal.datatype.iri().to_string());
                element.push_child(XmlNode::Text(literal.value.clone()));
            }
        }
        element
    }

    /// Walks `rdf:first`/`rdf:rest` from `head` until `rdf:nil`, rendering
    /// one child element per item (§4.C step 5.b). Bounded by the chain's
    /// own length, same cycle guard idea as the deserializer's traversal.
    fn build_collection_sequence(&self, head: &Resource, metadata: &crate::graph::GraphMetadata) -> Vec<XmlNode> {
        let mut items = Vec::new();
        let mut visited = HashSet::new();
        let mut current = head.clone();
        while current != *rdf::NIL {
            if !visited.insert(current.clone()) {
                break;
            }
            let Some(cell) = metadata.collections().get(&current) else {
                break;
            };
            if let Some(value) = &cell.item_value {
                items.push(self.build_item_node(value));
            }
            match &cell.next {
                Some(next) => current = next.clone(),
                None => break,
            }
        }
        items
    }

    /// Renders one collection item as an `rdf:Description` child (§4.D
    /// collection expansion reversed: a resource item carries `rdf:about`/
    /// `rdf:nodeID`, a literal item carries its lexical form as text).
    fn build_item_node(&self, term: &Term) -> XmlNode {
        match term {
            Term::Resource(r) => {
                let (id, is_blank) = strip_blank_prefix(r);
                let node = XmlNode::element("rdf:Description");
                if is_blank {
                    node.with_attr("rdf:nodeID", id)
                } else {
                    node.with_attr("rdf:about", self.relativize(id))
                }
            }
            Term::Plain(l) => {
                let mut node = XmlNode::element("rdf:Description");
                if l.has_lang() {
                    node = node.with_attr("xml:lang", l.lang.clone());
                }
                node.push_child(XmlNode::Text(l.value.clone()));
                node
            }
            Term::Typed(l) => {
                let mut node =
                    XmlNode::element("rdf:Description").with_attr("rdf:datatype", l.datatype.iri().to_string());
                node.push_child(XmlNode::Text(l.value.clone()));
                node
            }
        }
    }
}

fn clone_node(node: &XmlNode) -> XmlNode {
    match node {
        XmlNode::Text(t) => XmlNode::Text(t.clone()),
        XmlNode::Element { qname, xmlns, attrs, children } => XmlNode::Element {
            qname: qname.clone(),
            xmlns: xmlns.clone(),
            attrs: attrs.clone(),
            children: children.iter().map(clone_node).collect(),
        },
    }
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &XmlNode) -> Result<()> {
    match node {
        XmlNode::Text(text) => {
            if !text.is_empty() {
                writer.write_event(Event::Text(BytesText::from_plain_str(text)))?;
            }
            Ok(())
        }
        XmlNode::Element { qname, xmlns, attrs, children } => {
            let name = qname.as_bytes();
            if children.is_empty() {
                let mut start = BytesStart::borrowed_name(name);
                push_attrs(&mut start, xmlns, attrs);
                writer.write_event(Event::Empty(start))?;
            } else {
                let mut start = BytesStart::borrowed_name(name);
                push_attrs(&mut start, xmlns, attrs);
                writer.write_event(Event::Start(start))?;
                for child in children {
                    write_node(writer, child)?;
                }
                writer.write_event(Event::End(BytesEnd::borrowed(name)))?;
            }
            Ok(())
        }
    }
}

fn push_attrs(start: &mut BytesStart, xmlns: &[(String, String)], attrs: &[(String, String)]) {
    for (prefix, uri) in xmlns {
        let key = if prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{prefix}")
        };
        start.push_attribute((key.as_str(), uri.as_str()));
    }
    for (key, value) in attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }
}
