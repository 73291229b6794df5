//! RDF/XML deserializer (component D): loads the document into a small,
//! local DOM via `quick_xml::Reader`, then walks that DOM recursively,
//! expanding container and collection abbreviations back into triples.

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use url::Url;

use crate::config::XmlConfig;
use crate::error::{ModelError, Result};
use crate::graph::container::ContainerKind;
use crate::graph::Graph;
use crate::ns::{self, rdf};
use crate::term::{Datatype, PlainLiteral, Resource, Term, TypedLiteral};
use crate::triple::Triple;

/// One element of the locally-built DOM: its raw (unresolved) qname, its
/// attributes as raw qname/value pairs, and its children.
#[derive(Debug, Clone)]
struct DomElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<DomNode>,
}

#[derive(Debug, Clone)]
enum DomNode {
    Element(DomElement),
    Text(String),
}

fn attach(stack: &mut [DomElement], root: &mut Option<DomElement>, node: DomNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if let DomNode::Element(e) = node {
                *root = Some(e);
            }
        }
    }
}

fn dom_element_from_start<R: BufRead>(e: &BytesStart, reader: &Reader<R>) -> Result<DomElement> {
    let name = String::from_utf8(e.name().to_vec())
        .map_err(|_| ModelError::MalformedXml("non-UTF-8 element name".to_string()))?;
    let mut attrs = Vec::new();
    for attr in e.attributes().with_checks(true) {
        let attr = attr.map_err(|e| ModelError::MalformedXml(format!("bad attribute: {e}")))?;
        let key = String::from_utf8(attr.key.to_vec())
            .map_err(|_| ModelError::MalformedXml("non-UTF-8 attribute name".to_string()))?;
        let value = attr
            .unescape_and_decode_value(reader)
            .map_err(|e| ModelError::MalformedXml(format!("bad attribute value: {e}")))?;
        attrs.push((key, value));
    }
    Ok(DomElement {
        name,
        attrs,
        children: Vec::new(),
    })
}

/// Builds the document's element tree. The owned `reader` is dropped when
/// this function returns on either path, success or error (§9 Open Question
/// (iii): the input stream must not be left open past deserialization).
fn build_dom<R: BufRead>(mut reader: Reader<R>) -> Result<DomElement> {
    let mut buf = Vec::new();
    let mut stack: Vec<DomElement> = Vec::new();
    let mut root: Option<DomElement> = None;

    loop {
        let event = reader
            .read_event(&mut buf)
            .map_err(|e| ModelError::MalformedXml(format!("XML read error: {e}")))?;
        match event {
            Event::Start(ref e) => {
                let elem = dom_element_from_start(e, &reader)?;
                stack.push(elem);
            }
            Event::Empty(ref e) => {
                let elem = dom_element_from_start(e, &reader)?;
                attach(&mut stack, &mut root, DomNode::Element(elem));
            }
            Event::End(_) => {
                let elem = stack
                    .pop()
                    .ok_or_else(|| ModelError::MalformedXml("unbalanced closing tag".to_string()))?;
                attach(&mut stack, &mut root, DomNode::Element(elem));
            }
            Event::Text(ref t) => {
                let text = t
                    .unescape_and_decode(&reader)
                    .map_err(|e| ModelError::MalformedXml(format!("bad text content: {e}")))?;
                if !text.is_empty() {
                    if let Some(top) = stack.last_mut() {
                        top.children.push(DomNode::Text(text));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    root.ok_or_else(|| ModelError::MalformedXml("empty document".to_string()).into())
}

type Scope = HashMap<String, String>;

fn child_scope(parent: &Scope, attrs: &[(String, String)]) -> Scope {
    let mut scope = parent.clone();
    for (key, value) in attrs {
        if key == "xmlns" {
            scope.insert(String::new(), value.clone());
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.insert(prefix.to_string(), value.clone());
        }
    }
    scope
}

/// Resolves a raw qname against `scope`, falling back to the process-wide
/// registry for prefixes the document didn't declare itself (§4.H
/// document-scoped overlay: document bindings never leak into the shared
/// registry, but well-known prefixes remain visible through it).
fn resolve_qname(qname: &str, scope: &Scope) -> (String, String) {
    match qname.split_once(':') {
        Some((prefix, local)) => {
            let uri = scope
                .get(prefix)
                .cloned()
                .or_else(|| ns::REGISTRY.lookup_uri(prefix))
                .unwrap_or_default();
            (uri, local.to_string())
        }
        None => (scope.get("").cloned().unwrap_or_default(), qname.to_string()),
    }
}

fn find_attr<'a>(attrs: &'a [(String, String)], keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| attrs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str()))
}

fn element_text(element: &DomElement) -> String {
    element
        .children
        .iter()
        .filter_map(|c| match c {
            DomNode::Text(t) => Some(t.as_str()),
            DomNode::Element(_) => None,
        })
        .collect::<Vec<_>>()
        .join("")
}

/// A crude re-rendering of an element's children as XML text, used for
/// `rdf:parseType="Literal"` values where the original markup (not its
/// triple interpretation) is the literal's lexical form.
fn render_inner_xml(element: &DomElement) -> String {
    let mut out = String::new();
    for child in &element.children {
        render_node_xml(child, &mut out);
    }
    out
}

fn render_node_xml(node: &DomNode, out: &mut String) {
    match node {
        DomNode::Text(t) => out.push_str(t),
        DomNode::Element(e) => {
            out.push('<');
            out.push_str(&e.name);
            for (k, v) in &e.attrs {
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                out.push_str(v);
                out.push('"');
            }
            if e.children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for c in &e.children {
                    render_node_xml(c, out);
                }
                out.push_str("</");
                out.push_str(&e.name);
                out.push('>');
            }
        }
    }
}

/// Resolves a possibly-relative URI against `base`, per §4.D: absolute
/// values pass through, everything else is resolved as a relative
/// reference.
fn resolve_uri(value: &str, base: &str) -> String {
    if let Ok(absolute) = Url::parse(value) {
        return absolute.into();
    }
    if let Ok(base_url) = Url::parse(base) {
        if let Ok(joined) = base_url.join(value) {
            return joined.into();
        }
    }
    format!("{base}{value}")
}

fn is_description(name: &str, namespace_uri: &str, local: &str) -> bool {
    name == "rdf:Description" || name == "Description" || (namespace_uri == ns::RDF_URI && local == "Description")
}

fn container_kind_of(name: &str, scope: &Scope) -> Option<ContainerKind> {
    let (namespace_uri, local) = resolve_qname(name, scope);
    let namespace_uri = if namespace_uri.is_empty() { ns::RDF_URI.to_string() } else { namespace_uri };
    if namespace_uri != ns::RDF_URI {
        return None;
    }
    match local.as_str() {
        "Bag" => Some(ContainerKind::Bag),
        "Seq" => Some(ContainerKind::Seq),
        "Alt" => Some(ContainerKind::Alt),
        _ => None,
    }
}

/// Resolves one container or collection item element to a term, per the
/// same priority as a predicate's object (resource attribute, else
/// datatype, else plain literal) — §4.D container/collection expansion.
fn resolve_item_term(item: &DomElement, base: &str) -> Result<Term> {
    if let Some(v) = find_attr(&item.attrs, &["rdf:resource", "resource", "rdf:about", "about"]) {
        return Ok(Term::Resource(Resource::new(resolve_uri(v, base))?));
    }
    if let Some(v) = find_attr(&item.attrs, &["rdf:nodeID", "nodeID"]) {
        return Ok(Term::Resource(Resource::blank(v)));
    }
    if let Some(dt) = find_attr(&item.attrs, &["rdf:datatype", "datatype"]) {
        return Ok(Term::Typed(TypedLiteral::new(element_text(item), Datatype::from_iri(dt))));
    }
    let lang = find_attr(&item.attrs, &["xml:lang"]).unwrap_or("");
    Ok(Term::Plain(PlainLiteral::new(element_text(item), lang)))
}

/// Expands `rdf:parseType="Collection"` into a `rdf:first`/`rdf:rest` cons
/// chain terminated by `rdf:nil` (§4.D collection expansion). An empty
/// collection is represented directly as `rdf:nil`, never an empty chain.
fn expand_collection(graph: &mut Graph, subject: &Resource, predicate: &Resource, element: &DomElement, base: &str) -> Result<()> {
    let items: Vec<&DomElement> = element
        .children
        .iter()
        .filter_map(|c| match c {
            DomNode::Element(e) => Some(e),
            DomNode::Text(_) => None,
        })
        .collect();

    if items.is_empty() {
        graph.insert(Triple::new(subject.clone(), predicate.clone(), Term::Resource(rdf::NIL.clone())))?;
        return Ok(());
    }

    let head = graph.fresh_blank();
    graph.insert(Triple::new(subject.clone(), predicate.clone(), Term::Resource(head.clone())))?;

    let mut current = head;
    for (i, item) in items.iter().enumerate() {
        let value = resolve_item_term(item, base)?;
        graph.insert(Triple::new(current.clone(), rdf::TYPE.clone(), Term::Resource(rdf::LIST.clone())))?;
        graph.insert(Triple::new(current.clone(), rdf::FIRST.clone(), value))?;
        let next = if i + 1 == items.len() { rdf::NIL.clone() } else { graph.fresh_blank() };
        graph.insert(Triple::new(current.clone(), rdf::REST.clone(), Term::Resource(next.clone())))?;
        current = next;
    }
    Ok(())
}

/// Expands a bare `rdf:Bag|Seq|Alt` child into its reification (§4.D
/// container expansion). `Alt` items are de-duplicated by value equality.
fn expand_container(
    graph: &mut Graph,
    subject: &Resource,
    predicate: &Resource,
    kind: ContainerKind,
    container_element: &DomElement,
    base: &str,
) -> Result<()> {
    let bnode = graph.fresh_blank();
    graph.insert(Triple::new(subject.clone(), predicate.clone(), Term::Resource(bnode.clone())))?;
    graph.insert(Triple::new(bnode.clone(), rdf::TYPE.clone(), Term::Resource(kind.type_resource())))?;

    let mut seen = Vec::new();
    for item_elem in container_element.children.iter().filter_map(|c| match c {
        DomNode::Element(e) => Some(e),
        DomNode::Text(_) => None,
    }) {
        let local = item_elem.name.rsplit(':').next().unwrap_or(&item_elem.name);
        let Some(index_str) = local.strip_prefix('_') else {
            continue;
        };
        let Ok(index) = index_str.parse::<usize>() else {
            continue;
        };
        let value = resolve_item_term(item_elem, base)?;
        if kind == ContainerKind::Alt {
            if seen.contains(&value) {
                continue;
            }
            seen.push(value.clone());
        }
        graph.insert(Triple::new(bnode.clone(), rdf::li_n(index), value))?;
    }
    Ok(())
}

fn process_predicate(
    graph: &mut Graph,
    subject: &Resource,
    element: &DomElement,
    parent_scope: &Scope,
    base: &str,
    auto_prefix: &str,
) -> Result<()> {
    let scope = child_scope(parent_scope, &element.attrs);
    let (namespace_uri, local) = resolve_qname(&element.name, &scope);
    let namespace_uri = if namespace_uri.is_empty() { base.to_string() } else { namespace_uri };
    let predicate = if local.starts_with(auto_prefix) {
        Resource::new(namespace_uri)?
    } else {
        Resource::new(format!("{namespace_uri}{local}"))?
    };

    // 1. resource/nodeID attributes.
    if let Some(v) = find_attr(&element.attrs, &["rdf:resource", "resource", "rdf:about", "about"]) {
        let object = Resource::new(resolve_uri(v, base))?;
        graph.insert(Triple::new(subject.clone(), predicate, Term::Resource(object)))?;
        return Ok(());
    }
    if let Some(v) = find_attr(&element.attrs, &["rdf:nodeID", "nodeID"]) {
        graph.insert(Triple::new(subject.clone(), predicate, Term::Resource(Resource::blank(v))))?;
        return Ok(());
    }

    // 2. rdf:datatype.
    if let Some(dt) = find_attr(&element.attrs, &["rdf:datatype", "datatype"]) {
        let text = element_text(element);
        graph.insert(Triple::new(subject.clone(), predicate, Term::Typed(TypedLiteral::new(text, Datatype::from_iri(dt)))))?;
        return Ok(());
    }

    // 3. rdf:parseType="Literal".
    if find_attr(&element.attrs, &["rdf:parseType", "parseType"]) == Some("Literal") {
        let inner = render_inner_xml(element);
        graph.insert(Triple::new(subject.clone(), predicate, Term::Typed(TypedLiteral::new(inner, Datatype::RdfsLiteral))))?;
        return Ok(());
    }

    // 4. xml:lang present, or exactly one text child.
    let lang_attr = find_attr(&element.attrs, &["xml:lang"]);
    let only_text = element.children.len() == 1 && matches!(element.children.first(), Some(DomNode::Text(_)));
    if lang_attr.is_some() || only_text {
        let text = element_text(element);
        graph.insert(Triple::new(subject.clone(), predicate, Term::Plain(PlainLiteral::new(text, lang_attr.unwrap_or("")))))?;
        return Ok(());
    }

    // 5. rdf:parseType="Collection".
    if find_attr(&element.attrs, &["rdf:parseType", "parseType"]) == Some("Collection") {
        expand_collection(graph, subject, &predicate, element, base)?;
        return Ok(());
    }

    // 6. first child is a bare or prefixed rdf:Bag|Seq|Alt with no attributes.
    if let Some(first_child) = element.children.iter().find_map(|c| match c {
        DomNode::Element(e) => Some(e),
        DomNode::Text(_) => None,
    }) {
        if first_child.attrs.is_empty() {
            if let Some(kind) = container_kind_of(&first_child.name, &scope) {
                expand_container(graph, subject, &predicate, kind, first_child, base)?;
            }
        }
    }
    Ok(())
}

fn extract_subject(graph: &Graph, element: &DomElement, base: &str, is_description: bool) -> Result<Option<Resource>> {
    if let Some(v) = find_attr(&element.attrs, &["rdf:about", "about"]) {
        return Ok(Some(Resource::new(resolve_uri(v, base))?));
    }
    if let Some(v) = find_attr(&element.attrs, &["rdf:nodeID", "nodeID"]) {
        return Ok(Some(Resource::blank(v)));
    }
    if let Some(v) = find_attr(&element.attrs, &["rdf:ID", "ID"]) {
        return Ok(Some(Resource::new(format!("{}#{}", base.trim_end_matches('#'), v))?));
    }
    if is_description {
        return Ok(Some(graph.fresh_blank()));
    }
    Ok(None)
}

fn process_subject(graph: &mut Graph, element: &DomElement, parent_scope: &Scope, base: &str, auto_prefix: &str) -> Result<()> {
    let scope = child_scope(parent_scope, &element.attrs);
    let (namespace_uri, local) = resolve_qname(&element.name, &scope);
    let description = is_description(&element.name, &namespace_uri, &local);

    let Some(subject) = extract_subject(graph, element, base, description)? else {
        return Ok(());
    };

    if !description {
        let namespace_uri = if namespace_uri.is_empty() { base.to_string() } else { namespace_uri };
        let type_object = Resource::new(format!("{namespace_uri}{local}"))?;
        graph.insert(Triple::new(subject.clone(), rdf::TYPE.clone(), Term::Resource(type_object)))?;
    }

    for child in &element.children {
        if let DomNode::Element(predicate_element) = child {
            process_predicate(graph, &subject, predicate_element, &scope, base, auto_prefix)?;
        }
    }
    Ok(())
}

/// Parses RDF/XML documents into [`Graph`]s.
#[derive(Debug, Clone, Default)]
pub struct XmlParser {
    config: XmlConfig,
}

impl XmlParser {
    /// A parser using [`XmlConfig::default`], notably its `"autoNS"`
    /// auto-prefix convention.
    pub fn new() -> Self {
        XmlParser::default()
    }

    pub fn with_config(config: XmlConfig) -> Self {
        XmlParser { config }
    }

    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Graph> {
        let mut graph = Graph::anonymous();
        self.parse_into(reader, &mut graph)?;
        Ok(graph)
    }

    pub fn parse_str(&self, text: &str) -> Result<Graph> {
        self.parse(text.as_bytes())
    }

    /// Parses into an existing graph, preserving its current `Context` as
    /// the fallback base IRI (§4.D step 3) unless the document overrides it
    /// with `xml:base`.
    pub fn parse_into<R: BufRead>(&self, reader: R, graph: &mut Graph) -> Result<()> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.trim_text(true);
        let root = build_dom(xml_reader)?;

        let root_scope = child_scope(&Scope::new(), &root.attrs);
        let (root_ns, root_local) = resolve_qname(&root.name, &root_scope);
        if !(root.name == "rdf:RDF" || root.name == "RDF" || (root_ns == ns::RDF_URI && root_local == "RDF")) {
            return Err(ModelError::MalformedXml("missing rdf:RDF root element".to_string()).into());
        }

        let base = find_attr(&root.attrs, &["xml:base"])
            .or_else(|| find_attr(&root.attrs, &["xmlns"]))
            .map(str::to_string)
            .or_else(|| self.config.base_uri.clone())
            .unwrap_or_else(|| graph.context().as_str().to_string());
        if find_attr(&root.attrs, &["xml:base"]).is_some() {
            graph.set_context(Resource::new(base.clone())?);
        }

        for child in &root.children {
            if let DomNode::Element(subject_element) = child {
                process_subject(graph, subject_element, &root_scope, &base, &self.config.auto_prefix)?;
            }
        }
        Ok(())
    }
}
