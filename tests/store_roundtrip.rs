//! Store round-trip property (§8): `extract_graphs(merge_graph(g))` yields
//! back a graph with the same triples and context `g` started with, and a
//! multi-context store extracts one graph per context.

use rdfkit::store::{MemoryStore, Store};
use rdfkit::term::{PlainLiteral, Resource, Term};
use rdfkit::triple::Triple;
use rdfkit::Graph;

fn res(s: &str) -> Resource {
    Resource::new(s).unwrap()
}

#[test]
fn merge_then_extract_preserves_a_single_graphs_triples_and_context() {
    let mut graph = Graph::new(res("http://example.org/ctx"));
    graph
        .insert(Triple::new(
            res("http://example.org/s1"),
            res("http://example.org/p"),
            Term::Resource(res("http://example.org/o1")),
        ))
        .unwrap();
    graph
        .insert(Triple::new(
            res("http://example.org/s2"),
            res("http://example.org/p"),
            Term::Plain(PlainLiteral::new("v", "en")),
        ))
        .unwrap();

    let mut store = MemoryStore::new();
    store.merge_graph(&graph).unwrap();

    let mut extracted = store.extract_graphs().unwrap();
    assert_eq!(extracted.len(), 1);
    let round_tripped = extracted.pop().unwrap();
    assert_eq!(round_tripped.context(), graph.context());
    assert_eq!(round_tripped.len(), graph.len());
    for triple in graph.triples() {
        assert!(round_tripped.contains(triple));
    }
}

#[test]
fn merging_two_contexts_extracts_two_separate_graphs() {
    let mut graph_a = Graph::new(res("http://example.org/a"));
    graph_a
        .insert(Triple::new(
            res("http://example.org/s"),
            res("http://example.org/p"),
            Term::Resource(res("http://example.org/o")),
        ))
        .unwrap();

    let mut graph_b = Graph::new(res("http://example.org/b"));
    graph_b
        .insert(Triple::new(
            res("http://example.org/s"),
            res("http://example.org/p"),
            Term::Resource(res("http://example.org/o")),
        ))
        .unwrap();

    let mut store = MemoryStore::new();
    store.merge_graph(&graph_a).unwrap();
    store.merge_graph(&graph_b).unwrap();

    let extracted = store.extract_graphs().unwrap();
    assert_eq!(extracted.len(), 2);
    let contexts: Vec<&Resource> = extracted.iter().map(|g| g.context()).collect();
    assert!(contexts.contains(&graph_a.context()));
    assert!(contexts.contains(&graph_b.context()));
}

#[test]
fn merging_the_same_graph_twice_does_not_duplicate_quadruples() {
    let mut graph = Graph::new(res("http://example.org/ctx"));
    graph
        .insert(Triple::new(
            res("http://example.org/s"),
            res("http://example.org/p"),
            Term::Resource(res("http://example.org/o")),
        ))
        .unwrap();

    let mut store = MemoryStore::new();
    store.merge_graph(&graph).unwrap();
    store.merge_graph(&graph).unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn remove_by_context_drops_only_that_contexts_quadruples() {
    let mut graph_a = Graph::new(res("http://example.org/a"));
    graph_a
        .insert(Triple::new(
            res("http://example.org/s"),
            res("http://example.org/p"),
            Term::Resource(res("http://example.org/o")),
        ))
        .unwrap();
    let mut graph_b = Graph::new(res("http://example.org/b"));
    graph_b
        .insert(Triple::new(
            res("http://example.org/s2"),
            res("http://example.org/p"),
            Term::Resource(res("http://example.org/o2")),
        ))
        .unwrap();

    let mut store = MemoryStore::new();
    store.merge_graph(&graph_a).unwrap();
    store.merge_graph(&graph_b).unwrap();

    let removed = store.remove_by_context(&res("http://example.org/a")).unwrap();
    assert_eq!(removed, 1);
    assert_eq!(store.len(), 1);
    let remaining = store.extract_graphs().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].context(), graph_b.context());
}
