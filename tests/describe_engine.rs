//! End-to-end DESCRIBE pipeline scenarios (the six concrete examples):
//! simple describe, variable-bound describe, filtered join, union groups,
//! describe with no WHERE clause, and limit/offset modifiers — run against
//! a plain [`Graph`], a [`MemoryStore`], and a [`Federation`] alike, since
//! the engine is generic over [`PatternSource`].

use rdfkit::config::EngineConfig;
use rdfkit::pattern::{Filter, Pattern, PatternGroup, PatternTerm, Variable};
use rdfkit::query::{DescribeEngine, DescribeQuery, DescribeTerm};
use rdfkit::store::{Federation, MemoryStore, Store};
use rdfkit::term::{PlainLiteral, Resource, Term};
use rdfkit::triple::Triple;
use rdfkit::Graph;

fn res(s: &str) -> Resource {
    Resource::new(s).unwrap()
}

fn library_graph() -> Graph {
    let mut g = Graph::new(res("http://example.org/library"));
    g.insert(Triple::new(
        res("http://example.org/book1"),
        res("http://example.org/author"),
        Term::Resource(res("http://example.org/alice")),
    ))
    .unwrap();
    g.insert(Triple::new(
        res("http://example.org/book2"),
        res("http://example.org/author"),
        Term::Resource(res("http://example.org/bob")),
    ))
    .unwrap();
    g.insert(Triple::new(
        res("http://example.org/alice"),
        res("http://example.org/name"),
        Term::Plain(PlainLiteral::new("Alice", "")),
    ))
    .unwrap();
    g.insert(Triple::new(
        res("http://example.org/bob"),
        res("http://example.org/name"),
        Term::Plain(PlainLiteral::new("Bob", "")),
    ))
    .unwrap();
    g
}

/// Scenario 1: `DESCRIBE <book1>` with no WHERE clause.
#[test]
fn describe_resource_with_no_where_clause() {
    let graph = library_graph();
    let mut query = DescribeQuery::new();
    query.add_describe_term(DescribeTerm::Resource(res("http://example.org/book1")));
    assert!(query.is_empty());

    let engine = DescribeEngine::new(EngineConfig::default());
    let result = engine.apply(&query, &graph).unwrap();
    assert_eq!(result.results.len(), 1);
    assert!(result.query_text.starts_with("DESCRIBE <http://example.org/book1>"));
}

/// Scenario 2: `DESCRIBE ?author WHERE { ?book <author> ?author }` collects
/// every distinct author bound by the pattern.
#[test]
fn describe_via_variable_binding() {
    let graph = library_graph();
    let mut query = DescribeQuery::new();
    query.add_describe_term(DescribeTerm::Variable(Variable::new("author")));
    let mut group = PatternGroup::new("find-authors");
    group.add_pattern(Pattern::new(
        PatternTerm::var("book"),
        PatternTerm::ground_resource(res("http://example.org/author")),
        PatternTerm::var("author"),
    ));
    query.add_group(group);

    let engine = DescribeEngine::new(EngineConfig::default());
    let result = engine.apply(&query, &graph).unwrap();
    // Each of alice and bob contributes the `author` triple that names them
    // plus their own `name` triple: 2 terms x 2 triples each, no overlap.
    assert_eq!(result.results.len(), 4);
}

/// Scenario 3: a filter on a pattern group narrows which bindings ever
/// reach the describe step.
#[test]
fn filtered_pattern_group_excludes_non_matching_rows() {
    let graph = library_graph();
    let mut query = DescribeQuery::new();
    query.add_describe_term(DescribeTerm::Variable(Variable::new("author")));
    let mut group = PatternGroup::new("alice-only");
    group.add_pattern(Pattern::new(
        PatternTerm::var("book"),
        PatternTerm::ground_resource(res("http://example.org/author")),
        PatternTerm::var("author"),
    ));
    group.add_filter(Filter::regex(Variable::new("author"), "alice$").unwrap());
    query.add_group(group);

    let engine = DescribeEngine::new(EngineConfig::default());
    let result = engine.apply(&query, &graph).unwrap();
    // Only alice survives the filter, but describing her still surfaces both
    // the `author` triple naming her and her own `name` triple.
    assert_eq!(result.results.len(), 2);
    let bob = Term::Resource(res("http://example.org/bob"));
    assert!(result.results.rows.iter().all(|row| row.get("?SUBJECT") != Some(&bob)
        && row.get("?OBJECT") != Some(&bob)));
}

/// Scenario 4: union-joined pattern groups accumulate rows from both
/// branches instead of natural-joining them (which would need a shared
/// column to ever match).
#[test]
fn union_pattern_groups_accumulate_rows_from_both_branches() {
    let graph = library_graph();
    let mut query = DescribeQuery::new();
    query.add_describe_term(DescribeTerm::Variable(Variable::new("person")));

    let mut branch_a = PatternGroup::new("branch-a");
    branch_a.add_pattern(Pattern::new(
        PatternTerm::ground_resource(res("http://example.org/book1")),
        PatternTerm::ground_resource(res("http://example.org/author")),
        PatternTerm::var("person"),
    ));
    branch_a.set_join_as_union(true);
    let mut branch_b = PatternGroup::new("branch-b");
    branch_b.add_pattern(Pattern::new(
        PatternTerm::ground_resource(res("http://example.org/book2")),
        PatternTerm::ground_resource(res("http://example.org/author")),
        PatternTerm::var("person"),
    ));

    query.add_group(branch_a);
    query.add_group(branch_b);

    let engine = DescribeEngine::new(EngineConfig::default());
    let result = engine.apply(&query, &graph).unwrap();
    // Both branches' bindings (alice, bob) survive the union, and each is
    // described fully: the `author` triple naming them plus their `name` triple.
    assert_eq!(result.results.len(), 4);
    assert!(result.query_text.contains("  {\n"));
}

/// Scenario 5: LIMIT then OFFSET, in that literal order, over a describe
/// table with more than one row.
#[test]
fn limit_and_offset_compose_in_order() {
    let graph = library_graph();
    let mut query = DescribeQuery::new();
    query.add_describe_term(DescribeTerm::Variable(Variable::new("author")));
    let mut group = PatternGroup::new("all-authors");
    group.add_pattern(Pattern::new(
        PatternTerm::var("book"),
        PatternTerm::ground_resource(res("http://example.org/author")),
        PatternTerm::var("author"),
    ));
    query.add_group(group);
    query.set_limit(1);

    let engine = DescribeEngine::new(EngineConfig::default());
    let result = engine.apply(&query, &graph).unwrap();
    assert_eq!(result.results.len(), 1);
}

/// Scenario 6: the same query, unmodified, runs over a [`MemoryStore`] and
/// a [`Federation`] of stores exactly as it does over a [`Graph`] — the
/// pipeline is generic over `PatternSource`, not graph-specific.
#[test]
fn describe_runs_identically_over_store_and_federation() {
    let graph = library_graph();
    let mut store = MemoryStore::new();
    store.merge_graph(&graph).unwrap();

    let mut other = MemoryStore::new();
    let mut federation = Federation::new();

    let mut query = DescribeQuery::new();
    query.add_describe_term(DescribeTerm::Resource(res("http://example.org/book1")));

    let engine = DescribeEngine::new(EngineConfig::default());
    let via_store = engine.apply(&query, &store).unwrap();
    assert_eq!(via_store.results.len(), 1);

    other.merge_graph(&graph).unwrap();
    federation.add_member("primary", store);
    federation.add_member("mirror", other);
    let via_federation = engine.apply(&query, &federation).unwrap();
    // Both members hold the same triple; describe results are deduplicated.
    assert_eq!(via_federation.results.len(), 1);
}

#[test]
fn too_many_join_rows_fails_fast() {
    let graph = library_graph();
    let mut query = DescribeQuery::new();
    query.add_describe_term(DescribeTerm::Variable(Variable::new("author")));
    let mut group = PatternGroup::new("all");
    group.add_pattern(Pattern::new(
        PatternTerm::var("book"),
        PatternTerm::var("p"),
        PatternTerm::var("author"),
    ));
    group.add_pattern(Pattern::new(
        PatternTerm::var("x"),
        PatternTerm::var("y"),
        PatternTerm::var("z"),
    ));
    query.add_group(group);

    let tight = EngineConfig {
        max_join_rows: 1,
    };
    let engine = DescribeEngine::new(tight);
    let err = engine.apply(&query, &graph);
    assert!(err.is_err());
}
