//! The DESCRIBE engine (§4.F): runs the Evaluate -> Combine -> Filter ->
//! Join -> Describe -> Modify pipeline against any [`PatternSource`].

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::error::{QueryError, Result};
use crate::pattern::PatternGroup;
use crate::term::Term;
use crate::triple::Triple;

use super::describe::{DescribeQuery, DescribeTerm};
use super::source::PatternSource;
use super::table::{DataTable, Row};

/// The result of running a [`DescribeQuery`]: the rendered query text plus
/// the `?SUBJECT ?PREDICATE ?OBJECT` describe table (§4.F contract).
#[derive(Debug, Clone)]
pub struct DescribeQueryResult {
    pub query_text: String,
    pub results: DataTable,
}

/// Runs [`DescribeQuery`]s against a [`PatternSource`].
#[derive(Debug, Clone)]
pub struct DescribeEngine {
    config: EngineConfig,
}

impl DescribeEngine {
    pub fn new(config: EngineConfig) -> Self {
        DescribeEngine { config }
    }

    /// `apply_to_graph`/`apply_to_store`/`apply_to_federation` in §4.F are
    /// all this one method, generic over [`PatternSource`]: the three data
    /// sources differ only in how `evaluate`/`describe` are implemented, not
    /// in how the pipeline composes their results.
    #[instrument(skip(self, query, source))]
    pub fn apply<S: PatternSource>(&self, query: &DescribeQuery, source: &S) -> Result<DescribeQueryResult> {
        let group_tables = self.evaluate_and_combine(query, source)?;
        let query_table = self.join_groups(&group_tables)?;
        let described = self.describe_terms(query, source, &query_table)?;
        let modified = self.apply_modifiers(query, described);

        Ok(DescribeQueryResult {
            query_text: query.to_query_text(),
            results: modified,
        })
    }

    /// Steps 2.a-2.c: per group, evaluate each pattern, natural-join them
    /// together, then drop rows that fail any filter.
    fn evaluate_and_combine<S: PatternSource>(
        &self,
        query: &DescribeQuery,
        source: &S,
    ) -> Result<Vec<(PatternGroup, DataTable)>> {
        let mut out = Vec::new();
        for group in query.groups().iter() {
            let mut pattern_tables = Vec::with_capacity(group.patterns.len());
            for pattern in &group.patterns {
                pattern_tables.push(source.evaluate(pattern)?);
            }

            let mut combined = match pattern_tables.first() {
                Some(first) => first.clone(),
                None => DataTable::new(Vec::new()),
            };
            for table in &pattern_tables[1..] {
                combined = combined.natural_join(table);
                self.check_row_budget(&combined)?;
            }

            let filtered = combined.filter_rows(|row: &Row| group.filters.iter().all(|f| f.evaluate(row)));
            debug!(group = %group.name, rows = filtered.len(), "combined pattern group");
            out.push((group.clone(), filtered));
        }
        Ok(out)
    }

    /// Step 3: fold group tables left to right. A group whose own
    /// `joinAsUnion` flag is set unions its table with the *next* group's
    /// table; all other joins are natural joins (§4.F step 3).
    fn join_groups(&self, group_tables: &[(PatternGroup, DataTable)]) -> Result<DataTable> {
        let mut iter = group_tables.iter();
        let mut accumulated = match iter.next() {
            Some((_, table)) => table.clone(),
            None => return Ok(DataTable::new(Vec::new())),
        };

        let mut prev_union = group_tables[0].0.join_as_union;
        for (group, table) in iter {
            if prev_union {
                accumulated = accumulated.union(table);
            } else {
                accumulated = accumulated.natural_join(table);
            }
            self.check_row_budget(&accumulated)?;
            prev_union = group.join_as_union;
        }
        Ok(accumulated)
    }

    fn check_row_budget(&self, table: &DataTable) -> Result<()> {
        if table.len() > self.config.max_join_rows {
            return Err(QueryError::TooManyRows(self.config.max_join_rows).into());
        }
        Ok(())
    }

    /// Step 4: collect the terms to describe, then fetch their triples from
    /// the source.
    fn describe_terms<S: PatternSource>(
        &self,
        query: &DescribeQuery,
        source: &S,
        query_table: &DataTable,
    ) -> Result<DataTable> {
        let terms = self.collect_describe_terms(query, query_table);

        let mut seen = HashSet::new();
        let mut results = DataTable::new(vec![
            "?SUBJECT".to_string(),
            "?PREDICATE".to_string(),
            "?OBJECT".to_string(),
        ]);
        for term in &terms {
            for triple in source.describe(term)? {
                if seen.insert(triple.clone()) {
                    results.push(triple_row(&triple));
                }
            }
        }
        Ok(results)
    }

    fn collect_describe_terms(&self, query: &DescribeQuery, query_table: &DataTable) -> Vec<Term> {
        // "If the query is empty but DescribeTerms contains Resources, skip
        // straight to this step using those Resources" (§4.F step 4).
        if query.is_empty() {
            return query
                .terms()
                .iter()
                .filter_map(|t| match t {
                    DescribeTerm::Resource(r) => Some(Term::Resource(r.clone())),
                    DescribeTerm::Variable(_) => None,
                })
                .collect();
        }

        let mut terms = Vec::new();
        for describe_term in query.terms() {
            match describe_term {
                DescribeTerm::Resource(r) => {
                    let term = Term::Resource(r.clone());
                    if !terms.contains(&term) {
                        terms.push(term);
                    }
                }
                DescribeTerm::Variable(v) => {
                    for value in query_table.distinct_values(&v.column()) {
                        if !terms.contains(&value) {
                            terms.push(value);
                        }
                    }
                }
            }
        }
        terms
    }

    /// Step 5: Limit (truncate), then Offset (skip), in that literal order
    /// (§9 Open Question resolution: preserved as specified).
    fn apply_modifiers(&self, query: &DescribeQuery, table: DataTable) -> DataTable {
        let mut rows = table.rows;
        if let Some(limit) = query.limit() {
            rows.truncate(limit);
        }
        if let Some(offset) = query.offset() {
            rows = rows.into_iter().skip(offset).collect();
        }
        DataTable::from_rows(table.columns, rows)
    }
}

fn triple_row(triple: &Triple) -> Row {
    let mut row = Row::new();
    row.insert("?SUBJECT".to_string(), Term::Resource(triple.subject.clone()));
    row.insert("?PREDICATE".to_string(), Term::Resource(triple.predicate.clone()));
    row.insert("?OBJECT".to_string(), triple.object.clone());
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::pattern::{Pattern, PatternTerm};
    use crate::term::Resource;

    fn res(s: &str) -> Resource {
        Resource::new(s).unwrap()
    }

    fn sample_graph() -> Graph {
        let mut g = Graph::new(res("http://e/ctx"));
        g.insert(crate::triple::Triple::new(
            res("http://e/alice"),
            res("http://e/knows"),
            Term::Resource(res("http://e/bob")),
        ))
        .unwrap();
        g.insert(crate::triple::Triple::new(
            res("http://e/bob"),
            res("http://e/name"),
            Term::Plain(crate::term::PlainLiteral::new("Bob", "")),
        ))
        .unwrap();
        g
    }

    #[test]
    fn describe_via_variable_collects_every_distinct_binding() {
        let graph = sample_graph();
        let mut query = DescribeQuery::new();
        query.add_describe_term(DescribeTerm::Variable(crate::pattern::Variable::new("o")));
        let mut group = PatternGroup::new("g1");
        group.add_pattern(Pattern::new(
            PatternTerm::ground_resource(res("http://e/alice")),
            PatternTerm::var("p"),
            PatternTerm::var("o"),
        ));
        query.add_group(group);

        let engine = DescribeEngine::new(EngineConfig::default());
        let result = engine.apply(&query, &graph).unwrap();
        // bob is found both as the object of "alice knows bob" and the
        // subject of "bob name Bob".
        assert_eq!(result.results.len(), 2);
    }

    #[test]
    fn empty_query_with_resource_terms_describes_directly() {
        let graph = sample_graph();
        let mut query = DescribeQuery::new();
        query.add_describe_term(DescribeTerm::Resource(res("http://e/bob")));

        let engine = DescribeEngine::new(EngineConfig::default());
        let result = engine.apply(&query, &graph).unwrap();
        assert_eq!(result.results.len(), 2);
    }

    #[test]
    fn limit_then_offset_are_applied_in_that_order() {
        let graph = sample_graph();
        let mut query = DescribeQuery::new();
        query.add_describe_term(DescribeTerm::Resource(res("http://e/bob")));
        query.set_limit(1);
        query.set_offset(1);

        let engine = DescribeEngine::new(EngineConfig::default());
        let result = engine.apply(&query, &graph).unwrap();
        // limit(1) truncates to the first row, then offset(1) skips it: empty.
        assert!(result.results.is_empty());
    }
}
