//! The data-source abstraction the DESCRIBE engine is generic over (§4.F):
//! a [`Graph`], any [`Store`], or a [`Federation`] all answer the same two
//! questions — which rows does a pattern bind, and which triples describe a
//! term — so [`crate::query::engine::DescribeEngine`] needs exactly one body
//! of pipeline code.

use std::collections::HashSet;

use crate::error::Result;
use crate::graph::Graph;
use crate::pattern::{Pattern, PatternTerm};
use crate::store::{Federation, Selector, Store};
use crate::term::Term;
use crate::triple::Triple;

use super::table::{DataTable, Row};

/// Evaluates patterns and answers describe lookups against a data source.
pub trait PatternSource {
    fn evaluate(&self, pattern: &Pattern) -> Result<DataTable>;

    /// Every triple in which `term` appears as subject or object.
    fn describe(&self, term: &Term) -> Result<Vec<Triple>>;
}

fn columns_for(pattern: &Pattern) -> Vec<String> {
    pattern.variables().into_iter().map(|v| v.column()).collect()
}

fn bind_triple(pattern: &Pattern, triple: &Triple) -> Option<Row> {
    let mut row = Row::new();
    if !pattern.subject.matches(&Term::Resource(triple.subject.clone()), &mut row) {
        return None;
    }
    if !pattern.predicate.matches(&Term::Resource(triple.predicate.clone()), &mut row) {
        return None;
    }
    if !pattern.object.matches(&triple.object, &mut row) {
        return None;
    }
    Some(row)
}

impl PatternSource for Graph {
    fn evaluate(&self, pattern: &Pattern) -> Result<DataTable> {
        if let Some(PatternTerm::Ground(Term::Resource(ctx))) = &pattern.context {
            if ctx != self.context() {
                return Ok(DataTable::new(columns_for(pattern)));
            }
        }
        let mut table = DataTable::new(columns_for(pattern));
        for triple in self.triples() {
            if let Some(mut row) = bind_triple(pattern, triple) {
                if let Some(PatternTerm::Variable(v)) = &pattern.context {
                    row.insert(v.column(), Term::Resource(self.context().clone()));
                }
                table.push(row);
            }
        }
        Ok(table)
    }

    fn describe(&self, term: &Term) -> Result<Vec<Triple>> {
        Ok(self
            .triples()
            .filter(|t| &t.object == term || Term::Resource(t.subject.clone()) == *term)
            .cloned()
            .collect())
    }
}

/// A generic blanket impl: any concrete [`Store`] answers patterns by
/// selecting on its ground slots, then binding the remaining variable slots
/// from each matching quadruple.
impl<S: Store> PatternSource for S {
    fn evaluate(&self, pattern: &Pattern) -> Result<DataTable> {
        let mut selector = Selector::new();
        if let Some(PatternTerm::Ground(Term::Resource(r))) = &pattern.context {
            selector = selector.with_context(r.clone());
        }
        if let PatternTerm::Ground(Term::Resource(r)) = &pattern.subject {
            selector = selector.with_subject(r.clone());
        }
        if let PatternTerm::Ground(Term::Resource(r)) = &pattern.predicate {
            selector = selector.with_predicate(r.clone());
        }
        if let PatternTerm::Ground(term) = &pattern.object {
            selector = selector.with_object(term.clone());
        }

        let quads = self.select_quadruples(&selector)?;
        let mut table = DataTable::new(columns_for(pattern));
        for quad in quads {
            if let Some(mut row) = bind_triple(pattern, &quad.as_triple()) {
                if let Some(PatternTerm::Variable(v)) = &pattern.context {
                    row.insert(v.column(), Term::Resource(quad.context.clone()));
                }
                table.push(row);
            }
        }
        Ok(table)
    }

    fn describe(&self, term: &Term) -> Result<Vec<Triple>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        if let Term::Resource(r) = term {
            let by_subject = self.select_quadruples(&Selector::new().with_subject(r.clone()))?;
            for q in by_subject {
                let t = q.as_triple();
                if seen.insert(t.clone()) {
                    out.push(t);
                }
            }
        }
        let by_object = self.select_quadruples(&Selector::new().with_object(term.clone()))?;
        for q in by_object {
            let t = q.as_triple();
            if seen.insert(t.clone()) {
                out.push(t);
            }
        }
        Ok(out)
    }
}

/// Federation variant (§4.F): per-pattern tables from each member are
/// union-merged before the engine's combine step, and describe results are
/// merged across members with row-equality de-duplication.
impl<S: Store> PatternSource for Federation<S> {
    fn evaluate(&self, pattern: &Pattern) -> Result<DataTable> {
        let mut merged = DataTable::new(columns_for(pattern));
        for (_, member) in self.members() {
            let table = member.evaluate(pattern)?;
            merged = merged.union(&table);
        }
        Ok(merged)
    }

    fn describe(&self, term: &Term) -> Result<Vec<Triple>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for (_, member) in self.members() {
            for triple in member.describe(term)? {
                if seen.insert(triple.clone()) {
                    out.push(triple);
                }
            }
        }
        Ok(out)
    }
}
