//! Triple patterns, pattern groups, and filters (component E).

mod filter;

pub use filter::{CompareOp, Filter};

use crate::query::table::Row;
use crate::term::{Resource, Term};

/// A named query variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub name: String,
    pub reserved: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable {
            name: name.into(),
            reserved: false,
        }
    }

    pub fn reserved(name: impl Into<String>) -> Self {
        Variable {
            name: name.into(),
            reserved: true,
        }
    }

    /// The column name this variable binds to in an intermediate table: `?name`.
    pub fn column(&self) -> String {
        format!("?{}", self.name)
    }
}

/// One slot of a pattern: either a ground term or a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternTerm {
    Ground(Term),
    Variable(Variable),
}

impl PatternTerm {
    pub fn ground_resource(r: Resource) -> Self {
        PatternTerm::Ground(Term::Resource(r))
    }

    pub fn var(name: impl Into<String>) -> Self {
        PatternTerm::Variable(Variable::new(name))
    }

    /// Binds this slot against a concrete term, extending `bindings` for any
    /// variable slot. Returns `false` if a ground slot doesn't match, or if a
    /// variable already bound in this row disagrees with `value`.
    pub fn matches(&self, value: &Term, bindings: &mut Row) -> bool {
        match self {
            PatternTerm::Ground(t) => t == value,
            PatternTerm::Variable(v) => match bindings.get(&v.column()) {
                Some(existing) => existing == value,
                None => {
                    bindings.insert(v.column(), value.clone());
                    true
                }
            },
        }
    }
}

/// A 3- or 4-tuple pattern: context is optional (graphs have an implicit,
/// single context; stores and federations use it to select named graphs).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    pub context: Option<PatternTerm>,
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl Pattern {
    pub fn new(subject: PatternTerm, predicate: PatternTerm, object: PatternTerm) -> Self {
        Pattern {
            context: None,
            subject,
            predicate,
            object,
        }
    }

    pub fn with_context(mut self, context: PatternTerm) -> Self {
        self.context = Some(context);
        self
    }

    /// The variable names this pattern can bind, in slot order
    /// (context, subject, predicate, object), deduplicated.
    pub fn variables(&self) -> Vec<Variable> {
        let mut vars = Vec::new();
        let mut push = |slot: &PatternTerm| {
            if let PatternTerm::Variable(v) = slot {
                if !vars.contains(v) {
                    vars.push(v.clone());
                }
            }
        };
        if let Some(ctx) = &self.context {
            push(ctx);
        }
        push(&self.subject);
        push(&self.predicate);
        push(&self.object);
        vars
    }
}

/// A named set of patterns, filters, and a union/join flag (§3).
#[derive(Debug, Clone)]
pub struct PatternGroup {
    pub name: String,
    pub patterns: Vec<Pattern>,
    pub filters: Vec<Filter>,
    pub join_as_union: bool,
}

impl PatternGroup {
    pub fn new(name: impl Into<String>) -> Self {
        PatternGroup {
            name: name.into(),
            patterns: Vec::new(),
            filters: Vec::new(),
            join_as_union: false,
        }
    }

    pub fn add_pattern(&mut self, pattern: Pattern) {
        self.patterns.push(pattern);
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn set_join_as_union(&mut self, union: bool) {
        self.join_as_union = union;
    }
}

/// An ordered collection of [`PatternGroup`]s where adding a group whose name
/// already exists is a no-op, per §3.
#[derive(Debug, Clone, Default)]
pub struct PatternGroupSet {
    groups: Vec<PatternGroup>,
}

impl PatternGroupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the group was added, `false` if its name already existed.
    pub fn add(&mut self, group: PatternGroup) -> bool {
        if self.groups.iter().any(|g| g.name == group.name) {
            return false;
        }
        self.groups.push(group);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_equality_is_component_wise() {
        let a = Pattern::new(
            PatternTerm::var("s"),
            PatternTerm::ground_resource(Resource::new("http://e/p").unwrap()),
            PatternTerm::var("o"),
        );
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn adding_duplicate_group_name_is_a_no_op() {
        let mut set = PatternGroupSet::new();
        assert!(set.add(PatternGroup::new("g1")));
        assert!(!set.add(PatternGroup::new("g1")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn pattern_variables_are_deduplicated_in_slot_order() {
        let p = Pattern::new(
            PatternTerm::var("s"),
            PatternTerm::var("p"),
            PatternTerm::var("s"),
        );
        let vars: Vec<_> = p.variables().into_iter().map(|v| v.name).collect();
        assert_eq!(vars, vec!["s".to_string(), "p".to_string()]);
    }
}
