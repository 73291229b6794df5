//! Row filters (component E), dispatched by exhaustive match rather than
//! runtime downcasting (§9 dynamic-dispatch redesign note).

use regex::Regex;

use crate::error::QueryError;
use crate::query::table::Row;
use crate::term::Term;

use super::Variable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn apply(&self, lhs: &str, rhs: &str) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
        }
    }
}

/// A row filter: `evaluate(row) -> bool`. Rows failing any filter in a
/// group are dropped (§4.F step 2.c).
#[derive(Debug, Clone)]
pub enum Filter {
    IsUri(Variable),
    IsBlank(Variable),
    IsLiteral(Variable),
    Compare {
        var: Variable,
        op: CompareOp,
        value: Term,
    },
    /// The regex is compiled eagerly at construction, so an invalid pattern
    /// surfaces as a `QueryError` at build time rather than panicking during
    /// row evaluation.
    Regex { var: Variable, regex: Regex },
}

impl Filter {
    pub fn regex(var: Variable, pattern: &str) -> Result<Self, QueryError> {
        let regex = Regex::new(pattern)
            .map_err(|e| QueryError::IllFormed(format!("invalid regex {pattern:?}: {e}")))?;
        Ok(Filter::Regex { var, regex })
    }

    fn binding<'a>(row: &'a Row, var: &Variable) -> Option<&'a Term> {
        row.get(&var.column())
    }

    /// Evaluates the filter against one row. An unbound variable fails the
    /// filter (conservatively excludes the row rather than panicking).
    pub fn evaluate(&self, row: &Row) -> bool {
        match self {
            Filter::IsUri(v) => matches!(Self::binding(row, v), Some(Term::Resource(r)) if !r.is_blank()),
            Filter::IsBlank(v) => matches!(Self::binding(row, v), Some(Term::Resource(r)) if r.is_blank()),
            Filter::IsLiteral(v) => matches!(Self::binding(row, v), Some(t) if t.is_literal()),
            Filter::Compare { var, op, value } => match Self::binding(row, var) {
                Some(bound) => op.apply(bound.lexical(), value.lexical()),
                None => false,
            },
            Filter::Regex { var, regex } => match Self::binding(row, var) {
                Some(bound) => regex.is_match(bound.lexical()),
                None => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Resource;

    fn row_with(var: &str, term: Term) -> Row {
        let mut row = Row::new();
        row.insert(format!("?{var}"), term);
        row
    }

    #[test]
    fn is_uri_excludes_blank_nodes() {
        let filter = Filter::IsUri(Variable::new("s"));
        assert!(filter.evaluate(&row_with("s", Term::Resource(Resource::new("http://e/x").unwrap()))));
        assert!(!filter.evaluate(&row_with("s", Term::Resource(Resource::blank("b1")))));
    }

    #[test]
    fn regex_filter_matches_lexical_form() {
        let filter = Filter::regex(Variable::new("o"), "^foo").unwrap();
        assert!(filter.evaluate(&row_with(
            "o",
            Term::Plain(crate::term::PlainLiteral::new("foobar", ""))
        )));
        assert!(!filter.evaluate(&row_with(
            "o",
            Term::Plain(crate::term::PlainLiteral::new("barfoo", ""))
        )));
    }

    #[test]
    fn invalid_regex_is_rejected_at_construction() {
        assert!(Filter::regex(Variable::new("o"), "(unclosed").is_err());
    }

    #[test]
    fn unbound_variable_fails_the_filter() {
        let filter = Filter::IsUri(Variable::new("missing"));
        assert!(!filter.evaluate(&Row::new()));
    }
}
