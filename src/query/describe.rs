//! The DESCRIBE query model (§3, §6): describe terms, pattern groups, and
//! modifiers, plus the query's canonical string form.

use std::fmt::Write as _;

use crate::pattern::{PatternGroup, PatternGroupSet, Variable};
use crate::term::Resource;

/// A term named in the `DESCRIBE` clause: either a ground resource or a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DescribeTerm {
    Resource(Resource),
    Variable(Variable),
}

/// A DESCRIBE query: describe terms, pattern groups, and limit/offset modifiers.
#[derive(Debug, Clone, Default)]
pub struct DescribeQuery {
    terms: Vec<DescribeTerm>,
    groups: PatternGroupSet,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl DescribeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_describe_term(&mut self, term: DescribeTerm) {
        self.terms.push(term);
    }

    pub fn terms(&self) -> &[DescribeTerm] {
        &self.terms
    }

    /// Adds a pattern group; a no-op if a group with the same name already exists.
    pub fn add_group(&mut self, group: PatternGroup) -> bool {
        self.groups.add(group)
    }

    pub fn groups(&self) -> &PatternGroupSet {
        &self.groups
    }

    /// Sets LIMIT, ignored if already set ("at most one", §4.F step 5).
    pub fn set_limit(&mut self, n: usize) {
        self.limit.get_or_insert(n);
    }

    /// Sets OFFSET, ignored if already set.
    pub fn set_offset(&mut self, n: usize) {
        self.offset.get_or_insert(n);
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// `DescribeTerms` empty.
    pub fn is_star(&self) -> bool {
        self.terms.is_empty()
    }

    /// `PatternGroups` empty.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Renders the query text per the grammar in §6:
    /// `DESCRIBE ` (terms | `*`) `\nWHERE{\n` groups `\n}` then optional
    /// `\nLIMIT n` and `\nOFFSET n`, with union blocks wrapped `  {` ... `  }`.
    pub fn to_query_text(&self) -> String {
        let mut out = String::new();
        out.push_str("DESCRIBE ");
        if self.is_star() {
            out.push('*');
        } else {
            let rendered: Vec<String> = self
                .terms
                .iter()
                .map(|t| match t {
                    DescribeTerm::Resource(r) => format!("<{r}>"),
                    DescribeTerm::Variable(v) => format!("?{}", v.name),
                })
                .collect();
            out.push_str(&rendered.join(" "));
        }
        out.push_str("\nWHERE{\n");

        let mut in_union_block = false;
        let group_list: Vec<&PatternGroup> = self.groups.iter().collect();
        for (i, group) in group_list.iter().enumerate() {
            let opening_union = group.join_as_union && !in_union_block;
            if opening_union {
                out.push_str("  {\n");
                in_union_block = true;
            }
            write_group(&mut out, group);

            let continues_union = group.join_as_union;
            if in_union_block {
                if continues_union && i + 1 < group_list.len() {
                    out.push_str("    UNION\n");
                } else {
                    out.push_str("  }\n");
                    in_union_block = false;
                }
            }
        }
        out.push('}');

        if let Some(limit) = self.limit {
            let _ = write!(out, "\nLIMIT {limit}");
        }
        if let Some(offset) = self.offset {
            let _ = write!(out, "\nOFFSET {offset}");
        }
        out
    }
}

fn write_group(out: &mut String, group: &PatternGroup) {
    let _ = writeln!(out, "    # {}", group.name);
    for pattern in &group.patterns {
        let _ = writeln!(out, "    {}", render_pattern(pattern));
    }
}

fn render_pattern(pattern: &crate::pattern::Pattern) -> String {
    use crate::pattern::PatternTerm;
    let render = |t: &PatternTerm| match t {
        PatternTerm::Ground(term) => term.to_string(),
        PatternTerm::Variable(v) => format!("?{}", v.name),
    };
    format!(
        "{} {} {} .",
        render(&pattern.subject),
        render(&pattern.predicate),
        render(&pattern.object)
    )
}

impl std::fmt::Display for DescribeQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_query_text())
    }
}
