//! Intermediate result tables (§4.F, §9): column-per-variable,
//! row-per-binding, used throughout the DESCRIBE pipeline.

use std::collections::HashMap;

use crate::term::Term;

/// One row of bindings, keyed by column name (e.g. `"?s"`).
pub type Row = HashMap<String, Term>;

/// A table of bindings with a fixed, ordered column list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl DataTable {
    pub fn new(columns: Vec<String>) -> Self {
        DataTable {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        DataTable { columns, rows }
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    fn shared_columns(&self, other: &DataTable) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| other.columns.contains(c))
            .cloned()
            .collect()
    }

    fn merged_columns(&self, other: &DataTable) -> Vec<String> {
        let mut columns = self.columns.clone();
        for c in &other.columns {
            if !columns.contains(c) {
                columns.push(c.clone());
            }
        }
        columns
    }

    /// A natural join on shared columns. With no shared columns this
    /// degenerates into the cartesian product, consistent with relational
    /// algebra (§4.F step 2.b, step 3).
    pub fn natural_join(&self, other: &DataTable) -> DataTable {
        let shared = self.shared_columns(other);
        let columns = self.merged_columns(other);
        let mut result = DataTable::new(columns);

        for left in &self.rows {
            for right in &other.rows {
                if shared.iter().all(|c| left.get(c) == right.get(c)) {
                    let mut merged = left.clone();
                    for (k, v) in right {
                        merged.entry(k.clone()).or_insert_with(|| v.clone());
                    }
                    result.push(merged);
                }
            }
        }
        result
    }

    /// Set union of two tables' rows, de-duplicated by row equality (§4.F
    /// step 3, federation variant).
    pub fn union(&self, other: &DataTable) -> DataTable {
        let columns = self.merged_columns(other);
        let mut result = DataTable::new(columns);
        for row in self.rows.iter().chain(other.rows.iter()) {
            if !result.rows.contains(row) {
                result.push(row.clone());
            }
        }
        result
    }

    pub fn filter_rows(&self, keep: impl Fn(&Row) -> bool) -> DataTable {
        DataTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Every distinct value bound to `column` across all rows, in first-seen order.
    pub fn distinct_values(&self, column: &str) -> Vec<Term> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if let Some(v) = row.get(column) {
                if !seen.contains(v) {
                    seen.push(v.clone());
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> Term {
        Term::Resource(crate::term::Resource::new(s).unwrap())
    }

    #[test]
    fn natural_join_matches_on_shared_columns() {
        let mut a = DataTable::new(vec!["?s".into(), "?p".into()]);
        let mut row = Row::new();
        row.insert("?s".into(), term("http://e/s1"));
        row.insert("?p".into(), term("http://e/p"));
        a.push(row);

        let mut b = DataTable::new(vec!["?p".into(), "?o".into()]);
        let mut row2 = Row::new();
        row2.insert("?p".into(), term("http://e/p"));
        row2.insert("?o".into(), term("http://e/o"));
        b.push(row2);

        let joined = a.natural_join(&b);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined.rows[0].get("?s"), Some(&term("http://e/s1")));
        assert_eq!(joined.rows[0].get("?o"), Some(&term("http://e/o")));
    }

    #[test]
    fn union_deduplicates_rows() {
        let mut a = DataTable::new(vec!["?s".into()]);
        let mut row = Row::new();
        row.insert("?s".into(), term("http://e/s1"));
        a.push(row.clone());

        let mut b = DataTable::new(vec!["?s".into()]);
        b.push(row);

        let unioned = a.union(&b);
        assert_eq!(unioned.len(), 1);
    }
}
