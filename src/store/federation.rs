//! A named collection of stores queried as one (§4.F federation variant).
//!
//! Federation does not itself implement [`super::Store`]: it has no single
//! context-partitioned quadruple set of its own, only member stores whose
//! per-pattern results are union-merged before the rest of the DESCRIBE
//! pipeline runs identically to the single-store case.

use crate::error::StoreError;
use crate::triple::Quadruple;

use super::{Selector, Store};

/// A federation of member stores, each named for diagnostics. Per Open
/// Question (ii), identical pattern names across members are not
/// disambiguated: their result tables are unioned regardless of name, which
/// is the behavior this type preserves.
pub struct Federation<S: Store> {
    members: Vec<(String, S)>,
}

impl<S: Store> Federation<S> {
    pub fn new() -> Self {
        Federation { members: Vec::new() }
    }

    pub fn add_member(&mut self, name: impl Into<String>, store: S) {
        self.members.push((name.into(), store));
    }

    pub fn members(&self) -> &[(String, S)] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Selects quadruples matching `selector` from every member, in
    /// member-declaration order, without de-duplication (callers that need
    /// row-equality dedup, e.g. describe-table merging, do it themselves).
    pub fn select_quadruples(&self, selector: &Selector) -> Result<Vec<Quadruple>, StoreError> {
        let mut out = Vec::new();
        for (_, member) in &self.members {
            out.extend(member.select_quadruples(selector)?);
        }
        Ok(out)
    }
}

impl<S: Store> Default for Federation<S> {
    fn default() -> Self {
        Self::new()
    }
}
