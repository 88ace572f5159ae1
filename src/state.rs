//! Shared context threaded through one pipeline invocation.

use std::collections::HashMap;

use crate::results::ResultSet;
use crate::types::RowValues;

/// Reserved name of the rows produced by the most recent row-returning query.
pub const ROWS_KEY: &str = "_rows";
/// Reserved name of the list of result sets, one per row-returning query.
pub const RESULTS_KEY: &str = "_results";
/// Reserved key holding the identifier assigned by the most recent insert.
pub const INSERT_ID_KEY: &str = "_insertId";

/// Mutable mapping from names to values plus the reserved query outputs.
///
/// Plain keys live in a value map; `_rows` and `_results` are typed fields because they hold
/// result sets rather than scalars. `_insertId` is an ordinary value under [`INSERT_ID_KEY`], so
/// later templates can reference it as `:_insertId`.
///
/// ```rust
/// use sqlmw::prelude::*;
///
/// let state = State::new().with("game_id", 1).with("title", "Hello");
/// assert_eq!(state.get("game_id"), Some(&RowValues::Int(1)));
/// assert!(state.rows().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct State {
    values: HashMap<String, RowValues>,
    rows: Option<ResultSet>,
    results: Option<Vec<ResultSet>>,
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`State::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.set(key, value);
        self
    }

    /// Set `key`, returning the value it replaced.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<RowValues>,
    ) -> Option<RowValues> {
        self.values.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RowValues> {
        self.values.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of plain keys (the reserved result fields are not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no plain keys. Like [`State::len`], ignores `_rows` and `_results`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `_rows`: rows of the most recent row-returning query.
    #[must_use]
    pub fn rows(&self) -> Option<&ResultSet> {
        self.rows.as_ref()
    }

    /// `_results`: every row-returning query's result set, in execution order.
    #[must_use]
    pub fn results(&self) -> Option<&[ResultSet]> {
        self.results.as_deref()
    }

    /// `_insertId`
    #[must_use]
    pub fn insert_id(&self) -> Option<&RowValues> {
        self.values.get(INSERT_ID_KEY)
    }

    pub(crate) fn set_rows(&mut self, rows: ResultSet) {
        self.rows = Some(rows);
    }

    pub(crate) fn push_result(&mut self, result: ResultSet) {
        self.results.get_or_insert_with(Vec::new).push(result);
    }
}

impl<K, V> FromIterator<(K, V)> for State
where
    K: Into<String>,
    V: Into<RowValues>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = State::new();
        state.extend(iter);
        state
    }
}

impl<K, V> Extend<(K, V)> for State
where
    K: Into<String>,
    V: Into<RowValues>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_and_keeps_keys() {
        let mut state = State::new().with("a", 1);
        assert_eq!(state.set("a", 2), Some(RowValues::Int(1)));
        assert_eq!(state.get("a"), Some(&RowValues::Int(2)));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn results_are_created_on_demand() {
        let mut state = State::new();
        assert!(state.results().is_none());
        state.push_result(ResultSet::default());
        state.push_result(ResultSet::default());
        assert_eq!(state.results().map(<[ResultSet]>::len), Some(2));
        assert_eq!(state.len(), 0);
        assert!(state.is_empty());
    }

    #[test]
    fn collects_from_pairs() {
        let state: State = [("a", RowValues::Int(1)), ("b", RowValues::Null)]
            .into_iter()
            .collect();
        assert_eq!(state.len(), 2);
        assert!(state.get("b").is_some_and(RowValues::is_null));
        assert!(state.insert_id().is_none());
    }
}
