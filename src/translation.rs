use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::state::State;
use crate::types::RowValues;

static NAMED_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":([a-zA-Z0-9_]+)").expect("named placeholder pattern is valid")
});

/// Target positional placeholder style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// MySQL-style anonymous placeholders: every position is `?`.
    Mysql,
    /// PostgreSQL-style placeholders like `$1`.
    Postgres,
    /// SQLite-style placeholders like `?1`.
    Sqlite,
}

impl PlaceholderStyle {
    /// Token for the 1-based `ordinal` position.
    #[must_use]
    pub fn token(self, ordinal: usize) -> String {
        match self {
            PlaceholderStyle::Mysql => "?".to_string(),
            PlaceholderStyle::Postgres => format!("${ordinal}"),
            PlaceholderStyle::Sqlite => format!("?{ordinal}"),
        }
    }
}

/// How a compiled statement is treated once the backend answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Starts with `select`; rows are projected into state.
    Select,
    /// Starts with `insert`; a reported identifier lands in `_insertId`.
    Insert,
    /// Everything else (update, delete, DDL, transaction control).
    Other,
}

impl StatementKind {
    /// Case-insensitive prefix match against `select` and `insert`.
    ///
    /// Leading whitespace is not skipped.
    #[must_use]
    pub fn classify(sql: &str) -> Self {
        let bytes = sql.as_bytes();
        let starts_with = |prefix: &[u8]| {
            bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix)
        };
        if starts_with(b"select") {
            StatementKind::Select
        } else if starts_with(b"insert") {
            StatementKind::Insert
        } else {
            StatementKind::Other
        }
    }
}

/// A template resolved against one state: dialect SQL plus the values to bind, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<RowValues>,
    /// State keys that were bound, one per entry in `params`.
    pub bound_keys: Vec<String>,
    pub kind: StatementKind,
}

impl CompiledQuery {
    /// Resolve every `:name` in `template` against `state`.
    ///
    /// Each occurrence whose state value is truthy is replaced by `placeholder(n)` for the next
    /// ordinal `n` (starting at 1) and its value is appended to `params`. Occurrences that are
    /// missing or falsy stay in the output verbatim and bind nothing, so `0` and `""` can never be
    /// bound through a named placeholder.
    pub fn compile<F>(template: &str, state: &State, placeholder: F) -> Self
    where
        F: Fn(usize) -> String,
    {
        let mut params = Vec::new();
        let mut bound_keys = Vec::new();

        let sql = NAMED_PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                let key = &caps[1];
                match state.get(key).filter(|value| value.is_truthy()) {
                    Some(value) => {
                        params.push(value.clone());
                        bound_keys.push(key.to_string());
                        placeholder(params.len())
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned();

        let kind = StatementKind::classify(&sql);
        CompiledQuery {
            sql,
            params,
            bound_keys,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pg(ordinal: usize) -> String {
        PlaceholderStyle::Postgres.token(ordinal)
    }

    #[test]
    fn binds_in_order_of_appearance() {
        let state = State::new().with("a", 1).with("b", 2);
        let compiled = CompiledQuery::compile("INSERT INTO t (a,b) VALUES (:a,:b)", &state, pg);
        assert_eq!(compiled.sql, "INSERT INTO t (a,b) VALUES ($1,$2)");
        assert_eq!(compiled.params, vec![RowValues::Int(1), RowValues::Int(2)]);
        assert_eq!(compiled.bound_keys, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(compiled.kind, StatementKind::Insert);
    }

    #[test]
    fn mysql_tokens_are_anonymous() {
        let state = State::new().with("a", 1).with("b", 2);
        let compiled = CompiledQuery::compile("INSERT INTO t (a,b) VALUES (:a,:b)", &state, |i| {
            PlaceholderStyle::Mysql.token(i)
        });
        assert_eq!(compiled.sql, "INSERT INTO t (a,b) VALUES (?,?)");
        assert_eq!(compiled.params.len(), 2);
    }

    #[test]
    fn repeated_key_binds_twice() {
        let state = State::new().with("g", 7);
        let compiled = CompiledQuery::compile("SELECT :g, :g", &state, |i| {
            PlaceholderStyle::Sqlite.token(i)
        });
        assert_eq!(compiled.sql, "SELECT ?1, ?2");
        assert_eq!(compiled.params, vec![RowValues::Int(7), RowValues::Int(7)]);
    }

    #[test]
    fn falsy_values_stay_unresolved() {
        let state = State::new().with("id", 0);
        let compiled = CompiledQuery::compile("SELECT * FROM t WHERE id=:id", &state, pg);
        assert_eq!(compiled.sql, "SELECT * FROM t WHERE id=:id");
        assert!(compiled.params.is_empty());

        let state = State::new().with("name", "").with("id", 3);
        let compiled = CompiledQuery::compile("UPDATE t SET name=:name WHERE id=:id", &state, pg);
        assert_eq!(compiled.sql, "UPDATE t SET name=:name WHERE id=$1");
        assert_eq!(compiled.params, vec![RowValues::Int(3)]);
    }

    #[test]
    fn missing_keys_stay_unresolved() {
        let compiled = CompiledQuery::compile("DELETE FROM t WHERE id=:id", &State::new(), pg);
        assert_eq!(compiled.sql, "DELETE FROM t WHERE id=:id");
        assert!(compiled.bound_keys.is_empty());
        assert_eq!(compiled.kind, StatementKind::Other);
    }

    #[test]
    fn same_template_resolves_per_state() {
        let template = "SELECT * FROM t WHERE a=:a AND b=:b";
        let only_b = State::new().with("b", "x");
        let both = State::new().with("a", 1).with("b", "x");
        let first = CompiledQuery::compile(template, &only_b, pg);
        let second = CompiledQuery::compile(template, &both, pg);
        assert_eq!(first.sql, "SELECT * FROM t WHERE a=:a AND b=$1");
        assert_eq!(second.sql, "SELECT * FROM t WHERE a=$1 AND b=$2");
    }

    #[test]
    fn classification_is_case_insensitive_prefix() {
        let classify = StatementKind::classify;
        assert_eq!(classify("select 1"), StatementKind::Select);
        assert_eq!(classify("SeLeCt 1"), StatementKind::Select);
        assert_eq!(classify("Insert into t values (1)"), StatementKind::Insert);
        assert_eq!(classify(" select 1"), StatementKind::Other);
        assert_eq!(classify("WITH x AS (SELECT 1) SELECT * FROM x"), StatementKind::Other);
        assert_eq!(classify("sel"), StatementKind::Other);
    }

    #[test]
    fn tokens_per_style() {
        assert_eq!(PlaceholderStyle::Mysql.token(3), "?");
        assert_eq!(PlaceholderStyle::Postgres.token(3), "$3");
        assert_eq!(PlaceholderStyle::Sqlite.token(3), "?3");
    }
}
