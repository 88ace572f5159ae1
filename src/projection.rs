//! Folding backend answers back into pipeline state.

use tracing::debug;

use crate::backend::QueryOutcome;
use crate::state::{INSERT_ID_KEY, RESULTS_KEY, ROWS_KEY, State};
use crate::translation::StatementKind;

/// Apply one successful query outcome to `state`.
///
/// - inserts: a truthy identifier reported by the backend becomes `_insertId`;
/// - selects: `_rows` is replaced by the returned rows (empty when the backend returned none),
///   the rows are appended to `_results`, and when exactly one row came back each of its columns
///   is also copied to a top-level key of the same name (columns named `_rows` or `_results`
///   are not copied; the result fields win);
/// - anything else leaves state untouched.
pub fn project(state: &mut State, kind: StatementKind, outcome: QueryOutcome) {
    match kind {
        StatementKind::Insert => {
            if let Some(id) = outcome.insert_id.filter(|id| id.is_truthy()) {
                debug!(key = INSERT_ID_KEY, ?id, "projection: insert id");
                state.set(INSERT_ID_KEY, id);
            }
        }
        StatementKind::Select => {
            let rows = outcome.rows.unwrap_or_default();
            if let [row] = rows.results.as_slice() {
                for (column, value) in row.columns() {
                    if column == ROWS_KEY || column == RESULTS_KEY {
                        continue;
                    }
                    state.set(column, value.clone());
                }
            }
            debug!(
                rows = rows.len(),
                "projection: setting {ROWS_KEY} and appending to {RESULTS_KEY}"
            );
            state.push_result(rows.clone());
            state.set_rows(rows);
        }
        StatementKind::Other => {}
    }
}
