//! Sequence Allocator - `YYYYMMDD-NN` request ids
//!
//! The suffix is one more than the largest numeric suffix already used
//! today. Ids are never reused: soft-deleted rows stay in the table and keep
//! counting. Malformed suffixes are ignored.

use chrono::NaiveDate;
use shared::models::Request;

/// Date prefix of an id
pub fn id_prefix(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Numeric suffix of `id` if it belongs to `prefix`
pub fn sequence_of(id: &str, prefix: &str) -> Option<u32> {
    let suffix = id.strip_prefix(prefix)?.strip_prefix('-')?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Next id for `today`
pub fn next_id(table: &[Request], today: NaiveDate) -> String {
    let prefix = id_prefix(today);
    let max = table
        .iter()
        .filter_map(|r| sequence_of(&r.id, &prefix))
        .max()
        .unwrap_or(0);
    format!("{prefix}-{:02}", max.saturating_add(1))
}

/// `candidate` if no row holds it, otherwise a fresh id against `table`.
///
/// `None` once the day's sequence is exhausted and even the fresh id is taken.
pub fn claim_id(table: &[Request], candidate: &str, today: NaiveDate) -> Option<String> {
    let taken = |id: &str| table.iter().any(|r| r.id == id);
    if !taken(candidate) {
        return Some(candidate.to_string());
    }
    let fresh = next_id(table, today);
    (!taken(&fresh)).then_some(fresh)
}
