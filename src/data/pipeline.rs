//! Filter, search and sort over the fetched asset list
//!
//! The view shown to users is derived on every query change by running
//! select, search, sort and cap, in that order.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::AssetRecord;

/// How the dashboard chooses which assets to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// Only assets on the allow-list
    #[default]
    AllowList,
    /// Every asset is searchable; with no query only the top `cap` by rank are shown
    TopRanked { cap: usize },
}

/// Inputs for building a view besides the records and query
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Lowercased asset ids
    pub tracked_ids: HashSet<String>,
    pub mode: SelectionMode,
}

impl ViewOptions {
    pub fn new<I, S>(tracked_ids: I, mode: SelectionMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tracked_ids: tracked_ids
                .into_iter()
                .map(|id| id.as_ref().to_lowercase())
                .collect(),
            mode,
        }
    }
}

/// Keeps only records whose id (case-folded) is in `allowed_ids`
///
/// `allowed_ids` must already be lowercase. Output order follows the input.
pub fn select_tracked(records: &[AssetRecord], allowed_ids: &HashSet<String>) -> Vec<AssetRecord> {
    records
        .iter()
        .filter(|record| allowed_ids.contains(&record.id.to_lowercase()))
        .cloned()
        .collect()
}

/// Case-insensitive substring match against name or symbol; empty query matches all
pub fn matches_query(record: &AssetRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    record.name.to_lowercase().contains(&query) || record.symbol.to_lowercase().contains(&query)
}

/// Stable ascending sort by numeric rank
///
/// Records whose rank does not parse sort after every valid rank and keep
/// their relative input order.
pub fn order_by_rank(mut records: Vec<AssetRecord>) -> Vec<AssetRecord> {
    records.sort_by(|a, b| compare_rank(a.rank_number(), b.rank_number()));
    records
}

fn compare_rank(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Builds the displayed list: select, search, sort, then cap
pub fn build_view(records: &[AssetRecord], query: &str, options: &ViewOptions) -> Vec<AssetRecord> {
    let selected = match options.mode {
        SelectionMode::AllowList => select_tracked(records, &options.tracked_ids),
        SelectionMode::TopRanked { .. } => records.to_vec(),
    };

    let matched: Vec<AssetRecord> = selected
        .into_iter()
        .filter(|record| matches_query(record, query))
        .collect();

    let mut ordered = order_by_rank(matched);

    if let SelectionMode::TopRanked { cap } = options.mode {
        if query.is_empty() {
            ordered.truncate(cap);
        }
    }

    ordered
}
