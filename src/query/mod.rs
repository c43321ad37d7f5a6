pub mod paginate;
pub mod resolve;
pub mod stats;
pub mod validate;

use std::collections::HashSet;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::dataset::{Dataset, DATE_FORMAT};
use crate::error::QueryError;
use self::paginate::ColumnSlice;
use self::stats::StatSummary;

/// Parameters of the discovery operation.
#[derive(Debug, Clone, Default)]
pub struct DiscoverParams {
    pub search: Option<String>,
    pub skip: usize,
    pub limit: Option<usize>,
}

/// Parameters of the stats operation. All fields optional; dates are raw
/// boundary text validated by the engine.
#[derive(Debug, Clone, Default)]
pub struct StatsParams {
    pub columns: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Result of the discovery operation.
#[derive(Debug, Clone)]
pub enum DiscoverOutcome {
    /// No search requested: the full column-name list in dataset order.
    AllColumns { columns: Vec<String> },
    /// The prefix matched nothing. Descriptive, not an error.
    NoMatch { search: String },
    /// Matched columns with their paginated windows.
    Matched(MatchedColumns),
}

/// Matched columns keyed by name, with the skip/limit echoed back.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedColumns {
    #[serde(serialize_with = "serialize_entries")]
    pub matched: Vec<(String, ColumnSlice)>,
    pub skip: usize,
    pub limit: Option<usize>,
}

/// Response of the stats operation. `start_date`/`end_date` are the
/// effective bounds actually used, in the fixed boundary format. Partial
/// success: resolved columns get statistics, unresolved names are echoed in
/// `unresolved_columns`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub start_date: String,
    pub end_date: String,
    #[serde(serialize_with = "serialize_entries")]
    pub stats: Vec<(String, StatSummary)>,
    pub unresolved_columns: Vec<String>,
}

/// Serialize a name-keyed Vec as a JSON object, preserving entry order.
fn serialize_entries<S, T>(entries: &[(String, T)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (name, value) in entries {
        map.serialize_entry(name, value)?;
    }
    map.end()
}

/// Read-only query engine over one loaded dataset.
///
/// Holds the dataset behind an `Arc`; every operation is a pure synchronous
/// read, so engines (and the handle itself) can be shared across threads
/// freely.
pub struct QueryEngine {
    dataset: Arc<Dataset>,
}

impl QueryEngine {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Column discovery: the full name list when no search is given,
    /// otherwise the paginated raw series of every prefix-matched column.
    pub fn discover(&self, params: &DiscoverParams) -> DiscoverOutcome {
        let search = params.search.as_deref().unwrap_or("");
        if search.is_empty() {
            debug!("no search requested, returning all column names");
            return DiscoverOutcome::AllColumns {
                columns: self.dataset.column_names(),
            };
        }

        let matched_names = resolve::search_by_prefix(&self.dataset, search);
        if matched_names.is_empty() {
            info!("search '{}' matched no columns", search);
            return DiscoverOutcome::NoMatch {
                search: search.to_string(),
            };
        }

        let index = self.dataset.index();
        let matched = matched_names
            .into_iter()
            .map(|name| {
                // search_by_prefix only returns names that exist.
                let column = self
                    .dataset
                    .column(&name)
                    .expect("matched name resolves to a column");
                let slice = paginate::paginate(index, &column.cells, params.skip, params.limit);
                (name, slice)
            })
            .collect();

        DiscoverOutcome::Matched(MatchedColumns {
            matched,
            skip: params.skip,
            limit: params.limit,
        })
    }

    /// Descriptive statistics over a date-bounded, column-filtered slice.
    pub fn stats(&self, params: &StatsParams) -> Result<StatsResponse, QueryError> {
        let bounds = self.dataset.bounds();

        let start = validate::parse_bound("start_date", params.start_date.as_deref(), bounds)?
            .unwrap_or(bounds.0);
        let end = validate::parse_bound("end_date", params.end_date.as_deref(), bounds)?
            .unwrap_or(bounds.1);
        if start > end {
            return Err(QueryError::InvertedRange { start, end });
        }

        let (present, missing) = match params.columns.as_deref() {
            Some(requested) if !requested.is_empty() => {
                let resolved = resolve::resolve_columns(&self.dataset, requested)?;
                (resolved.present, resolved.missing)
            }
            // No filter (or an empty one) means every column.
            _ => (self.dataset.column_names(), Vec::new()),
        };

        // The index is sorted, so the inclusive date slice is one contiguous
        // row range.
        let index = self.dataset.index();
        let lo = index.partition_point(|t| *t < start);
        let hi = index.partition_point(|t| *t <= end);
        debug!("date slice covers rows {}..{} of {}", lo, hi, index.len());

        let present_set: HashSet<&str> = present.iter().map(String::as_str).collect();
        let summaries = self
            .dataset
            .columns()
            .iter()
            .filter(|c| present_set.contains(c.name.as_str()))
            .map(|column| {
                let values: Vec<f64> = column.cells[lo..hi]
                    .iter()
                    .filter_map(|c| c.as_number())
                    .collect();
                (column.name.clone(), stats::summarize(&values))
            })
            .collect();

        Ok(StatsResponse {
            start_date: start.format(DATE_FORMAT).to_string(),
            end_date: end.format(DATE_FORMAT).to_string(),
            stats: summaries,
            unresolved_columns: missing,
        })
    }
}
