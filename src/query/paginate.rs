use chrono::NaiveDateTime;
use serde::Serialize;

use crate::dataset::{CellValue, DATE_FORMAT};

/// Placeholder emitted for missing cells at the response boundary. The JSON
/// output mixes numbers and this token; NaN is never emitted.
pub const MISSING_SENTINEL: &str = "missing";

/// One value as it appears on the wire: a number or the missing sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SampleValue {
    Number(f64),
    Sentinel(&'static str),
}

impl From<CellValue> for SampleValue {
    fn from(cell: CellValue) -> Self {
        match cell {
            CellValue::Number(v) => SampleValue::Number(v),
            CellValue::Missing => SampleValue::Sentinel(MISSING_SENTINEL),
        }
    }
}

impl std::fmt::Display for SampleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleValue::Number(v) => write!(f, "{v}"),
            SampleValue::Sentinel(s) => write!(f, "{s}"),
        }
    }
}

/// A paginated window of one column, values and timestamps aligned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSlice {
    pub values: Vec<SampleValue>,
    pub dates: Vec<String>,
}

/// Select the contiguous window of (timestamp, value) pairs for one column.
///
/// `limit` is a raw slice STOP index, not a count: `skip=2, limit=10` yields
/// indices 2..9 (8 items). Out-of-range skip/limit clamp to an empty window
/// rather than erroring.
pub fn paginate(
    index: &[NaiveDateTime],
    cells: &[CellValue],
    skip: usize,
    limit: Option<usize>,
) -> ColumnSlice {
    debug_assert_eq!(index.len(), cells.len());

    let len = cells.len();
    let stop = limit.map_or(len, |l| l.min(len));
    let start = skip.min(stop);

    let values = cells[start..stop].iter().map(|&c| c.into()).collect();
    let dates = index[start..stop]
        .iter()
        .map(|t| t.format(DATE_FORMAT).to_string())
        .collect();

    ColumnSlice { values, dates }
}
