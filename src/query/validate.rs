use chrono::NaiveDateTime;

use crate::dataset::DATE_FORMAT;
use crate::error::QueryError;

/// Parse and bounds-check one optional date field from the request boundary.
///
/// `None` passes through untouched — the caller substitutes the dataset
/// default. A present value must parse in the fixed `YYYY-MM-DD HH:MM:SS`
/// format and fall inside `[first, last]` inclusive. The start/end ordering
/// invariant is the caller's job, since each field is validated on its own.
pub fn parse_bound(
    field: &'static str,
    value: Option<&str>,
    bounds: (NaiveDateTime, NaiveDateTime),
) -> Result<Option<NaiveDateTime>, QueryError> {
    let Some(text) = value else {
        return Ok(None);
    };

    let parsed = NaiveDateTime::parse_from_str(text, DATE_FORMAT).map_err(|_| {
        QueryError::MalformedDate {
            field,
            value: text.to_string(),
        }
    })?;

    let (first, last) = bounds;
    if parsed < first || parsed > last {
        return Err(QueryError::DateOutOfBounds {
            field,
            value: parsed,
            first,
            last,
        });
    }

    Ok(Some(parsed))
}
