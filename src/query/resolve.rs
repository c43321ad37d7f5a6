use std::collections::HashSet;

use tracing::debug;

use crate::dataset::Dataset;
use crate::error::QueryError;

/// Requested names partitioned against the dataset's actual columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumns {
    /// Requested names that exist, in dataset column order.
    pub present: Vec<String>,
    /// Requested names with no matching column, in first-seen request order.
    pub missing: Vec<String>,
}

/// All column names starting with `prefix`, preserving dataset order.
///
/// An empty result means "the search matched nothing", which the caller
/// reports descriptively rather than as an error. The no-search-requested
/// case never reaches this function.
pub fn search_by_prefix(dataset: &Dataset, prefix: &str) -> Vec<String> {
    let matched: Vec<String> = dataset
        .columns()
        .iter()
        .filter(|c| c.name.starts_with(prefix))
        .map(|c| c.name.clone())
        .collect();
    debug!("prefix '{}' matched {} of {} columns", prefix, matched.len(), dataset.columns().len());
    matched
}

/// Partition `requested` into present and missing names.
///
/// Set semantics: duplicate requested names collapse to one entry on both
/// sides. Fails with `NoMatchingColumns` when nothing resolves.
pub fn resolve_columns(dataset: &Dataset, requested: &[String]) -> Result<ResolvedColumns, QueryError> {
    let requested_set: HashSet<&str> = requested.iter().map(String::as_str).collect();

    let present: Vec<String> = dataset
        .columns()
        .iter()
        .filter(|c| requested_set.contains(c.name.as_str()))
        .map(|c| c.name.clone())
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let missing: Vec<String> = requested
        .iter()
        .filter(|name| !dataset.contains_column(name) && seen.insert(name.as_str()))
        .cloned()
        .collect();

    if present.is_empty() {
        return Err(QueryError::NoMatchingColumns {
            requested: requested.to_vec(),
        });
    }

    Ok(ResolvedColumns { present, missing })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CellValue, Column, DATE_FORMAT};
    use chrono::NaiveDateTime;

    fn sample_dataset() -> Dataset {
        let index = vec![
            NaiveDateTime::parse_from_str("2019-06-27 00:00:00", DATE_FORMAT).unwrap(),
        ];
        Dataset::new(
            index,
            vec![
                Column::new("vel58.3", vec![CellValue::Number(1.0)]),
                Column::new("vel47.5", vec![CellValue::Number(2.0)]),
                Column::new("vel32", vec![CellValue::Number(3.0)]),
                Column::new("temp1", vec![CellValue::Missing]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_prefix_search_preserves_dataset_order() {
        let dataset = sample_dataset();
        assert_eq!(
            search_by_prefix(&dataset, "vel"),
            vec!["vel58.3", "vel47.5", "vel32"]
        );
        assert_eq!(search_by_prefix(&dataset, "vel58"), vec!["vel58.3"]);
        assert!(search_by_prefix(&dataset, "pressure").is_empty());
    }

    #[test]
    fn test_resolve_partitions_present_and_missing() {
        let dataset = sample_dataset();
        let resolved = resolve_columns(
            &dataset,
            &["temp1".to_string(), "humidity".to_string(), "vel32".to_string()],
        )
        .unwrap();
        // Present comes back in dataset order, not request order.
        assert_eq!(resolved.present, vec!["vel32", "temp1"]);
        assert_eq!(resolved.missing, vec!["humidity"]);
    }

    #[test]
    fn test_resolve_collapses_duplicates() {
        let dataset = sample_dataset();
        let resolved = resolve_columns(
            &dataset,
            &["vel32".to_string(), "vel32".to_string(), "humidity".to_string()],
        )
        .unwrap();
        assert_eq!(resolved.present, vec!["vel32"]);
        assert_eq!(resolved.missing, vec!["humidity"]);
    }

    #[test]
    fn test_resolve_fails_when_nothing_matches() {
        let dataset = sample_dataset();
        let err = resolve_columns(
            &dataset,
            &["missing".to_string(), "var".to_string(), "names".to_string()],
        )
        .unwrap_err();
        match err {
            QueryError::NoMatchingColumns { requested } => {
                assert_eq!(requested.len(), 3);
            }
            other => panic!("expected NoMatchingColumns, got {other:?}"),
        }
    }
}
