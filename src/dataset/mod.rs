use anyhow::{bail, Result};
use chrono::NaiveDateTime;

/// Fixed textual timestamp format used everywhere at the request boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell of a column: either a numeric value or an explicit gap.
///
/// The loader maps both nulls and NaNs to `Missing`, so downstream code can
/// branch on the tag instead of probing floats for NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    Number(f64),
    Missing,
}

impl CellValue {
    pub fn as_number(self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(v),
            CellValue::Missing => None,
        }
    }
}

/// A named series of numeric-or-missing values aligned to the dataset index.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }
}

/// The loaded time series: one shared timestamp index plus named columns.
///
/// Immutable after construction. Handed to the query engine behind an `Arc`,
/// so any number of requests can read it concurrently without locking.
#[derive(Debug, Clone)]
pub struct Dataset {
    index: Vec<NaiveDateTime>,
    columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset, enforcing the structural invariants the query core
    /// relies on: a non-empty, non-decreasing index, unique column names,
    /// and every column aligned to the index length.
    pub fn new(index: Vec<NaiveDateTime>, columns: Vec<Column>) -> Result<Self> {
        if index.is_empty() {
            bail!("dataset has no rows");
        }
        if index.windows(2).any(|w| w[0] > w[1]) {
            bail!("dataset index is not sorted in ascending order");
        }
        for column in &columns {
            if column.cells.len() != index.len() {
                bail!(
                    "column '{}' has {} values but the index has {} timestamps",
                    column.name,
                    column.cells.len(),
                    index.len()
                );
            }
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                bail!("duplicate column name '{}'", column.name);
            }
        }
        Ok(Self { index, columns })
    }

    /// Number of rows (timestamps).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The shared timestamp index, in ascending order.
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// First and last timestamp of the index. The constructor rejects empty
    /// datasets, so bounds always exist.
    pub fn bounds(&self) -> (NaiveDateTime, NaiveDateTime) {
        (self.index[0], self.index[self.index.len() - 1])
    }

    /// Column names in dataset order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}
