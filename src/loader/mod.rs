use std::fs::File;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDateTime, NaiveTime};
use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::dataset::{CellValue, Column, Dataset, DATE_FORMAT};

/// Load a dataset file into memory, dispatching on the file extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` — the primary source format
/// * `.csv` — header row required; timestamps parsed on read
///
/// The time column is either named explicitly or detected as the first
/// datetime-typed column. Every other numeric column becomes a dataset
/// column; nulls and NaNs become `CellValue::Missing`.
pub fn load_file(path: &Path, time_column: Option<&str>) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let df = match ext.as_str() {
        "parquet" | "pq" => read_parquet(path)?,
        "csv" => read_csv(path)?,
        other => bail!("unsupported file extension: .{other} (expected .parquet or .csv)"),
    };

    info!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );

    materialize(&df, time_column)
        .with_context(|| format!("materializing dataset from {}", path.display()))
}

fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    ParquetReader::new(file)
        .finish()
        .context("Failed to read parquet file")
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?
        .has_header(true)
        .with_try_parse_dates(true)
        .finish()
        .context("Failed to read csv file")
}

/// Turn a raw DataFrame into the crate's own `Dataset`. The query core never
/// touches polars types.
fn materialize(df: &DataFrame, time_column: Option<&str>) -> Result<Dataset> {
    let time_series = match time_column {
        Some(name) => df
            .column(name)
            .map_err(|_| anyhow!("time column '{}' not found in file", name))?,
        None => detect_time_column(df)?,
    };
    let time_name = time_series.name().to_string();
    debug!("using '{}' as the time index", time_name);

    let index = extract_index(time_series)?;

    let mut columns = Vec::new();
    for series in df.get_columns() {
        if series.name() == time_name {
            continue;
        }
        if !series.dtype().is_numeric() {
            warn!(
                "skipping non-numeric column '{}' ({})",
                series.name(),
                series.dtype()
            );
            continue;
        }
        let cells = extract_cells(series)
            .with_context(|| format!("reading column '{}'", series.name()))?;
        columns.push(Column::new(series.name(), cells));
    }

    if columns.is_empty() {
        bail!("no numeric columns found in file");
    }

    Dataset::new(index, columns)
}

/// First datetime-typed column wins; files without one need --time-column.
fn detect_time_column(df: &DataFrame) -> Result<&Series> {
    df.get_columns()
        .iter()
        .find(|s| matches!(s.dtype(), DataType::Datetime(_, _) | DataType::Date))
        .ok_or_else(|| {
            anyhow!("no datetime-typed column found; name the time index with --time-column")
        })
}

fn extract_index(series: &Series) -> Result<Vec<NaiveDateTime>> {
    let timestamps: Vec<NaiveDateTime> = match series.dtype() {
        DataType::Datetime(_, _) => series
            .datetime()?
            .as_datetime_iter()
            .enumerate()
            .map(|(row, value)| {
                value.ok_or_else(|| anyhow!("null timestamp at row {row}"))
            })
            .collect::<Result<_>>()?,
        DataType::Date => series
            .date()?
            .as_date_iter()
            .enumerate()
            .map(|(row, value)| {
                value
                    .map(|d| d.and_time(NaiveTime::MIN))
                    .ok_or_else(|| anyhow!("null timestamp at row {row}"))
            })
            .collect::<Result<_>>()?,
        // A string column is accepted when named explicitly; values must use
        // the fixed boundary format.
        DataType::String => series
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                let text = value.ok_or_else(|| anyhow!("null timestamp at row {row}"))?;
                NaiveDateTime::parse_from_str(text, DATE_FORMAT).map_err(|_| {
                    anyhow!("timestamp '{text}' at row {row} does not match {DATE_FORMAT}")
                })
            })
            .collect::<Result<_>>()?,
        other => bail!("time column '{}' has non-temporal type {other}", series.name()),
    };
    Ok(timestamps)
}

fn extract_cells(series: &Series) -> Result<Vec<CellValue>> {
    let floats = series.cast(&DataType::Float64)?;
    let cells = floats
        .f64()?
        .into_iter()
        .map(|value| match value {
            Some(v) if !v.is_nan() => CellValue::Number(v),
            _ => CellValue::Missing,
        })
        .collect();
    Ok(cells)
}
