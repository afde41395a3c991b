use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{Peak, PeakList, PeakRecord};

/// Column holding the 1H shift in exported peak tables.
pub const DEFAULT_H_COLUMN: &str = "X_shift";
/// Column holding the 15N shift in exported peak tables.
pub const DEFAULT_N_COLUMN: &str = "Y_shift";
/// Optional intensity column.
pub const INTENSITY_COLUMN: &str = "intensity";

/// Which columns of a tabular source hold the shifts.
#[derive(Debug, Clone)]
pub struct PeakSourceOptions {
    pub h_column: String,
    pub n_column: String,
}

impl Default for PeakSourceOptions {
    fn default() -> Self {
        PeakSourceOptions {
            h_column: DEFAULT_H_COLUMN.to_string(),
            n_column: DEFAULT_N_COLUMN.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a peak list from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one peak per row, shift columns named by `opts`
/// * `.json`    – `[{ "intensity": f, "position": [h, n] }, ...]` peak-list
///   export, or `[{ "X_shift": h, "Y_shift": n }, ...]` rows
/// * `.parquet` – float shift columns named by `opts`
///
/// An `intensity` column/field is picked up when present.
pub fn load_file(path: &Path, opts: &PeakSourceOptions) -> Result<PeakList> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let list = match ext.as_str() {
        "csv" => load_csv(path, opts),
        "json" => load_json(path, opts),
        "parquet" | "pq" => load_parquet(path, opts),
        other => bail!("Unsupported peak list extension: .{other}"),
    }
    .with_context(|| format!("loading peak list {}", path.display()))?;

    info!(
        "loaded {} peaks from {}{}",
        list.len(),
        path.display(),
        if list.has_intensities() { " (with intensities)" } else { "" }
    );
    Ok(list)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one peak per row. Columns other
/// than the two shift columns and `intensity` are ignored.
fn load_csv(path: &Path, opts: &PeakSourceOptions) -> Result<PeakList> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let h_idx = column(opts.h_column.as_str())
        .with_context(|| format!("CSV missing '{}' column", opts.h_column))?;
    let n_idx = column(opts.n_column.as_str())
        .with_context(|| format!("CSV missing '{}' column", opts.n_column))?;
    let intensity_idx = column(INTENSITY_COLUMN);

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize, col: &str| -> Result<f64> {
            let raw = record.get(idx).unwrap_or("").trim();
            raw.parse::<f64>()
                .with_context(|| format!("Row {row_no}, {col}: '{raw}' is not a number"))
        };

        let peak = Peak::new(
            cell(h_idx, opts.h_column.as_str())?,
            cell(n_idx, opts.n_column.as_str())?,
        );
        let intensity = match intensity_idx {
            Some(idx) => Some(cell(idx, INTENSITY_COLUMN)?),
            None => None,
        };
        records.push(PeakRecord { peak, intensity });
    }

    Ok(PeakList::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema, either the spectrometer peak-list export
///
/// ```json
/// [
///   { "intensity": 1.5e6, "position": [8.27, 121.4] },
///   ...
/// ]
/// ```
///
/// or plain shift records keyed by the configured column names.
fn load_json(path: &Path, opts: &PeakSourceOptions) -> Result<PeakList> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let entries = root.as_array().context("Expected top-level JSON array")?;

    let records = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let obj = entry
                .as_object()
                .with_context(|| format!("Peak {i} is not a JSON object"))?;
            json_record(obj, i, opts)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PeakList::from_records(records))
}

fn json_record(obj: &Map<String, JsonValue>, i: usize, opts: &PeakSourceOptions) -> Result<PeakRecord> {
    let intensity = match obj.get(INTENSITY_COLUMN) {
        None | Some(JsonValue::Null) => None,
        Some(v) => Some(
            v.as_f64()
                .with_context(|| format!("Peak {i}: intensity is not a number"))?,
        ),
    };

    let peak = if let Some(position) = obj.get("position") {
        let coords = position
            .as_array()
            .with_context(|| format!("Peak {i}: 'position' is not an array"))?;
        if coords.len() != 2 {
            bail!("Peak {i}: 'position' has {} values, expected 2", coords.len());
        }
        let coord = |j: usize| {
            coords[j]
                .as_f64()
                .with_context(|| format!("Peak {i}, position[{j}]: not a number"))
        };
        Peak::new(coord(0)?, coord(1)?)
    } else {
        let shift = |col: &str| {
            obj.get(col)
                .and_then(JsonValue::as_f64)
                .with_context(|| format!("Peak {i}: missing or invalid '{col}'"))
        };
        Peak::new(shift(opts.h_column.as_str())?, shift(opts.n_column.as_str())?)
    };

    Ok(PeakRecord { peak, intensity })
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet peak table.
///
/// Expected schema:
/// - the two shift columns: Float64 or Float32
/// - optional `intensity`: Float64, Float32, Int32 or Int64
/// - any other columns are ignored
fn load_parquet(path: &Path, opts: &PeakSourceOptions) -> Result<PeakList> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let index_of = |name: &str| {
            schema
                .index_of(name)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))
        };
        let h_col = batch.column(index_of(opts.h_column.as_str())?);
        let n_col = batch.column(index_of(opts.n_column.as_str())?);
        let intensity_col = schema
            .index_of(INTENSITY_COLUMN)
            .ok()
            .map(|idx| batch.column(idx));

        for row in 0..batch.num_rows() {
            let h = extract_f64(h_col, row)
                .with_context(|| format!("Row {row}: failed to read '{}'", opts.h_column))?;
            let n = extract_f64(n_col, row)
                .with_context(|| format!("Row {row}: failed to read '{}'", opts.n_column))?;
            let intensity = match intensity_col {
                Some(col) => Some(
                    extract_f64(col, row)
                        .with_context(|| format!("Row {row}: failed to read 'intensity'"))?,
                ),
                None => None,
            };
            records.push(PeakRecord {
                peak: Peak::new(h, n),
                intensity,
            });
        }
    }

    Ok(PeakList::from_records(records))
}

// -- Parquet / Arrow helpers --

/// Read one numeric cell as `f64`.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in numeric column");
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    value.context("column type does not match its declared data type")
}
