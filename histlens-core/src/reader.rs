use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use histlens_common::{HistLensError, Result};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ProjectionMask;
use std::path::Path;

fn is_numeric(dt: &DataType) -> bool {
    matches!(
        dt,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Loads a numeric sample, picking the format from the file extension.
pub fn load_sample(path: &Path, column: Option<&str>) -> Result<Vec<f64>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("parquet") => read_parquet_column(path, column, 65536),
        Some("json") => read_json_sample(path),
        _ => read_text_sample(path),
    }
}

/// Reads one numeric column (the first numeric one when `column` is `None`); nulls are skipped.
pub fn read_parquet_column(path: &Path, column: Option<&str>, batch_size: usize) -> Result<Vec<f64>> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let idx = match column {
        Some(name) => schema
            .fields()
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| HistLensError::UnknownColumn(name.to_owned()))?,
        None => schema
            .fields()
            .iter()
            .position(|f| is_numeric(f.data_type()))
            .ok_or_else(|| HistLensError::Other(format!("no numeric column in {}", path.display())))?,
    };
    let field = schema.field(idx);
    if !is_numeric(field.data_type()) {
        return Err(HistLensError::Other(format!(
            "column {} is {}, not numeric",
            field.name(),
            field.data_type()
        )));
    }
    let mask = ProjectionMask::roots(builder.parquet_schema(), [idx]);
    let reader = builder.with_projection(mask).with_batch_size(batch_size).build()?;
    let mut values = Vec::new();
    for batch in reader {
        let batch = batch?;
        let col = cast(batch.column(0), &DataType::Float64)?;
        let floats = col
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| HistLensError::Other("cast to Float64 failed".into()))?;
        values.reserve(floats.len() - floats.null_count());
        values.extend(floats.iter().flatten());
    }
    log::info!("{:<24}{:<24}{} values", "read parquet", field.name(), values.len());
    Ok(values)
}

/// A JSON array of numbers.
pub fn read_json_sample(path: &Path) -> Result<Vec<f64>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Numbers separated by commas, whitespace or newlines; blank lines and `#` comments are ignored.
pub fn read_text_sample(path: &Path) -> Result<Vec<f64>> {
    parse_text_sample(&std::fs::read_to_string(path)?)
}

pub fn parse_text_sample(content: &str) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("");
        for tok in line.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty()) {
            let v: f64 = tok.parse().map_err(|_| {
                HistLensError::Other(format!("line {}: not a number: {tok}", lineno + 1))
            })?;
            values.push(v);
        }
    }
    Ok(values)
}
