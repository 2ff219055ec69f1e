use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line
/// * `.json`    – `[{ "col": value, ... }, ...]` (records orientation)
/// * `.parquet` – flat primitive columns
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json(&text)?
        }
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)?
        }
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::info!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.column_names.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "sample": "A", "height": 1.5, "weight": 62 },
///   ...
/// ]
/// ```
///
/// Columns are ordered by first appearance; keys missing from a record are null.
pub fn read_json(text: &str) -> Result<Table> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut column_names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !column_names.contains(key) {
                column_names.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            column_names
                .iter()
                .map(|col| obj.get(col).map_or(CellValue::Null, json_to_cell))
                .collect()
        })
        .collect();

    Table::from_rows(column_names, rows)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names, every following record has
/// one field per column.  Field types are guessed per cell.
pub fn read_csv<R: Read>(source: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell_type).collect());
    }

    Table::from_rows(headers, rows)
}

/// Tokens read as missing values, matched exactly after trimming.
const NULL_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NULL", "null", "None", "#N/A", "<NA>", "-nan", "-NaN",
];

fn guess_cell_type(s: &str) -> CellValue {
    if NULL_TOKENS.contains(&s) || s.eq_ignore_ascii_case("nan") {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat primitive columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).  Nested columns are kept as text.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<CellValue>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let values = batch
                .columns()
                .iter()
                .map(|col| extract_cell_value(col, row))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Row {row}"))?;
            rows.push(values);
        }
    }

    Table::from_rows(column_names, rows)
}

// -- Parquet / Arrow helpers --

fn downcast<'a, T: 'static>(col: &'a Arc<dyn Array>) -> Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array for {:?}", col.data_type()))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell_value(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => CellValue::String(downcast::<StringArray>(col)?.value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(downcast::<Int32Array>(col)?.value(row) as i64),
        DataType::Int64 => CellValue::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => float_cell(downcast::<Float32Array>(col)?.value(row) as f64),
        DataType::Float64 => float_cell(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => CellValue::Bool(downcast::<BooleanArray>(col)?.value(row)),
        other => {
            log::warn!("Unsupported parquet column type {other:?}, reading as text");
            CellValue::String(format!("{other:?}"))
        }
    };
    Ok(value)
}

/// Pandas writes missing floats as NaN rather than null.
fn float_cell(v: f64) -> CellValue {
    if v.is_nan() {
        CellValue::Null
    } else {
        CellValue::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_guesses_types() {
        let data = "name,age,score,flag\nann,31,1.5,true\nbob,,2.25,false\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.column_names, vec!["name", "age", "score", "flag"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns[0][0], CellValue::String("ann".into()));
        assert_eq!(table.columns[1][0], CellValue::Integer(31));
        assert_eq!(table.columns[1][1], CellValue::Null);
        assert_eq!(table.columns[2][1], CellValue::Float(2.25));
        assert_eq!(table.columns[3][0], CellValue::Bool(true));

        let numeric: Vec<String> = table.numeric_columns().into_iter().map(|c| c.name).collect();
        assert_eq!(numeric, vec!["age", "score"]);
    }

    #[test]
    fn test_read_csv_missing_value_tokens() {
        let data = "id,a,b\nx,1,2\ny,NA,3\nz,3,5\nw,4,N/A\nv,NULL,<NA>\nu,#N/A,-nan\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.columns[1][1], CellValue::Null);
        assert_eq!(table.columns[2][3], CellValue::Null);
        assert_eq!(table.columns[2][4], CellValue::Null);
        assert_eq!(table.columns[1][5], CellValue::Null);

        let numeric: Vec<String> = table.numeric_columns().into_iter().map(|c| c.name).collect();
        assert_eq!(numeric, vec!["a", "b"]);
        assert_eq!(table.default_id_column().as_deref(), Some("id"));
    }

    #[test]
    fn test_read_csv_rejects_ragged_rows() {
        let data = "a,b\n1,2\n3\n";
        assert!(read_csv(data.as_bytes()).is_err());
    }

    #[test]
    fn test_read_json_records() {
        let text = r#"[
            {"id": "x", "a": 1, "b": 0.5},
            {"id": "y", "a": 2, "c": null}
        ]"#;
        let table = read_json(text).unwrap();
        assert_eq!(table.column_names, vec!["id", "a", "b", "c"]);
        assert_eq!(table.columns[2][1], CellValue::Null);
        assert_eq!(table.columns[1][1], CellValue::Integer(2));
    }

    #[test]
    fn test_read_json_keeps_key_order() {
        let text = r#"[{"zeta": 1, "alpha": 2.5, "mid": 3}, {"zeta": 2, "alpha": 0.5, "mid": 1}]"#;
        let table = read_json(text).unwrap();
        assert_eq!(table.column_names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parquet_round_trip() {
        use arrow::array::ArrayRef;
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("count", DataType::Int32, true),
            Field::new("total", DataType::Int64, false),
            Field::new("ratio", DataType::Float32, false),
            Field::new("score", DataType::Float64, true),
            Field::new("flag", DataType::Boolean, false),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["a", "b", "c"])),
            Arc::new(Int32Array::from(vec![Some(1), None, Some(3)])),
            Arc::new(Int64Array::from(vec![10, 20, 30])),
            Arc::new(Float32Array::from(vec![0.5, f32::NAN, 2.0])),
            Arc::new(Float64Array::from(vec![Some(1.25), Some(f64::NAN), None])),
            Arc::new(BooleanArray::from(vec![true, false, true])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let path = std::env::temp_dir()
            .join(format!("lacerta_round_trip_{}.parquet", std::process::id()));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(table.column_names, vec!["id", "count", "total", "ratio", "score", "flag"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.columns[0][1], CellValue::String("b".into()));
        assert_eq!(table.columns[1][0], CellValue::Integer(1));
        assert_eq!(table.columns[1][1], CellValue::Null);
        assert_eq!(table.columns[2][2], CellValue::Integer(30));
        assert_eq!(table.columns[3][0], CellValue::Float(0.5));
        assert_eq!(table.columns[3][1], CellValue::Null);
        assert_eq!(table.columns[4][1], CellValue::Null);
        assert_eq!(table.columns[4][2], CellValue::Null);
        assert_eq!(table.columns[5][0], CellValue::Bool(true));

        let numeric: Vec<String> = table.numeric_columns().into_iter().map(|c| c.name).collect();
        assert_eq!(numeric, vec!["count", "total", "ratio", "score"]);
    }

    #[test]
    fn test_float32_and_float64_nan_read_alike() {
        let nan32: Arc<dyn Array> = Arc::new(Float32Array::from(vec![f32::NAN]));
        let nan64: Arc<dyn Array> = Arc::new(Float64Array::from(vec![f64::NAN]));
        assert_eq!(extract_cell_value(&nan32, 0).unwrap(), CellValue::Null);
        assert_eq!(extract_cell_value(&nan64, 0).unwrap(), CellValue::Null);
    }

    #[test]
    fn test_read_json_requires_array() {
        assert!(read_json(r#"{"a": 1}"#).is_err());
        assert!(read_json(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
