use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use calamine::{open_workbook_auto, Data, Range, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::table::{Cell, Column, RawTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sounding table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by one row per level
/// * `.json`    – `[{ "Pressure": 1000, "Temperature": 25.1, ... }, ...]`
/// * `.parquet` – flat scalar columns, one row per level
/// * `.xlsx` / `.xls` – first worksheet, header in the first row
pub fn load_file(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        "xlsx" | "xls" | "xlsm" | "ods" => load_spreadsheet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    parse_csv(file)
}

/// Parse CSV with a header row. Cells are typed by [`guess_cell`]; rows may
/// be ragged.
pub fn parse_csv<R: Read>(input: R) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(guess_cell).collect());
    }

    Ok(RawTable::from_rows(headers, rows))
}

fn guess_cell(s: &str) -> Cell {
    let s = s.trim();
    if s.is_empty() {
        return Cell::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Cell::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Cell::Float(f);
    }
    if s == "true" || s == "false" {
        return Cell::Bool(s == "true");
    }
    Cell::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`).
/// Column order follows the first appearance of each key.
pub fn parse_json(text: &str) -> Result<RawTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let columns = headers
        .into_iter()
        .map(|name| {
            let values = records
                .iter()
                .map(|rec| rec.get(&name).map(json_to_cell).unwrap_or(Cell::Null))
                .collect();
            Column { name, values }
        })
        .collect();

    Ok(RawTable { columns })
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Cell::Float(f)
            } else {
                Cell::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Null,
        other => Cell::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_spreadsheet(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).context("opening spreadsheet")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("spreadsheet has no worksheets")?
        .context("reading first worksheet")?;
    parse_sheet(&range)
}

/// Convert a worksheet whose first row holds the column names.
pub fn parse_sheet(range: &Range<Data>) -> Result<RawTable> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .context("worksheet is empty")?
        .iter()
        .map(|c| c.to_string().trim().to_string())
        .collect();

    let rows = rows
        .map(|row| row.iter().map(sheet_cell).collect())
        .collect();

    Ok(RawTable::from_rows(headers, rows))
}

fn sheet_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Null,
        Data::Int(i) => Cell::Integer(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        // Text cells may still hold numbers typed as text.
        Data::String(s) => guess_cell(s),
        Data::Error(_) => Cell::Null,
        other => Cell::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per quantity.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let mut columns: Vec<Column> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| Column {
            name: f.name().clone(),
            values: Vec::new(),
        })
        .collect();

    let reader = builder.build().context("building parquet reader")?;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, column) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            column
                .values
                .extend((0..batch.num_rows()).map(|row| extract_cell(array, row)));
        }
    }

    Ok(RawTable { columns })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Cell::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Cell::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map_or(Cell::Null, |arr| Cell::Integer(arr.value(row) as i64)),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map_or(Cell::Null, |arr| Cell::Integer(arr.value(row))),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map_or(Cell::Null, |arr| Cell::Float(arr.value(row) as f64)),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map_or(Cell::Null, |arr| Cell::Float(arr.value(row))),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map_or(Cell::Null, |arr| Cell::Bool(arr.value(row))),
        _ => Cell::String(format!("{:?}", col.data_type())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_cells_are_typed_and_rows_padded() {
        let input = "Time, Derived Pressure ,Temperature,Dew Point\n\
                     00:00,1000.5,25,20.1\n\
                     00:01,,n/a\n";
        let table = parse_csv(input.as_bytes()).unwrap();
        assert_eq!(
            table.column_names(),
            vec!["Time", "Derived Pressure", "Temperature", "Dew Point"]
        );
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.cell(0, 0), &Cell::String("00:00".into()));
        assert_eq!(table.cell(0, 1), &Cell::Float(1000.5));
        assert_eq!(table.cell(0, 2), &Cell::Integer(25));
        assert_eq!(table.cell(1, 1), &Cell::Null);
        assert_eq!(table.cell(1, 2), &Cell::String("n/a".into()));
        assert_eq!(table.cell(1, 3), &Cell::Null);
    }

    #[test]
    fn json_records_keep_key_order() {
        let input = r#"[
            {"Pressure": 1000, "Temperature": 25.5, "Dew Point": null},
            {"Pressure": 850, "Temperature": "15", "Altitude": 1500}
        ]"#;
        let table = parse_json(input).unwrap();
        assert_eq!(
            table.column_names(),
            vec!["Pressure", "Temperature", "Dew Point", "Altitude"]
        );
        assert_eq!(table.cell(0, 1), &Cell::Float(25.5));
        assert_eq!(table.cell(1, 1), &Cell::String("15".into()));
        assert_eq!(table.cell(0, 3), &Cell::Null);
        assert_eq!(table.cell(1, 2), &Cell::Null);
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(parse_json(r#"{"a": 1}"#).is_err());
        assert!(parse_json("[1, 2]").is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("sounding.txt")).unwrap_err();
        assert!(err.to_string().contains(".txt"));
    }

    #[test]
    fn worksheet_header_row_names_columns() {
        let mut range = Range::new((0, 0), (2, 2));
        range.set_value((0, 0), Data::String("Pressure".into()));
        range.set_value((0, 1), Data::String(" Temperature ".into()));
        range.set_value((0, 2), Data::String("Dew Point".into()));
        range.set_value((1, 0), Data::Float(1000.0));
        range.set_value((1, 1), Data::Int(25));
        range.set_value((1, 2), Data::String("20.5".into()));
        range.set_value((2, 0), Data::Float(850.0));
        range.set_value((2, 1), Data::String("--".into()));

        let table = parse_sheet(&range).unwrap();
        assert_eq!(table.column_names(), vec!["Pressure", "Temperature", "Dew Point"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.cell(0, 0), &Cell::Float(1000.0));
        assert_eq!(table.cell(0, 1), &Cell::Integer(25));
        assert_eq!(table.cell(0, 2), &Cell::Float(20.5));
        assert_eq!(table.cell(1, 1), &Cell::String("--".into()));
        assert_eq!(table.cell(1, 2), &Cell::Null);
    }

    #[test]
    fn empty_worksheet_is_an_error() {
        let range: Range<Data> = Range::empty();
        assert!(parse_sheet(&range).is_err());
    }

    #[test]
    fn parquet_file_loads_back_into_a_table() {
        use arrow::array::StringArray;
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("Pressure", DataType::Float64, false),
            Field::new("Temperature", DataType::Float64, true),
            Field::new("Station", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![1000.0, 850.0])),
                Arc::new(Float64Array::from(vec![Some(25.0), None])),
                Arc::new(StringArray::from(vec!["A", "A"])),
            ],
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!("sounding-{}.parquet", std::process::id()));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(table.column_names(), vec!["Pressure", "Temperature", "Station"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.cell(1, 0), &Cell::Float(850.0));
        assert_eq!(table.cell(0, 1), &Cell::Float(25.0));
        assert_eq!(table.cell(1, 1), &Cell::Null);
        assert_eq!(table.cell(0, 2), &Cell::String("A".into()));
    }
}
