use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Cell – a single value in a raw table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as it arrives from a CSV / JSON / Parquet file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::String(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Null => write!(f, ""),
        }
    }
}

impl Cell {
    /// Coerce the cell to a finite `f64`.
    ///
    /// Numbers pass through, strings are trimmed and parsed, and everything
    /// else (blanks, booleans, unparsable text, `inf`, `NaN`) is missing.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Float(v) => *v,
            Cell::Integer(i) => *i as f64,
            Cell::String(s) => s.trim().parse::<f64>().ok()?,
            Cell::Bool(_) | Cell::Null => return None,
        };
        value.is_finite().then_some(value)
    }
}

// ---------------------------------------------------------------------------
// RawTable – the uploaded table, column-oriented
// ---------------------------------------------------------------------------

/// One named column of the uploaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

/// The uploaded table: ordered, named columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<Column>,
}

impl RawTable {
    /// Build a table from a header and row-oriented records.
    ///
    /// Short rows are padded with [`Cell::Null`]; cells beyond the header are
    /// ignored.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::with_capacity(rows.len()),
            })
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for col in &mut columns {
                col.values.push(cells.next().unwrap_or(Cell::Null));
            }
        }

        RawTable { columns }
    }

    /// Column names in their original order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// First column with the given name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of rows (length of the longest column).
    pub fn num_rows(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.values.len())
            .max()
            .unwrap_or(0)
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Cell at (`row`, `col`), `Null` when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.columns
            .get(col)
            .and_then(|c| c.values.get(row))
            .unwrap_or(&Cell::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_numeric_looking_cells() {
        assert_eq!(Cell::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Cell::Integer(850).as_f64(), Some(850.0));
        assert_eq!(Cell::String(" -12.5 ".into()).as_f64(), Some(-12.5));
        assert_eq!(Cell::String("n/a".into()).as_f64(), None);
        assert_eq!(Cell::String("".into()).as_f64(), None);
        assert_eq!(Cell::String("NaN".into()).as_f64(), None);
        assert_eq!(Cell::Float(f64::INFINITY).as_f64(), None);
        assert_eq!(Cell::Bool(true).as_f64(), None);
        assert_eq!(Cell::Null.as_f64(), None);
    }

    #[test]
    fn from_rows_pads_short_rows() {
        let table = RawTable::from_rows(
            vec!["a".into(), "b".into()],
            vec![
                vec![Cell::Integer(1), Cell::Integer(2)],
                vec![Cell::Integer(3)],
            ],
        );
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.cell(1, 1), &Cell::Null);
        assert_eq!(table.cell(5, 0), &Cell::Null);
        assert_eq!(table.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn column_lookup_returns_first_match() {
        let table = RawTable::from_rows(
            vec!["x".into(), "x".into()],
            vec![vec![Cell::Integer(1), Cell::Integer(2)]],
        );
        assert_eq!(table.column("x").map(|c| &c.values[0]), Some(&Cell::Integer(1)));
        assert!(table.column("y").is_none());
    }
}
