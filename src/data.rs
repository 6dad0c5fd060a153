use crate::csv_reader::CsvData;
use crate::error::{ChartError, Result};
use serde_json::Value;
use std::fmt;

/// A single scalar in the table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Type a raw CSV field.
    ///
    /// Blank and `NaN` fields are missing. Finite numbers become `Number`;
    /// infinities and overflowing literals stay as text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            Ok(n) if n.is_nan() => Cell::Missing,
            _ => Cell::Text(raw.to_string()),
        }
    }

    /// Finite numeric value of the cell, coercing numeric-looking text.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Missing => return None,
        };
        n.is_finite().then_some(n)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
            Cell::Missing => Ok(()),
        }
    }
}

/// Tabular input: ordered rows sharing one column set.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Build a dataset, checking that every row has one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(ChartError::Dataset(format!(
                "row {} has {} values but there are {} columns",
                idx + 1,
                row.len(),
                headers.len()
            )));
        }
        Ok(Self { headers, rows })
    }

    /// Create a Dataset from parsed CSV records
    pub fn from_csv(csv: CsvData) -> Result<Self> {
        let rows = csv
            .rows
            .iter()
            .map(|r| r.iter().map(|s| Cell::parse(s)).collect())
            .collect();
        Self::new(csv.headers, rows)
    }

    /// Create a Dataset from a JSON Array of Objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| ChartError::Dataset("input must be a JSON array of objects".to_string()))?;

        let first_obj = array
            .first()
            .ok_or_else(|| ChartError::Dataset("input array is empty".to_string()))?
            .as_object()
            .ok_or_else(|| ChartError::Dataset("items in array must be objects".to_string()))?;

        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| ChartError::Dataset("items in array must be objects".to_string()))?;

            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let cell = match obj.get(header) {
                    Some(Value::Number(n)) => match n.as_f64() {
                        Some(v) if v.is_finite() => Cell::Number(v),
                        _ => Cell::Text(n.to_string()),
                    },
                    Some(Value::String(s)) => Cell::Text(s.clone()),
                    Some(Value::Bool(b)) => Cell::Text(b.to_string()),
                    Some(Value::Null) | None => Cell::Missing,
                    Some(_) => {
                        return Err(ChartError::Dataset(format!(
                            "unsupported value type for field '{}'",
                            header
                        )))
                    }
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of a column, matched exactly.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_csv(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> CsvData {
        CsvData {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_cell_parse() {
        assert_eq!(Cell::parse("2.5"), Cell::Number(2.5));
        assert_eq!(Cell::parse(" 7 "), Cell::Number(7.0));
        assert_eq!(Cell::parse(""), Cell::Missing);
        assert_eq!(Cell::parse("  "), Cell::Missing);
        assert_eq!(Cell::parse("abc"), Cell::Text("abc".to_string()));
    }

    #[test]
    fn test_cell_parse_non_finite() {
        assert_eq!(Cell::parse("NaN"), Cell::Missing);
        assert_eq!(Cell::parse("nan"), Cell::Missing);
        assert_eq!(Cell::parse("inf"), Cell::Text("inf".to_string()));
        assert_eq!(Cell::parse("-Infinity"), Cell::Text("-Infinity".to_string()));
        assert_eq!(Cell::parse("1e309"), Cell::Text("1e309".to_string()));
        assert_eq!(Cell::Text("inf".to_string()).as_number(), None);
        assert_eq!(Cell::Number(f64::NAN).as_number(), None);
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Number(1.0).to_string(), "1");
        assert_eq!(Cell::Number(2.5).to_string(), "2.5");
        assert_eq!(Cell::Text("B".to_string()).to_string(), "B");
        assert_eq!(Cell::Missing.to_string(), "");
    }

    #[test]
    fn test_text_coerces_to_number() {
        assert_eq!(Cell::Text(" 3.5".to_string()).as_number(), Some(3.5));
        assert_eq!(Cell::Text("x".to_string()).as_number(), None);
        assert_eq!(Cell::Missing.as_number(), None);
    }

    #[test]
    fn test_from_csv() {
        let data = Dataset::from_csv(make_csv(
            vec!["group", "value"],
            vec![vec!["A", "1"], vec!["B", ""]],
        ))
        .unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.rows()[0][1], Cell::Number(1.0));
        assert!(data.rows()[1][1].is_missing());
        assert_eq!(data.column_index("value"), Some(1));
        assert!(!data.has_column("Value"));
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let result = Dataset::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Cell::Number(1.0)]],
        );
        assert!(matches!(result, Err(ChartError::Dataset(_))));
    }

    #[test]
    fn test_from_json() {
        let value = json!([
            {"group": "A", "score": 1.5, "ok": true},
            {"group": "B", "score": null, "ok": false}
        ]);
        let data = Dataset::from_json(&value).unwrap();
        assert_eq!(data.headers().len(), 3);
        let score = data.column_index("score").unwrap();
        assert_eq!(data.rows()[0][score], Cell::Number(1.5));
        assert!(data.rows()[1][score].is_missing());
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        assert!(Dataset::from_json(&json!({"a": 1})).is_err());
        assert!(Dataset::from_json(&json!([])).is_err());
        assert!(Dataset::from_json(&json!([1, 2])).is_err());
    }
}
