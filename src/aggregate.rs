//! Per-group aggregation: pool the selected value columns for every distinct
//! grouping value and summarise them.

use crate::data::{Cell, Dataset};
use crate::error::{ChartError, Result};
use serde::Serialize;
use std::collections::HashMap;

/// Central tendency and dispersion of one group's observations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub mean: f64,
    /// Population standard deviation (divisor N).
    pub std_dev: f64,
    /// `std_dev / sqrt(N)`.
    pub std_err: f64,
}

impl Summary {
    /// Summarise a sample; `None` when there are no observations.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        Some(Self {
            mean,
            std_dev,
            std_err: std_dev / n.sqrt(),
        })
    }
}

/// All observations for one distinct grouping value, with their summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSample {
    pub label: String,
    pub values: Vec<f64>,
    pub summary: Summary,
}

impl GroupSample {
    pub fn mean(&self) -> f64 {
        self.summary.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.summary.std_dev
    }

    pub fn std_err(&self) -> f64 {
        self.summary.std_err
    }
}

/// Group `dataset` rows by `group_key` and pool every column in `value_columns`.
///
/// Groups come back in first-occurrence order. Values are flattened row by
/// row, then column by column within a row. Rows with a missing grouping
/// value belong to no group. Groups without observations are omitted, so
/// the result may be empty.
pub fn aggregate(
    dataset: &Dataset,
    group_key: &str,
    value_columns: &[String],
) -> Result<Vec<GroupSample>> {
    let group_idx = dataset.column_index(group_key).ok_or_else(|| {
        ChartError::config(format!("grouping column '{}' not found", group_key))
    })?;

    if value_columns.is_empty() {
        return Err(ChartError::config("select at least one data column"));
    }

    let mut value_idx: Vec<(usize, &str)> = Vec::with_capacity(value_columns.len());
    for col in value_columns {
        let idx = dataset
            .column_index(col)
            .ok_or_else(|| ChartError::config(format!("data column '{}' not found", col)))?;
        if !value_idx.iter().any(|&(seen, _)| seen == idx) {
            value_idx.push((idx, col.as_str()));
        }
    }

    // Track group order (first appearance)
    let mut group_slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    let mut skipped = 0usize;

    for (row_idx, row) in dataset.rows().iter().enumerate() {
        let key_cell = &row[group_idx];
        if key_cell.is_missing() {
            skipped += 1;
            continue;
        }
        let label = key_cell.to_string();

        let slot = match group_slots.get(&label) {
            Some(&slot) => slot,
            None => {
                groups.push((label.clone(), Vec::new()));
                group_slots.insert(label, groups.len() - 1);
                groups.len() - 1
            }
        };

        for &(col_idx, col_name) in &value_idx {
            let cell = &row[col_idx];
            let value = cell.as_number().ok_or_else(|| ChartError::DataType {
                column: col_name.to_string(),
                row: row_idx + 1,
                value: match cell {
                    Cell::Text(s) => s.clone(),
                    Cell::Missing => "<missing>".to_string(),
                    other => other.to_string(),
                },
            })?;
            groups[slot].1.push(value);
        }
    }

    if skipped > 0 {
        log::warn!(
            "{} row(s) without a value in grouping column '{}' were skipped",
            skipped,
            group_key
        );
    }

    let samples: Vec<GroupSample> = groups
        .into_iter()
        .filter_map(|(label, values)| {
            Summary::from_values(&values).map(|summary| GroupSample {
                label,
                values,
                summary,
            })
        })
        .collect();

    log::debug!(
        "aggregated {} rows into {} groups by '{}'",
        dataset.len(),
        samples.len(),
        group_key
    );

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_reader::read_csv;
    use approx::assert_relative_eq;

    fn make_data(csv: &str) -> Dataset {
        Dataset::from_csv(read_csv(csv.as_bytes()).unwrap()).unwrap()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_summary_population_statistics() {
        let s = Summary::from_values(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(s.mean, 2.0);
        assert_relative_eq!(s.std_dev, 0.816_496_580_927_726, epsilon = 1e-12);
        assert_relative_eq!(s.std_err, 0.471_404_520_791_031_7, epsilon = 1e-12);
        assert_eq!(s.std_err, s.std_dev / 3f64.sqrt());
    }

    #[test]
    fn test_summary_single_value() {
        let s = Summary::from_values(&[4.0]).unwrap();
        assert_eq!(s.mean, 4.0);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.std_err, 0.0);
        assert!(Summary::from_values(&[]).is_none());
    }

    #[test]
    fn test_first_occurrence_order() {
        let data = make_data("g,v\nB,1\nA,2\nB,3\nA,4\n");
        let groups = aggregate(&data, "g", &cols(&["v"])).unwrap();
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "A"]);
        assert_eq!(groups[0].values, vec![1.0, 3.0]);
        assert_eq!(groups[1].values, vec![2.0, 4.0]);
    }

    #[test]
    fn test_multiple_columns_are_pooled_row_major() {
        let data = make_data("g,a,b\nA,1,10\nA,2,20\nB,5,6\n");
        let groups = aggregate(&data, "g", &cols(&["a", "b"])).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].values, vec![1.0, 10.0, 2.0, 20.0]);
        assert_eq!(groups[0].mean(), 8.25);
        assert_eq!(groups[1].values, vec![5.0, 6.0]);
    }

    #[test]
    fn test_duplicate_value_column_counted_once() {
        let data = make_data("g,a\nA,1\nA,3\n");
        let groups = aggregate(&data, "g", &cols(&["a", "a"])).unwrap();
        assert_eq!(groups[0].values, vec![1.0, 3.0]);
    }

    #[test]
    fn test_numeric_group_labels() {
        let data = make_data("dose,v\n10,1\n2.5,2\n10,3\n");
        let groups = aggregate(&data, "dose", &cols(&["v"])).unwrap();
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["10", "2.5"]);
    }

    #[test]
    fn test_missing_group_value_rows_skipped() {
        let data = make_data("g,v\nA,1\n,100\nA,3\n");
        let groups = aggregate(&data, "g", &cols(&["v"])).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].values, vec![1.0, 3.0]);
    }

    #[test]
    fn test_all_group_values_missing_yields_no_groups() {
        let data = make_data("g,v\n,1\n,2\n");
        let groups = aggregate(&data, "g", &cols(&["v"])).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_non_numeric_value_is_data_type_error() {
        let data = make_data("g,v\nA,1\nB,oops\n");
        match aggregate(&data, "g", &cols(&["v"])) {
            Err(ChartError::DataType { column, row, value }) => {
                assert_eq!(column, "v");
                assert_eq!(row, 2);
                assert_eq!(value, "oops");
            }
            other => panic!("expected DataType error, got {:?}", other),
        }
    }

    #[test]
    fn test_nan_token_is_data_type_error() {
        for token in ["NaN", "nan", "inf", "-Infinity", "1e309"] {
            let data = make_data(&format!("g,v\nA,1\nA,{}\nB,3\n", token));
            match aggregate(&data, "g", &cols(&["v"])) {
                Err(ChartError::DataType { column, row, .. }) => {
                    assert_eq!(column, "v");
                    assert_eq!(row, 2, "token {}", token);
                }
                other => panic!("token {} aggregated: {:?}", token, other),
            }
        }
    }

    #[test]
    fn test_nan_group_value_rows_skipped() {
        let data = make_data("g,v\nA,1\nNaN,5\nA,3\n");
        let groups = aggregate(&data, "g", &cols(&["v"])).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].values, vec![1.0, 3.0]);
    }

    #[test]
    fn test_missing_value_is_data_type_error() {
        let data = make_data("g,v\nA,1\nA,\n");
        let result = aggregate(&data, "g", &cols(&["v"]));
        assert!(matches!(result, Err(ChartError::DataType { row: 2, .. })));
    }

    #[test]
    fn test_unknown_columns_are_configuration_errors() {
        let data = make_data("g,v\nA,1\n");
        assert!(matches!(
            aggregate(&data, "group", &cols(&["v"])),
            Err(ChartError::Configuration(_))
        ));
        assert!(matches!(
            aggregate(&data, "g", &cols(&["value"])),
            Err(ChartError::Configuration(_))
        ));
        assert!(matches!(
            aggregate(&data, "g", &[]),
            Err(ChartError::Configuration(_))
        ));
    }

    #[test]
    fn test_group_count_matches_distinct_keys() {
        let data = make_data("g,v\nx,1\ny,2\nz,3\nx,4\ny,5\n");
        let groups = aggregate(&data, "g", &cols(&["v"])).unwrap();
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| !g.values.is_empty()));
    }
}
