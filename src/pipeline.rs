//! End-to-end pipeline: table + selections + settings → chart.
//!
//! Each call works on its own snapshot of the inputs and allocates fresh
//! output; nothing is shared between renders.

use crate::aggregate::aggregate;
use crate::config::ChartConfig;
use crate::data::Dataset;
use crate::error::{ChartError, Result};
use crate::graph;
use crate::ir::ChartDescription;
use crate::layout::layout_with_rng;
use rand::Rng;

/// File name under which an exported chart is offered.
pub const EXPORT_FILE_NAME: &str = "graph.png";
/// MIME type of an exported chart.
pub const EXPORT_MIME_TYPE: &str = "image/png";

pub const SELECTION_PROMPT: &str = "Select a grouping column and at least one data column";

/// Which columns to chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub group_column: Option<String>,
    pub value_columns: Vec<String>,
}

impl Selection {
    pub fn new<S: Into<String>>(group_column: S, value_columns: &[&str]) -> Self {
        Self {
            group_column: Some(group_column.into()),
            value_columns: value_columns.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Both a grouping column and at least one value column are chosen.
    pub fn is_complete(&self) -> bool {
        self.group_column.is_some() && !self.value_columns.is_empty()
    }
}

/// Result of a render request that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    /// Selections are incomplete; the message prompts the user.
    NeedsInput(String),
    /// The selections matched no plottable rows.
    Empty(String),
}

impl<T> Outcome<T> {
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Ready(v) => Outcome::Ready(f(v)),
            Outcome::NeedsInput(m) => Outcome::NeedsInput(m),
            Outcome::Empty(m) => Outcome::Empty(m),
        }
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Outcome::Ready(v) => Some(v),
            _ => None,
        }
    }

    /// User-visible message for the non-chart states.
    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Ready(_) => None,
            Outcome::NeedsInput(m) | Outcome::Empty(m) => Some(m),
        }
    }
}

/// An encoded chart ready for display or download.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub description: ChartDescription,
    pub png: Vec<u8>,
}

impl RenderedChart {
    pub fn file_name(&self) -> &'static str {
        EXPORT_FILE_NAME
    }

    pub fn mime_type(&self) -> &'static str {
        EXPORT_MIME_TYPE
    }
}

/// Aggregate and lay out a chart without encoding it.
///
/// The configuration is validated before any data is touched, so an invalid
/// setting aborts the render with a configuration error.
pub fn build_chart<R: Rng>(
    dataset: &Dataset,
    selection: &Selection,
    config: &ChartConfig,
    rng: &mut R,
) -> Result<Outcome<ChartDescription>> {
    let group_column = match &selection.group_column {
        Some(col) if !selection.value_columns.is_empty() => col,
        _ => return Ok(Outcome::NeedsInput(SELECTION_PROMPT.to_string())),
    };

    let config = config.clone().validate()?;
    let groups = aggregate(dataset, group_column, &selection.value_columns)?;

    if groups.is_empty() {
        log::info!("no plottable rows for group column '{}'", group_column);
        return Ok(Outcome::Empty(ChartError::EmptyResult.to_string()));
    }

    Ok(Outcome::Ready(layout_with_rng(&groups, &config, rng)))
}

/// Full render with the thread RNG, encoded as PNG.
pub fn render_chart(
    dataset: &Dataset,
    selection: &Selection,
    config: &ChartConfig,
) -> Result<Outcome<RenderedChart>> {
    render_chart_with_rng(dataset, selection, config, &mut rand::rng())
}

pub fn render_chart_with_rng<R: Rng>(
    dataset: &Dataset,
    selection: &Selection,
    config: &ChartConfig,
    rng: &mut R,
) -> Result<Outcome<RenderedChart>> {
    let description = match build_chart(dataset, selection, config, rng)? {
        Outcome::Ready(desc) => desc,
        Outcome::NeedsInput(m) => return Ok(Outcome::NeedsInput(m)),
        Outcome::Empty(m) => return Ok(Outcome::Empty(m)),
    };

    let png = graph::render_png(&description)?;
    log::info!(
        "rendered {} groups into {} bytes of PNG",
        description.bars.len(),
        png.len()
    );
    Ok(Outcome::Ready(RenderedChart { description, png }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_reader::read_csv;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_data(csv: &str) -> Dataset {
        Dataset::from_csv(read_csv(csv.as_bytes()).unwrap()).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(3)
    }

    #[test]
    fn test_unset_group_prompts() {
        let data = make_data("g,v\nA,1\n");
        let selection = Selection {
            group_column: None,
            value_columns: vec!["v".to_string()],
        };
        let outcome = build_chart(&data, &selection, &ChartConfig::default(), &mut rng()).unwrap();
        assert_eq!(outcome, Outcome::NeedsInput(SELECTION_PROMPT.to_string()));
    }

    #[test]
    fn test_empty_value_selection_prompts() {
        let data = make_data("g,v\nA,1\n");
        let selection = Selection::new("g", &[]);
        let outcome = build_chart(&data, &selection, &ChartConfig::default(), &mut rng()).unwrap();
        assert!(matches!(outcome, Outcome::NeedsInput(_)));
    }

    #[test]
    fn test_invalid_tick_interval_aborts() {
        let data = make_data("g,v\nA,1\n");
        let config = ChartConfig {
            y_tick_interval: 0.0,
            ..ChartConfig::default()
        };
        let result = build_chart(&data, &Selection::new("g", &["v"]), &config, &mut rng());
        assert!(matches!(result, Err(ChartError::Configuration(_))));
    }

    #[test]
    fn test_no_groups_is_empty_outcome() {
        let data = make_data("g,v\n,1\n");
        let outcome = build_chart(&data, &Selection::new("g", &["v"]), &ChartConfig::default(), &mut rng())
            .unwrap();
        assert_eq!(outcome, Outcome::Empty(ChartError::EmptyResult.to_string()));
    }

    #[test]
    fn test_ready_chart() {
        let data = make_data("g,v\nB,1\nA,2\nB,3\n");
        let desc = build_chart(&data, &Selection::new("g", &["v"]), &ChartConfig::default(), &mut rng())
            .unwrap()
            .ready()
            .unwrap();
        assert_eq!(desc.bars.len(), 2);
        assert_eq!(desc.bars[0].label, "B");
        assert_eq!(desc.bars[0].top, 2.0);
    }

    #[test]
    fn test_outcome_map_keeps_messages() {
        let o: Outcome<u8> = Outcome::Empty("nothing".to_string());
        assert_eq!(o.map(|v| v + 1), Outcome::Empty("nothing".to_string()));
        assert_eq!(Outcome::Ready(1u8).map(|v| v + 1), Outcome::Ready(2));
    }
}
