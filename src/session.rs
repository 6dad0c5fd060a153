//! Interactive state: the uploaded table, column selections and settings.
//!
//! A host (CLI, web handler, UI) owns one `Session` and feeds it user
//! actions. Every render works on a snapshot of the current state.

use crate::config::ChartConfig;
use crate::data::{Cell, Dataset};
use crate::error::{ChartError, Result};
use crate::pipeline::{render_chart_with_rng, Outcome, RenderedChart, Selection};
use rand::Rng;

pub const NO_DATA_MESSAGE: &str = "No data has been uploaded";

#[derive(Debug, Clone, Default)]
pub struct Session {
    dataset: Option<Dataset>,
    selection: Selection,
    config: ChartConfig,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current table.
    ///
    /// Selections that still name columns of the new table are kept; the
    /// rest are cleared.
    pub fn load_dataset(&mut self, dataset: Dataset) {
        if let Some(group) = &self.selection.group_column {
            if !dataset.has_column(group) {
                log::debug!("dropping group selection '{}'", group);
                self.selection.group_column = None;
            }
        }
        self.selection
            .value_columns
            .retain(|col| dataset.has_column(col));

        log::info!(
            "loaded table with {} columns and {} rows",
            dataset.headers().len(),
            dataset.len()
        );
        self.dataset = Some(dataset);
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Column names offered for selection, in table order.
    pub fn columns(&self) -> &[String] {
        self.dataset.as_ref().map(|d| d.headers()).unwrap_or(&[])
    }

    pub fn select_group(&mut self, column: Option<&str>) -> Result<()> {
        if let Some(col) = column {
            self.require_column(col)?;
        }
        self.selection.group_column = column.map(str::to_string);
        Ok(())
    }

    pub fn select_values<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<()> {
        for col in columns {
            self.require_column(col.as_ref())?;
        }
        self.selection.value_columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        Ok(())
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_config(&mut self, config: ChartConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ChartConfig {
        &mut self.config
    }

    /// First `n` rows of the table for display.
    pub fn preview(&self, n: usize) -> &[Vec<Cell>] {
        match &self.dataset {
            Some(d) => &d.rows()[..n.min(d.len())],
            None => &[],
        }
    }

    pub fn render(&self) -> Result<Outcome<RenderedChart>> {
        self.render_with_rng(&mut rand::rng())
    }

    pub fn render_with_rng<R: Rng>(&self, rng: &mut R) -> Result<Outcome<RenderedChart>> {
        match &self.dataset {
            Some(dataset) => render_chart_with_rng(dataset, &self.selection, &self.config, rng),
            None => Ok(Outcome::NeedsInput(NO_DATA_MESSAGE.to_string())),
        }
    }

    fn require_column(&self, name: &str) -> Result<()> {
        let dataset = self
            .dataset
            .as_ref()
            .ok_or_else(|| ChartError::config(NO_DATA_MESSAGE))?;
        if dataset.has_column(name) {
            Ok(())
        } else {
            Err(ChartError::config(format!(
                "Column '{}' not found. Available columns: {}",
                name,
                dataset.headers().join(", ")
            )))
        }
    }
}
