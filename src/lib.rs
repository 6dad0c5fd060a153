//! Library exports for dotbar.

pub mod csv_reader;
pub mod data;
pub mod error;
pub mod graph;

pub mod aggregate;
pub mod config;
pub mod ir;
pub mod layout;
pub mod overrides;
pub mod pipeline;
pub mod scale;
pub mod session;
pub mod style;

pub use config::{ChartConfig, ValidatedConfig};
pub use data::{Cell, Dataset};
pub use error::{ChartError, Result};
pub use pipeline::{build_chart, render_chart, Outcome, RenderedChart, Selection};
pub use session::Session;
