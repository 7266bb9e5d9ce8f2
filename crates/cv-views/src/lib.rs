//! Chart engine: aggregation, geometry and vector output for the chart families

pub mod config;
pub mod engine;
pub mod export;
pub mod plots;
pub mod svg;

pub use config::{Canvas, ChartConfig};
pub use engine::{ChartEngine, ChartOutcome};
pub use export::{export, ExportFormat};
pub use plots::{Axes, ChartGeometry, Point, Rect, Segment, Tick};
pub use svg::{render_placeholder_svg, render_svg};
