//! semstats: chart-data pipeline for the course analytics dashboard
//!
//! Per-semester JSON summaries of team repository activity flow through
//! `loader` -> `transform` -> `presenter`, driven per panel by the
//! `metrics` registry and re-run on every semester change by `pipeline`.

pub mod app;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod display;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod presenter;
pub mod semester;
pub mod transform;

pub use dataset::MetricDataset;
pub use semester::Semester;
