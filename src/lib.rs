//! chart-zones: custom non-uniform value axes and threshold-band editing for
//! sensor charts.
//!
//! `core` holds the pure pieces: the piecewise-linear [`core::AxisTransform`]
//! that renders uneven breakpoints on even ticks, and the contiguous
//! [`core::BandList`] with its edit reducer. `api` wraps them in the
//! per-chart [`api::ProfileManager`] state machine and the persistence
//! boundary it talks to.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{BandEditorConfig, ProfileManager};
pub use error::{ChartError, ChartResult};
