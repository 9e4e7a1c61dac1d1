//! Records scalar measurements from an iterative process into a CSV log and renders the log as
//! line plots with optional boundary-aware smoothing.
//!
//! The library API ([`Recorder`], [`Renderer`], [`smooth`]) is the contract. The `scalar_log`
//! binary is a thin secondary front end that maps command-line arguments onto those calls.
//!
//! ```no_run
//! use scalar_log::{record, render, Figure, Measurements, RenderOptions};
//!
//! # fn main() -> Result<(), scalar_log::LogError> {
//! for iteration in 0..100 {
//!     let loss = 1.0 / (iteration as f64 + 1.0);
//!     record("train.csv", &Measurements::new().with("loss", loss), iteration)?;
//! }
//!
//! let mut figure = Figure::new("train.svg");
//! let series = render("train.csv", &RenderOptions::new().title("loss"), &mut figure)?;
//! assert_eq!(series.get("loss").map(|v| v.len()), Some(100));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod logger;
pub mod model;
pub mod recorder;
pub mod renderer;
pub mod smoother;
pub mod style;
pub mod surface;

pub use logger::Logger;
pub use model::error::{ErrorKind, LogError};
pub use model::measurements::{Measurements, Scalar};
pub use model::table::SeriesTable;
pub use recorder::{record, Recorder};
pub use renderer::{render, RenderOptions, Renderer, Selection, Series, SeriesSet};
pub use smoother::smooth;
pub use style::{Palette, LINE_STYLES, MARKERS};
pub use surface::{Figure, FigureConfig, Surface};
