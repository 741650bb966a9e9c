//! Output collaborators: the results table, the distribution plots and the
//! PDF summary report.

pub mod document;
pub mod plots;
pub mod table;

pub use document::{ReportPage, write_report};
pub use plots::{Histogram, PlotPaths, render_histogram, write_plots};
pub use table::write_csv;
