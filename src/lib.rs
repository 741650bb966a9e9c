pub mod config;
pub mod detection;
pub mod error;
pub mod input;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod report;

pub use config::{AnalyzerConfig, PathsConfig, Settings};
pub use detection::{ImageAnalysis, ImageAnalyzer};
pub use error::{Result, SpotscanError};
pub use models::{
    AnalysisBatch, DetectedObject, Frame, Point, RegionBoundary, RegionMeasurement,
};
pub use pipeline::BatchOrchestrator;
