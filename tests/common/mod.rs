#![allow(dead_code, unused_imports)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from spotscan for tests
pub use spotscan::detection::{contours, moments, preprocessing};
pub use spotscan::{
    AnalysisBatch, AnalyzerConfig, BatchOrchestrator, DetectedObject, Frame, ImageAnalyzer, Point,
    RegionBoundary,
};
