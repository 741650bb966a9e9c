pub mod annotate;
pub mod contours;
pub mod moments;
pub mod preprocessing;

use image::{ImageReader, RgbImage};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::AnalyzerConfig;
use crate::error::{Result, SpotscanError};
use crate::models::{DetectedObject, Frame};

/// Result of analyzing one in-memory frame
#[derive(Debug, Clone)]
pub struct ImageAnalysis {
    pub objects: Vec<DetectedObject>,
    /// Color view with region outlines and centroid markers drawn on it
    pub annotated: RgbImage,
}

/// Per-image detector: decode, extract regions, measure them and write the
/// annotated visualization.
#[derive(Debug, Clone, Default)]
pub struct ImageAnalyzer {
    config: AnalyzerConfig,
    visual_dir: Option<PathBuf>,
}

impl ImageAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            visual_dir: None,
        }
    }

    /// Write an annotated copy of every decoded image into `dir`.
    pub fn with_visual_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.visual_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one image file.
    ///
    /// Never fails: an image that cannot be decoded is logged and
    /// contributes no objects.
    pub fn analyze(&self, path: &Path) -> Vec<DetectedObject> {
        let frame = match decode_frame(path) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let source = source_name(path);
        let analysis = self.analyze_frame(frame, &source);

        if let Some(visual_dir) = &self.visual_dir {
            let out_path = visual_dir.join(&source);
            if let Err(e) = save_visualization(&analysis.annotated, &out_path) {
                warn!("{}", e);
            }
        }

        analysis.objects
    }

    /// Run detection on an already decoded frame, tagging every object
    /// with `source`.
    pub fn analyze_frame(&self, frame: Frame, source: &str) -> ImageAnalysis {
        let boundaries = contours::extract(&frame, &self.config);
        debug!(source, regions = boundaries.len(), "Extracted regions");

        let measured: Vec<_> = boundaries
            .into_iter()
            .filter_map(|boundary| {
                moments::measure(&boundary, &frame).map(|measurement| (boundary, measurement))
            })
            .collect();

        let mut annotated = frame.color;
        let mut objects = Vec::with_capacity(measured.len());
        for (boundary, measurement) in measured {
            annotate::draw_boundary(&mut annotated, &boundary);
            annotate::draw_marker(&mut annotated, &measurement);
            objects.push(measurement.into_object(source));
        }

        debug!(source, objects = objects.len(), "Measured objects");

        ImageAnalysis { objects, annotated }
    }
}

/// Decode an image once into aligned grayscale and color views.
pub fn decode_frame(path: &Path) -> Result<Frame> {
    let open_err = |source| SpotscanError::Open {
        path: path.to_path_buf(),
        source,
    };

    let img = ImageReader::open(path)
        .map_err(open_err)?
        .with_guessed_format()
        .map_err(open_err)?
        .decode()
        .map_err(|source| SpotscanError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Frame::from_dynamic(&img))
}

/// Base filename used to tag objects and name the visualization.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn save_visualization(img: &RgbImage, out_path: &Path) -> Result<()> {
    img.save(out_path).map_err(|source| SpotscanError::WriteImage {
        path: out_path.to_path_buf(),
        source,
    })
}
