use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SpotscanError};

/// Largest accepted `blur_radius`.
pub const MAX_BLUR_RADIUS: u32 = 64;

/// Parameters of the per-image detection algorithm.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Gaussian kernel radius; the kernel spans `2 * blur_radius + 1` taps.
    /// Zero disables blurring.
    pub blur_radius: u32,
    /// Pixels strictly brighter than this (after blurring) are foreground.
    pub threshold: u8,
    /// Regions enclosing less area than this are discarded.
    pub min_area: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            blur_radius: 2,
            threshold: 150,
            min_area: 10.0,
        }
    }
}

impl AnalyzerConfig {
    /// Gaussian sigma implied by the kernel size, or `None` when blurring is off.
    pub fn blur_sigma(&self) -> Option<f32> {
        if self.blur_radius == 0 {
            return None;
        }
        // (ksize - 1) / 2 with ksize = 2r + 1
        let half = self.blur_radius as f32;
        Some(0.3 * (half - 1.0) + 0.8)
    }
}

/// Input and output locations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub images_dir: PathBuf,
    pub results_dir: PathBuf,
    pub visual_dir: PathBuf,
    pub plots_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let results_dir = PathBuf::from("results");
        Self {
            images_dir: PathBuf::from("images"),
            visual_dir: results_dir.join("visual"),
            plots_dir: results_dir.join("plots"),
            results_dir,
        }
    }
}

impl PathsConfig {
    /// Re-root the visual and plots directories under a new results directory.
    pub fn with_results_dir(mut self, results_dir: PathBuf) -> Self {
        self.visual_dir = results_dir.join("visual");
        self.plots_dir = results_dir.join("plots");
        self.results_dir = results_dir;
        self
    }

    pub fn csv_path(&self) -> PathBuf {
        self.results_dir.join("analysis_results.csv")
    }

    /// Create every output directory that does not exist yet.
    pub fn create_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.results_dir)?;
        fs::create_dir_all(&self.visual_dir)?;
        fs::create_dir_all(&self.plots_dir)?;
        Ok(())
    }
}

/// Everything a run needs, passed explicitly into the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analyzer: AnalyzerConfig,
    pub paths: PathsConfig,
    /// Upper bound on concurrently analyzed images. `None` uses the
    /// available hardware parallelism.
    pub workers: Option<usize>,
}

impl Settings {
    /// Load and validate settings from a TOML file. Missing keys fall back
    /// to defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SpotscanError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let settings =
            Self::from_toml_str(&content).map_err(|source| SpotscanError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.analyzer.min_area.is_finite() || self.analyzer.min_area < 0.0 {
            return Err(SpotscanError::InvalidConfig(format!(
                "min_area must be a finite, non-negative number (got {})",
                self.analyzer.min_area
            )));
        }
        if self.analyzer.blur_radius > MAX_BLUR_RADIUS {
            return Err(SpotscanError::InvalidConfig(format!(
                "blur_radius must be at most {} (got {})",
                MAX_BLUR_RADIUS, self.analyzer.blur_radius
            )));
        }
        if self.workers == Some(0) {
            return Err(SpotscanError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Worker count to use for this run.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
