use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::config::Settings;
use crate::detection::ImageAnalyzer;
use crate::models::{AnalysisBatch, DetectedObject};

/// Runs the image analyzer over a set of images on a bounded worker pool
/// and merges the results into one brightness-sorted batch.
///
/// Holds no state between runs.
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    analyzer: Arc<ImageAnalyzer>,
    workers: usize,
}

impl BatchOrchestrator {
    pub fn new(analyzer: ImageAnalyzer, workers: usize) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            workers: workers.max(1),
        }
    }

    /// Build an orchestrator from run settings: analyzer parameters,
    /// visualization directory and worker count.
    pub fn from_settings(settings: &Settings) -> Self {
        let analyzer = ImageAnalyzer::new(settings.analyzer.clone())
            .with_visual_dir(settings.paths.visual_dir.clone());
        Self::new(analyzer, settings.worker_count())
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Analyze every image concurrently, wait for all of them, then merge.
    ///
    /// Output order depends only on the input order and the analyzer,
    /// never on which task finishes first.
    pub async fn run(&self, image_paths: Vec<PathBuf>) -> AnalysisBatch {
        let total = image_paths.len();
        if total == 0 {
            return AnalysisBatch::default();
        }

        info!("Analyzing {} images with {} workers", total, self.workers);

        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for (index, path) in image_paths.into_iter().enumerate() {
            let analyzer = Arc::clone(&self.analyzer);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                // The semaphore is never closed, so acquiring cannot fail
                let _permit = permits.acquire_owned().await.ok();
                let objects = tokio::task::spawn_blocking(move || analyzer.analyze(&path)).await;
                (index, objects)
            });
        }

        let mut per_image: Vec<Vec<DetectedObject>> = vec![Vec::new(); total];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(objects))) => {
                    debug!("Image {} of {} produced {} objects", index + 1, total, objects.len());
                    per_image[index] = objects;
                }
                Ok((index, Err(e))) => {
                    error!("Analysis task for image {} failed: {}", index + 1, e);
                }
                Err(e) => {
                    error!("Analysis task failed: {}", e);
                }
            }
        }

        let batch = AnalysisBatch::from_per_image(per_image);
        info!("Detected {} objects across {} images", batch.len(), total);
        batch
    }
}
