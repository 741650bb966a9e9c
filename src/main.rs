use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use spotscan::{BatchOrchestrator, ImageAnalyzer, Settings, input, logging, report};

#[derive(Parser)]
#[command(name = "spotscan")]
#[command(about = "Detect bright objects in a directory of images")]
struct Cli {
    /// TOML settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory containing the input images
    #[arg(long, value_name = "DIR")]
    images: Option<PathBuf>,

    /// Directory for the CSV, visualizations and plots
    #[arg(long, value_name = "DIR")]
    results: Option<PathBuf>,

    /// Binarization threshold (0-255)
    #[arg(long)]
    threshold: Option<u8>,

    /// Minimum region area in pixels
    #[arg(long)]
    min_area: Option<f64>,

    /// Gaussian blur radius (0 disables blurring)
    #[arg(long)]
    blur_radius: Option<u32>,

    /// Maximum number of images analyzed concurrently
    #[arg(long)]
    workers: Option<usize>,

    /// Skip writing annotated images
    #[arg(long)]
    no_visuals: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(images) = &self.images {
            settings.paths.images_dir = images.clone();
        }
        if let Some(results) = &self.results {
            settings.paths = settings.paths.with_results_dir(results.clone());
        }
        if let Some(threshold) = self.threshold {
            settings.analyzer.threshold = threshold;
        }
        if let Some(min_area) = self.min_area {
            settings.analyzer.min_area = min_area;
        }
        if let Some(blur_radius) = self.blur_radius {
            settings.analyzer.blur_radius = blur_radius;
        }
        if self.workers.is_some() {
            settings.workers = self.workers;
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::setup_logging(if args.verbose { "debug" } else { "info" })?;

    let settings = args.settings()?;
    settings.paths.create_dirs()?;

    let images = input::discover_images(&settings.paths.images_dir)?;
    if images.is_empty() {
        warn!("No images found in {}", settings.paths.images_dir.display());
    }

    let orchestrator = if args.no_visuals {
        BatchOrchestrator::new(
            ImageAnalyzer::new(settings.analyzer.clone()),
            settings.worker_count(),
        )
    } else {
        BatchOrchestrator::from_settings(&settings)
    };

    let batch = orchestrator.run(images).await;

    let csv_path = settings.paths.csv_path();
    report::write_csv(&batch, &csv_path)?;
    info!("Results saved to {}", csv_path.display());

    let plots = report::write_plots(&batch, &settings.paths.plots_dir)?;
    info!(
        "Plots saved to {} and {}, report at {}",
        plots.brightness.display(),
        plots.area.display(),
        plots.report.display()
    );

    Ok(())
}
