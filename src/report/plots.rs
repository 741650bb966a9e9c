use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};

use crate::error::{Result, SpotscanError};
use crate::models::AnalysisBatch;
use crate::report::document::{self, ReportPage};

pub const HISTOGRAM_BINS: usize = 30;

pub(crate) const PLOT_WIDTH: u32 = 640;
pub(crate) const PLOT_HEIGHT: u32 = 480;
pub(crate) const MARGIN_LEFT: u32 = 60;
pub(crate) const MARGIN_RIGHT: u32 = 20;
pub(crate) const MARGIN_TOP: u32 = 20;
pub(crate) const MARGIN_BOTTOM: u32 = 50;
pub(crate) const GRID_LINES: u32 = 5;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const GRID_COLOR: Rgb<u8> = Rgb([220, 220, 220]);

/// Bar colors at 70% opacity over white
pub const BRIGHTNESS_COLOR: Rgb<u8> = Rgb([77, 77, 255]);
pub const AREA_COLOR: Rgb<u8> = Rgb([77, 166, 77]);

/// Equal-width frequency distribution.
///
/// Every bin is half-open except the last, which also includes the upper
/// edge. A degenerate range is widened by 0.5 on each side; no values at
/// all bins over `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

        let (mut lo, mut hi) = if finite.is_empty() {
            (0.0, 1.0)
        } else {
            finite.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
        };
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins)
            .map(|i| if i == bins { hi } else { lo + width * i as f64 })
            .collect();

        let mut counts = vec![0; bins];
        for v in finite {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self { edges, counts }
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Render a histogram as a bar chart with axes and a light grid.
pub fn render_histogram(hist: &Histogram, bar_color: Rgb<u8>) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(PLOT_WIDTH, PLOT_HEIGHT, BACKGROUND);

    let left = MARGIN_LEFT as f32;
    let right = (PLOT_WIDTH - MARGIN_RIGHT) as f32;
    let top = MARGIN_TOP as f32;
    let bottom = (PLOT_HEIGHT - MARGIN_BOTTOM) as f32;
    let plot_w = right - left;
    let plot_h = bottom - top;

    for i in 0..=GRID_LINES {
        let t = i as f32 / GRID_LINES as f32;
        let y = bottom - t * plot_h;
        let x = left + t * plot_w;
        draw_line_segment_mut(&mut canvas, (left, y), (right, y), GRID_COLOR);
        draw_line_segment_mut(&mut canvas, (x, top), (x, bottom), GRID_COLOR);
    }

    let max_count = hist.max_count();
    if max_count > 0 {
        let bar_w = plot_w / hist.bins() as f32;
        for (i, &count) in hist.counts.iter().enumerate() {
            let bar_h = (count as f32 / max_count as f32 * plot_h).round() as u32;
            let x0 = (left + i as f32 * bar_w).round() as i32;
            let x1 = (left + (i + 1) as f32 * bar_w).round() as i32;
            let width = (x1 - x0 - 1).max(1) as u32;
            if bar_h == 0 {
                continue;
            }
            let rect = Rect::at(x0, bottom as i32 - bar_h as i32).of_size(width, bar_h);
            draw_filled_rect_mut(&mut canvas, rect, bar_color);
        }
    }

    draw_line_segment_mut(&mut canvas, (left, bottom), (right, bottom), AXIS_COLOR);
    draw_line_segment_mut(&mut canvas, (left, top), (left, bottom), AXIS_COLOR);

    canvas
}

/// Files produced by [`write_plots`]
#[derive(Debug, Clone)]
pub struct PlotPaths {
    pub brightness: PathBuf,
    pub area: PathBuf,
    pub report: PathBuf,
}

/// Write the brightness and area histograms as PNG images, plus a two-page
/// PDF report with one titled, labelled page per histogram.
pub fn write_plots(batch: &AnalysisBatch, plots_dir: &Path) -> Result<PlotPaths> {
    let paths = PlotPaths {
        brightness: plots_dir.join("brightness_hist.png"),
        area: plots_dir.join("area_hist.png"),
        report: plots_dir.join("summary_report.pdf"),
    };

    let brightness = histogram_page(
        "Object brightness",
        "Brightness",
        Histogram::from_values(&batch.brightness_values(), HISTOGRAM_BINS),
        BRIGHTNESS_COLOR,
    );
    let area = histogram_page(
        "Object area",
        "Area",
        Histogram::from_values(&batch.area_values(), HISTOGRAM_BINS),
        AREA_COLOR,
    );

    save_png(&brightness.chart, &paths.brightness)?;
    save_png(&area.chart, &paths.area)?;
    document::write_report(&[brightness, area], &paths.report)?;

    Ok(paths)
}

fn histogram_page(title: &str, x_label: &str, histogram: Histogram, color: Rgb<u8>) -> ReportPage {
    ReportPage {
        title: title.to_string(),
        x_label: x_label.to_string(),
        y_label: "Count".to_string(),
        chart: render_histogram(&histogram, color),
        histogram,
    }
}

fn save_png(img: &RgbImage, path: &Path) -> Result<()> {
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| SpotscanError::WriteImage {
            path: path.to_path_buf(),
            source,
        })
}
