use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use std::path::Path;

use crate::error::Result;
use crate::report::plots::{self, Histogram};

const PAGE_WIDTH: i64 = 720;
const PAGE_HEIGHT: i64 = 600;
/// Lower-left corner of the chart image on the page
const CHART_X: i64 = 40;
const CHART_Y: i64 = 60;

const TITLE_SIZE: i64 = 16;
const LABEL_SIZE: i64 = 11;
const TICK_SIZE: i64 = 9;

/// One titled histogram page of the summary report.
#[derive(Debug, Clone)]
pub struct ReportPage {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub histogram: Histogram,
    pub chart: RgbImage,
}

/// Write a PDF with one page per entry. Each page embeds the rendered chart
/// and draws its title, axis labels and tick values in Helvetica.
pub fn write_report(pages: &[ReportPage], path: &Path) -> Result<()> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let page_id = add_page(&mut doc, pages_id, font_id, page)?;
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "MediaBox" => vec![int(0), int(0), int(PAGE_WIDTH), int(PAGE_HEIGHT)],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.compress();
    doc.save(path)?;
    Ok(())
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    page: &ReportPage,
) -> Result<ObjectId> {
    let (chart_w, chart_h) = page.chart.dimensions();
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => chart_w as i64,
            "Height" => chart_h as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8i64,
        },
        page.chart.as_raw().clone(),
    ));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
        "XObject" => dictionary! { "Im1" => image_id },
    });

    let mut ops = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                int(chart_w as i64),
                int(0),
                int(0),
                int(chart_h as i64),
                int(CHART_X),
                int(CHART_Y),
            ],
        ),
        Operation::new("Do", vec!["Im1".into()]),
        Operation::new("Q", vec![]),
    ];

    let area = PlotArea::on_page(chart_h as i64);
    let top = CHART_Y + chart_h as i64;

    text(&mut ops, TITLE_SIZE, CHART_X, top + 25, &page.title);
    text(
        &mut ops,
        LABEL_SIZE,
        (area.left + area.right) / 2 - text_width(&page.x_label, LABEL_SIZE) / 2,
        area.bottom - 36,
        &page.x_label,
    );
    rotated_text(
        &mut ops,
        LABEL_SIZE,
        area.left - 42,
        (area.bottom + area.top) / 2 - text_width(&page.y_label, LABEL_SIZE) / 2,
        &page.y_label,
    );

    let edges = &page.histogram.edges;
    let (lo, hi) = match (edges.first(), edges.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => (0.0, 1.0),
    };
    let max_count = page.histogram.max_count().max(1) as f64;

    for i in 0..=plots::GRID_LINES {
        let t = i as f64 / plots::GRID_LINES as f64;

        let x_tick = format_tick(lo + t * (hi - lo));
        let x = area.left + (t * (area.right - area.left) as f64).round() as i64;
        text(
            &mut ops,
            TICK_SIZE,
            x - text_width(&x_tick, TICK_SIZE) / 2,
            area.bottom - 14,
            &x_tick,
        );

        let y_tick = format_tick(t * max_count);
        let y = area.bottom + (t * (area.top - area.bottom) as f64).round() as i64;
        text(
            &mut ops,
            TICK_SIZE,
            area.left - 4 - text_width(&y_tick, TICK_SIZE),
            y - TICK_SIZE / 3,
            &y_tick,
        );
    }

    let content = Content { operations: ops }.encode()?;
    // Text stays readable in the file; only the images get deflated
    let content_id =
        doc.add_object(Stream::new(dictionary! {}, content).with_compression(false));
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    }))
}

/// Plot rectangle of the embedded chart, in page coordinates.
struct PlotArea {
    left: i64,
    right: i64,
    bottom: i64,
    top: i64,
}

impl PlotArea {
    fn on_page(chart_h: i64) -> Self {
        Self {
            left: CHART_X + plots::MARGIN_LEFT as i64,
            right: CHART_X + (plots::PLOT_WIDTH - plots::MARGIN_RIGHT) as i64,
            bottom: CHART_Y + plots::MARGIN_BOTTOM as i64,
            top: CHART_Y + chart_h - plots::MARGIN_TOP as i64,
        }
    }
}

fn text(ops: &mut Vec<Operation>, size: i64, x: i64, y: i64, value: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec!["F1".into(), int(size)]));
    ops.push(Operation::new("Td", vec![int(x), int(y)]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(value)]));
    ops.push(Operation::new("ET", vec![]));
}

/// Text running bottom to top, starting at `(x, y)`.
fn rotated_text(ops: &mut Vec<Operation>, size: i64, x: i64, y: i64, value: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec!["F1".into(), int(size)]));
    ops.push(Operation::new(
        "Tm",
        vec![int(0), int(1), int(-1), int(0), int(x), int(y)],
    ));
    ops.push(Operation::new("Tj", vec![Object::string_literal(value)]));
    ops.push(Operation::new("ET", vec![]));
}

/// Rough Helvetica advance; good enough for centering labels.
fn text_width(value: &str, size: i64) -> i64 {
    value.chars().count() as i64 * size * 11 / 20
}

fn format_tick(value: f64) -> String {
    if value.fract().abs() < 1e-9 || value.abs() >= 100.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn int(value: i64) -> Object {
    Object::Integer(value)
}
