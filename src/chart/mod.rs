//! Histogram rendering to a PNG data URI.
//!
//! The chart is drawn with plotters into an in-memory RGB buffer: title,
//! axis labels, translucent bars and a KDE curve scaled to counts. The
//! buffer is then encoded with `png`.

mod histogram;

use std::sync::OnceLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};

use crate::core::StatsError;

pub use histogram::{Histogram, kde};

pub const BINS: usize = 20;

const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
static FONT: OnceLock<Result<(), String>> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
    pub caption_size: u32,
    pub label_size: u32,
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub color: RGBColor,
    pub bar_alpha: f64,
    pub ticks: usize,
    pub kde_points: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            margin: 10,
            x_label_area: 40,
            y_label_area: 60,
            caption_size: 20,
            label_size: 14,
            title: "Price Distribution".to_string(),
            x_desc: "Price".to_string(),
            y_desc: "Frequency".to_string(),
            color: BLUE,
            bar_alpha: 0.4,
            ticks: 5,
            kde_points: 200,
        }
    }
}

fn ensure_font() -> Result<(), StatsError> {
    FONT.get_or_init(|| {
        register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).map_err(|_| "invalid font".to_string())
    })
    .clone()
    .map_err(StatsError::RenderError)
}

pub fn render_histogram(values: &[f64], style: &ChartStyle) -> Result<Vec<u8>, StatsError> {
    let hist = Histogram::build(values, BINS)?;

    let min_width = 2 * style.margin + style.y_label_area;
    let min_height = 2 * style.margin + style.x_label_area + style.caption_size;
    if style.width <= min_width || style.height <= min_height {
        return Err(StatsError::RenderError(format!(
            "margins leave no plot area in {}x{}",
            style.width, style.height
        )));
    }
    ensure_font()?;

    let n = hist.total() as f64;
    let xs: Vec<f64> = (0..style.kde_points)
        .map(|i| hist.lo + (hist.hi - hist.lo) * i as f64 / (style.kde_points - 1).max(1) as f64)
        .collect();
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let curve: Option<Vec<f64>> =
        kde(&finite, &xs).map(|d| d.into_iter().map(|y| y * n * hist.bin_width()).collect());
    // headroom above the tallest bar or the KDE peak
    let peak = curve
        .as_ref()
        .and_then(|c| c.iter().copied().reduce(f64::max))
        .unwrap_or(0.0)
        .max(hist.max_count() as f64);

    let mut pixels = vec![0u8; style.width as usize * style.height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (style.width, style.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&style.title, (FONT_FAMILY, style.caption_size))
            .margin(style.margin)
            .x_label_area_size(style.x_label_area)
            .y_label_area_size(style.y_label_area)
            .build_cartesian_2d(hist.lo..hist.hi, 0f64..peak * 1.05)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(style.ticks)
            .y_labels(style.ticks)
            .x_desc(style.x_desc.as_str())
            .y_desc(style.y_desc.as_str())
            .label_style((FONT_FAMILY, style.label_size))
            .axis_desc_style((FONT_FAMILY, style.label_size))
            .draw()?;

        let bar = style.color.mix(style.bar_alpha).filled();
        chart.draw_series(
            hist.counts
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(|(i, &count)| {
                    let x0 = hist.lo + i as f64 * hist.bin_width();
                    let x1 = x0 + hist.bin_width();
                    Rectangle::new([(x0, 0.0), (x1, count as f64)], bar)
                }),
        )?;

        if let Some(curve) = curve {
            chart.draw_series(LineSeries::new(
                xs.iter().copied().zip(curve),
                style.color.stroke_width(2),
            ))?;
        }

        root.present()?;
    }

    encode_png(&pixels, style.width, style.height)
}

fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, StatsError> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(pixels)?;
        writer.finish()?;
    }
    Ok(out)
}

pub fn data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
