//! Chart engine: dataset in, base64-encoded PNG out.

use super::EngineError;
use base64::Engine as _;
use image::{ImageOutputFormat, Rgb, RgbImage};
use qa_core::config::ChartConfig;
use qa_core::Dataset;
use std::io::Cursor;

pub trait ChartEngine: Send + Sync {
    /// Render `y_col` against `x_col` and return the image as base64.
    fn render(&self, dataset: &Dataset, x_col: &str, y_col: &str) -> Result<String, EngineError>;
}

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);
const BAR: Rgb<u8> = Rgb([31, 119, 180]);
const MARGIN: u32 = 40;

/// Vertical bars of `sum(y) group by x`, tallest first, at most `max_bars`.
#[derive(Debug, Clone)]
pub struct BarChartEngine {
    width: u32,
    height: u32,
    max_bars: usize,
}

impl BarChartEngine {
    pub fn new(cfg: &ChartConfig) -> Self {
        Self {
            width: cfg.width.max(2 * MARGIN + 1),
            height: cfg.height.max(2 * MARGIN + 1),
            max_bars: cfg.max_bars.max(1),
        }
    }

    fn draw(&self, totals: &[(String, f64)]) -> RgbImage {
        let mut img = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        let plot_w = self.width - 2 * MARGIN;
        let plot_h = self.height - 2 * MARGIN;
        let baseline = self.height - MARGIN;

        fill(&mut img, MARGIN, MARGIN, 1, plot_h + 1, AXIS);
        fill(&mut img, MARGIN, baseline, plot_w, 1, AXIS);

        let bars: Vec<f64> = totals
            .iter()
            .take(self.max_bars.min(plot_w as usize))
            .map(|(_, v)| v.max(0.0))
            .collect();
        let peak = bars.iter().copied().fold(0.0_f64, f64::max);
        if bars.is_empty() || peak <= 0.0 {
            return img;
        }

        let slot = plot_w / bars.len() as u32;
        let bar_w = (slot * 3 / 4).max(1);
        for (i, value) in bars.iter().enumerate() {
            let h = ((value / peak) * f64::from(plot_h)).round() as u32;
            if h == 0 {
                continue;
            }
            let x = MARGIN + 1 + i as u32 * slot + (slot - bar_w) / 2;
            fill(&mut img, x, baseline - h, bar_w, h, BAR);
        }
        img
    }
}

impl ChartEngine for BarChartEngine {
    fn render(&self, dataset: &Dataset, x_col: &str, y_col: &str) -> Result<String, EngineError> {
        let totals = dataset
            .sum_by(x_col, y_col)
            .map_err(|e| EngineError::Chart(e.to_string()))?;
        let img = self.draw(&totals);

        let mut png = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
            .map_err(|e| EngineError::Chart(e.to_string()))?;
        Ok(base64::engine::general_purpose::STANDARD.encode(png))
    }
}

fn fill(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = (x + w).min(img.width());
    let y_end = (y + h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}
