//! Attainment trend line, 1990-2020. The series is a synthesized random
//! walk, not real historical data: a decorative placeholder until a real
//! time-series source exists. Tests only ever assert its structure.

use anyhow::Result;
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

use super::{nice_ceil, ACCENT_BLUE, TEXT_DARK};

pub const WIDTH: u32 = 975;
pub const HEIGHT: u32 = 500;

pub const START_YEAR: i32 = 1990;
pub const END_YEAR: i32 = 2020;
const BASE_VALUE: f64 = 20.0;
const YEARLY_DRIFT: f64 = 0.8;
const NOISE_AMPLITUDE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePoint {
    pub year: i32,
    pub value: f64,
}

/// Random walk: base 20, +0.8 drift per year, uniform noise within ±1,
/// values kept to two decimals. The rng is injected so a seeded run is
/// reproducible.
pub fn synthesize_series<R: Rng>(rng: &mut R) -> Vec<TimePoint> {
    let mut base = BASE_VALUE;
    let mut series = Vec::with_capacity((END_YEAR - START_YEAR + 1) as usize);
    for year in START_YEAR..=END_YEAR {
        let noise = rng.gen_range(-NOISE_AMPLITUDE..NOISE_AMPLITUDE);
        let value = ((base + noise) * 100.0).round() / 100.0;
        series.push(TimePoint { year, value });
        base += YEARLY_DRIFT;
    }
    series
}

/// Hover text for one point of the series.
pub fn point_label(point: &TimePoint) -> String {
    format!("{}: {:.1}%", point.year, point.value)
}

pub fn render(out: &Path, seed: Option<u64>) -> Result<()> {
    let mut rng: StdRng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let series = synthesize_series(&mut rng);
    let max_value = series.iter().map(|p| p.value).fold(0.0f64, f64::max);
    let y_max = nice_ceil(max_value * 1.1);

    let root = SVGBackend::new(out, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(
            "Average attainment trend (synthetic demo data)",
            ("sans-serif", 18),
        )
        .set_label_area_size(LabelAreaPosition::Left, 55)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(START_YEAR..END_YEAR, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_labels(10)
        .x_label_formatter(&|year| year.to_string())
        .y_label_formatter(&|v| format!("{}%", v))
        .x_desc("Year")
        .y_desc("Average education rate (%)")
        .draw()?;

    chart.draw_series(AreaSeries::new(
        series.iter().map(|p| (p.year, p.value)),
        0.0,
        ACCENT_BLUE.mix(0.2),
    ))?;
    chart.draw_series(LineSeries::new(
        series.iter().map(|p| (p.year, p.value)),
        ACCENT_BLUE.stroke_width(3),
    ))?;
    chart.draw_series(
        series
            .iter()
            .map(|p| Circle::new((p.year, p.value), 3, ACCENT_BLUE.filled())),
    )?;

    // Label the endpoint, the static stand-in for the hover tooltip.
    if let Some(last) = series.last() {
        chart.draw_series(std::iter::once(Text::new(
            point_label(last),
            (last.year - 3, last.value + y_max * 0.03),
            ("sans-serif", 12).into_font().color(&TEXT_DARK),
        )))?;
    }

    root.present()?;
    Ok(())
}
