//! Attainment pie: every county classified into exactly one of five fixed
//! bands, slice angles proportional to band counts.

use anyhow::Result;
use plotters::prelude::*;
use std::f64::consts::PI;
use std::path::Path;

use crate::models::CountyRecord;

pub const WIDTH: u32 = 640;
pub const HEIGHT: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Band {
    pub const ALL: [Band; 5] = [
        Band::VeryLow,
        Band::Low,
        Band::Medium,
        Band::High,
        Band::VeryHigh,
    ];

    pub fn classify(rate: f64) -> Band {
        if rate < 15.0 {
            Band::VeryLow
        } else if rate < 25.0 {
            Band::Low
        } else if rate < 35.0 {
            Band::Medium
        } else if rate < 45.0 {
            Band::High
        } else {
            Band::VeryHigh
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::VeryLow => "Very Low",
            Band::Low => "Low",
            Band::Medium => "Medium",
            Band::High => "High",
            Band::VeryHigh => "Very High",
        }
    }

    pub fn range_label(self) -> &'static str {
        match self {
            Band::VeryLow => "< 15%",
            Band::Low => "15-25%",
            Band::Medium => "25-35%",
            Band::High => "35-45%",
            Band::VeryHigh => "> 45%",
        }
    }

    pub fn color(self) -> RGBColor {
        match self {
            Band::VeryLow => RGBColor(0xff, 0x6b, 0x6b),
            Band::Low => RGBColor(0xff, 0xd9, 0x3d),
            Band::Medium => RGBColor(0x6b, 0xcf, 0x7f),
            Band::High => RGBColor(0x4f, 0xac, 0xfe),
            Band::VeryHigh => RGBColor(0x9b, 0x51, 0xe0),
        }
    }
}

/// Counts per band, in `Band::ALL` order. Disjoint and exhaustive, so the
/// counts always sum to `records.len()`.
pub fn band_counts(records: &[CountyRecord]) -> [usize; 5] {
    let mut counts = [0usize; 5];
    for record in records {
        let band = Band::classify(record.bachelors_or_higher);
        let slot = Band::ALL.iter().position(|&b| b == band).unwrap_or(0);
        counts[slot] += 1;
    }
    counts
}

/// Slice label: the band's share of all counties, nearest integer percent.
pub fn share_label(count: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{}%", (count as f64 / total as f64 * 100.0).round() as i64)
}

pub fn render(records: &[CountyRecord], out: &Path) -> Result<()> {
    let counts = band_counts(records);
    let total: usize = counts.iter().sum();

    let root = SVGBackend::new(out, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let center = (HEIGHT as i32 / 2, HEIGHT as i32 / 2);
    let radius = (HEIGHT as f64 / 2.0 - 40.0).max(10.0);

    // Slices start at 12 o'clock and run clockwise, like the original.
    let mut start_angle = -PI / 2.0;
    for (band, &count) in Band::ALL.iter().zip(counts.iter()) {
        if count == 0 || total == 0 {
            continue;
        }
        let sweep = count as f64 / total as f64 * 2.0 * PI;
        draw_slice(&root, center, radius, start_angle, sweep, band.color())?;

        let mid = start_angle + sweep / 2.0;
        let label_radius = radius * 0.6;
        root.draw(&Text::new(
            share_label(count, total),
            (
                center.0 + (label_radius * mid.cos()) as i32 - 8,
                center.1 + (label_radius * mid.sin()) as i32,
            ),
            ("sans-serif", 13).into_font().color(&super::TEXT_DARK),
        ))?;

        start_angle += sweep;
    }

    // Legend with per-band counts on the right.
    let legend_x = HEIGHT as i32 + 20;
    for (i, (band, &count)) in Band::ALL.iter().zip(counts.iter()).enumerate() {
        let y = 60 + i as i32 * 30;
        root.draw(&Rectangle::new(
            [(legend_x, y), (legend_x + 18, y + 18)],
            band.color().filled(),
        ))?;
        root.draw(&Text::new(
            format!("{} {} ({})", band.label(), band.range_label(), count),
            (legend_x + 24, y + 4),
            ("sans-serif", 12).into_font().color(&super::TEXT_DARK),
        ))?;
    }

    root.present()?;
    Ok(())
}

/// plotters has no pie primitive, so each slice is a polygon fan stepped in
/// one-degree increments.
fn draw_slice(
    root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>,
    center: (i32, i32),
    radius: f64,
    start: f64,
    sweep: f64,
    color: RGBColor,
) -> Result<()> {
    let steps = (sweep.to_degrees().ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = start + sweep * step as f64 / steps as f64;
        points.push((
            center.0 + (radius * angle.cos()) as i32,
            center.1 + (radius * angle.sin()) as i32,
        ));
    }
    root.draw(&Polygon::new(points.clone(), color.filled()))?;
    root.draw(&PathElement::new(points, WHITE.stroke_width(2)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::record;

    #[test]
    fn classification_boundaries() {
        assert_eq!(Band::classify(0.0), Band::VeryLow);
        assert_eq!(Band::classify(14.9), Band::VeryLow);
        assert_eq!(Band::classify(15.0), Band::Low);
        assert_eq!(Band::classify(24.9), Band::Low);
        assert_eq!(Band::classify(25.0), Band::Medium);
        assert_eq!(Band::classify(35.0), Band::High);
        assert_eq!(Band::classify(44.9), Band::High);
        assert_eq!(Band::classify(45.0), Band::VeryHigh);
        assert_eq!(Band::classify(99.0), Band::VeryHigh);
    }

    #[test]
    fn bands_partition_the_records() {
        let records: Vec<_> = (0..200).map(|i| record(i, i as f64 * 0.4)).collect();
        let counts = band_counts(&records);
        assert_eq!(counts.iter().sum::<usize>(), records.len());
        // Every band is populated by this spread of rates.
        assert!(counts.iter().all(|&c| c > 0));
    }

    #[test]
    fn share_labels_round_to_whole_percents() {
        assert_eq!(share_label(1, 3), "33%");
        assert_eq!(share_label(2, 3), "67%");
        assert_eq!(share_label(0, 3), "0%");
        assert_eq!(share_label(3, 3), "100%");
        assert_eq!(share_label(0, 0), "0%");
    }

    #[test]
    fn render_writes_an_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pie.svg");
        let records = vec![
            record(1, 10.0),
            record(2, 20.0),
            record(3, 30.0),
            record(4, 40.0),
            record(5, 50.0),
        ];
        render(&records, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));
    }
}
