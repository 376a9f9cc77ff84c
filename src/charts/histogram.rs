//! Attainment histogram: counties bucketed into 5-percentage-point bins.

use anyhow::Result;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

use super::{nice_ceil, ACCENT_BLUE, TEXT_DARK};
use crate::models::CountyRecord;

pub const WIDTH: u32 = 900;
pub const HEIGHT: u32 = 400;
pub const BIN_WIDTH: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lower: u32,
    pub label: String,
    pub count: usize,
}

/// Buckets records by `floor(rate / 5) * 5`, ascending by lower bound. A
/// rate exactly on a boundary opens the bucket starting there.
pub fn bin_records(records: &[CountyRecord]) -> Vec<Bin> {
    let mut buckets: BTreeMap<u32, usize> = BTreeMap::new();
    for record in records {
        let lower = (record.bachelors_or_higher / BIN_WIDTH).floor() as u32 * BIN_WIDTH as u32;
        *buckets.entry(lower).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|(lower, count)| Bin {
            lower,
            label: format!("{}-{}%", lower, lower + BIN_WIDTH as u32),
            count,
        })
        .collect()
}

pub fn render(records: &[CountyRecord], out: &Path) -> Result<()> {
    let bins = bin_records(records);
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);
    let y_max = nice_ceil(max_count as f64) as i32;

    let root = SVGBackend::new(out, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let labels = bins.iter().map(|b| b.label.clone()).collect::<Vec<_>>();
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("Counties per attainment bracket", ("sans-serif", 20))
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(0i32..bins.len() as i32, 0i32..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bins.len())
        .x_label_formatter(&|&i| {
            labels
                .get(i as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_desc("Number of counties")
        .x_desc("Percentage bracket")
        .draw()?;

    for (i, bin) in bins.iter().enumerate() {
        let i = i as i32;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(i, 0), (i + 1, bin.count as i32)],
            ACCENT_BLUE.mix(0.7).filled(),
        )))?;
        // Count above the bar, the static stand-in for the hover tooltip.
        chart.draw_series(std::iter::once(Text::new(
            bin.count.to_string(),
            (i, bin.count as i32),
            ("sans-serif", 12).into_font().color(&TEXT_DARK),
        )))?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::record;

    #[test]
    fn bins_match_the_known_scenario() {
        let records = vec![record(1, 10.0), record(2, 20.0), record(3, 90.0)];
        let bins = bin_records(&records);
        assert_eq!(bins.len(), 3);
        assert_eq!(
            bins.iter().map(|b| b.label.as_str()).collect::<Vec<_>>(),
            vec!["10-15%", "20-25%", "90-95%"]
        );
        assert!(bins.iter().all(|b| b.count == 1));
    }

    #[test]
    fn boundary_rates_open_the_upper_bucket() {
        let bins = bin_records(&[record(1, 25.0)]);
        assert_eq!(bins[0].lower, 25);
        assert_eq!(bins[0].label, "25-30%");
    }

    #[test]
    fn bins_come_back_sorted_ascending() {
        let records = vec![
            record(1, 62.1),
            record(2, 3.0),
            record(3, 33.3),
            record(4, 3.9),
        ];
        let bins = bin_records(&records);
        let lowers: Vec<u32> = bins.iter().map(|b| b.lower).collect();
        assert_eq!(lowers, vec![0, 30, 60]);
        assert_eq!(bins[0].count, 2);
    }

    #[test]
    fn bin_counts_cover_every_record() {
        let records: Vec<_> = (0..50).map(|i| record(i, i as f64 * 1.7)).collect();
        let bins = bin_records(&records);
        let total: usize = bins.iter().map(|b| b.count).sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn render_writes_an_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("histogram.svg");
        let records = vec![record(1, 10.0), record(2, 20.0), record(3, 41.5)];
        render(&records, &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }
}
