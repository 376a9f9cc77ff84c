//! County choropleth: every boundary feature filled by its attainment rate
//! quantized into 9 blues over the fixed 0-70% domain, state borders drawn
//! on top, 9-swatch legend with 0..70 ticks.

use anyhow::Result;
use geo::algorithm::bounding_rect::BoundingRect;
use geo::Rect;
use plotters::prelude::*;
use std::collections::HashMap;
use std::path::Path;

use crate::models::{CountyRecord, Dataset};

pub const WIDTH: u32 = 975;
pub const HEIGHT: u32 = 610;

pub const COLOR_DOMAIN: (f64, f64) = (0.0, 70.0);

/// d3's schemeBlues[9], light to dark.
pub const BLUES: [RGBColor; 9] = [
    RGBColor(0xf7, 0xfb, 0xff),
    RGBColor(0xde, 0xeb, 0xf7),
    RGBColor(0xc6, 0xdb, 0xef),
    RGBColor(0x9e, 0xca, 0xe1),
    RGBColor(0x6b, 0xae, 0xd6),
    RGBColor(0x42, 0x92, 0xc6),
    RGBColor(0x21, 0x71, 0xb5),
    RGBColor(0x08, 0x51, 0x9c),
    RGBColor(0x08, 0x30, 0x6b),
];

/// Fill for boundary features with no matching education record.
pub const NO_DATA: RGBColor = RGBColor(0xcc, 0xcc, 0xcc);

pub fn rate_by_fips(records: &[CountyRecord]) -> HashMap<u32, f64> {
    records
        .iter()
        .map(|r| (r.fips, r.bachelors_or_higher))
        .collect()
}

pub fn names_by_fips(records: &[CountyRecord]) -> HashMap<u32, (String, String)> {
    records
        .iter()
        .map(|r| (r.fips, (r.area_name.clone(), r.state.clone())))
        .collect()
}

/// Quantizes a rate into one of the 9 blues. Rates outside the domain clamp
/// to the end bins.
pub fn color_for_rate(rate: f64) -> RGBColor {
    let span = COLOR_DOMAIN.1 - COLOR_DOMAIN.0;
    let slot = ((rate - COLOR_DOMAIN.0) / span * BLUES.len() as f64).floor();
    BLUES[(slot as isize).clamp(0, BLUES.len() as isize - 1) as usize]
}

pub fn fill_for(fips: Option<u32>, rates: &HashMap<u32, f64>) -> RGBColor {
    fips.and_then(|f| rates.get(&f))
        .map(|&rate| color_for_rate(rate))
        .unwrap_or(NO_DATA)
}

/// Hover text for one county shape.
pub fn hover_label(
    fips: u32,
    rates: &HashMap<u32, f64>,
    names: &HashMap<u32, (String, String)>,
) -> String {
    match (rates.get(&fips), names.get(&fips)) {
        (Some(rate), Some((name, state))) => format!("{}, {}: {:.1}%", name, state, rate),
        _ => "No data available".to_string(),
    }
}

pub fn render(dataset: &Dataset, out: &Path) -> Result<()> {
    let rates = rate_by_fips(&dataset.records);

    let root = SVGBackend::new(out, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    if let Some(bbox) = combined_bbox(dataset) {
        let project = projector(&bbox);

        for county in &dataset.counties {
            let fill = fill_for(county.id, &rates);
            for polygon in &county.geometry.0 {
                let points: Vec<(i32, i32)> =
                    polygon.exterior().coords().map(|c| project(c.x, c.y)).collect();
                root.draw(&Polygon::new(points, fill.filled()))?;
            }
        }

        // State dividers over the county fills.
        for border in &dataset.state_borders.0 {
            let points: Vec<(i32, i32)> =
                border.coords().map(|c| project(c.x, c.y)).collect();
            root.draw(&PathElement::new(points, WHITE.stroke_width(2)))?;
        }
    }

    draw_legend(&root)?;
    root.present()?;
    Ok(())
}

fn combined_bbox(dataset: &Dataset) -> Option<Rect<f64>> {
    let mut bbox: Option<Rect<f64>> = None;
    for county in &dataset.counties {
        let Some(county_box) = county.geometry.bounding_rect() else {
            continue;
        };
        bbox = Some(match bbox {
            None => county_box,
            Some(current) => Rect::new(
                geo::Coord {
                    x: current.min().x.min(county_box.min().x),
                    y: current.min().y.min(county_box.min().y),
                },
                geo::Coord {
                    x: current.max().x.max(county_box.max().x),
                    y: current.max().y.max(county_box.max().y),
                },
            ),
        });
    }
    bbox
}

/// Fits the (already planar, y-down) topology coordinates into the canvas,
/// preserving aspect ratio.
fn projector(bbox: &Rect<f64>) -> impl Fn(f64, f64) -> (i32, i32) {
    const MARGIN: f64 = 10.0;
    let span_x = (bbox.max().x - bbox.min().x).max(f64::EPSILON);
    let span_y = (bbox.max().y - bbox.min().y).max(f64::EPSILON);
    let scale = ((WIDTH as f64 - 2.0 * MARGIN) / span_x)
        .min((HEIGHT as f64 - 2.0 * MARGIN) / span_y);
    let min_x = bbox.min().x;
    let min_y = bbox.min().y;
    move |x, y| {
        (
            (MARGIN + (x - min_x) * scale) as i32,
            (MARGIN + (y - min_y) * scale) as i32,
        )
    }
}

fn draw_legend(root: &DrawingArea<SVGBackend<'_>, plotters::coord::Shift>) -> Result<()> {
    const LEGEND_WIDTH: i32 = 324;
    const SWATCH_HEIGHT: i32 = 20;
    let swatch_width = LEGEND_WIDTH / BLUES.len() as i32;
    let x0 = WIDTH as i32 - LEGEND_WIDTH - 20;
    let y0 = 20;

    root.draw(&Text::new(
        "Education rate (%)",
        (x0, y0 - 14),
        ("sans-serif", 12).into_font().color(&super::TEXT_DARK),
    ))?;

    for (i, color) in BLUES.iter().enumerate() {
        let x = x0 + i as i32 * swatch_width;
        root.draw(&Rectangle::new(
            [(x, y0), (x + swatch_width, y0 + SWATCH_HEIGHT)],
            color.filled(),
        ))?;
    }

    // Ticks at 0, 10, ..., 70 along the fixed color domain.
    for tick in (0..=70).step_by(10) {
        let x = x0
            + (tick as f64 / COLOR_DOMAIN.1 * LEGEND_WIDTH as f64) as i32;
        root.draw(&PathElement::new(
            vec![(x, y0 + SWATCH_HEIGHT), (x, y0 + SWATCH_HEIGHT + 5)],
            super::TEXT_DARK.stroke_width(1),
        ))?;
        root.draw(&Text::new(
            format!("{}%", tick),
            (x - 8, y0 + SWATCH_HEIGHT + 8),
            ("sans-serif", 10).into_font().color(&super::TEXT_DARK),
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::record;

    #[test]
    fn rates_quantize_into_nine_fixed_bins() {
        assert_eq!(color_for_rate(0.0), BLUES[0]);
        assert_eq!(color_for_rate(7.7), BLUES[0]);
        // Bin width is 70/9; 7.78 lands in the second bin.
        assert_eq!(color_for_rate(7.8), BLUES[1]);
        assert_eq!(color_for_rate(35.0), BLUES[4]);
        assert_eq!(color_for_rate(69.9), BLUES[8]);
        // Out-of-domain rates clamp instead of panicking.
        assert_eq!(color_for_rate(70.0), BLUES[8]);
        assert_eq!(color_for_rate(100.0), BLUES[8]);
        assert_eq!(color_for_rate(-5.0), BLUES[0]);
    }

    #[test]
    fn every_in_domain_rate_maps_to_a_palette_color() {
        for tenth in 0..=700 {
            let rate = tenth as f64 / 10.0;
            let color = color_for_rate(rate);
            assert!(BLUES.contains(&color));
        }
    }

    #[test]
    fn missing_fips_always_gets_the_no_data_fill() {
        let rates = rate_by_fips(&[record(1001, 21.9)]);
        assert_eq!(fill_for(Some(1001), &rates), color_for_rate(21.9));
        assert_eq!(fill_for(Some(9999), &rates), NO_DATA);
        assert_eq!(fill_for(None, &rates), NO_DATA);
    }

    #[test]
    fn hover_label_names_the_county_or_admits_ignorance() {
        let records = vec![record(1001, 21.9)];
        let rates = rate_by_fips(&records);
        let names = names_by_fips(&records);
        assert_eq!(hover_label(1001, &rates, &names), "County 1001, XX: 21.9%");
        assert_eq!(hover_label(4242, &rates, &names), "No data available");
    }
}
