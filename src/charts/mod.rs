//! The five chart builders. Each derives its own aggregate from the county
//! records and (over)writes one SVG in the output directory, so re-rendering
//! replaces the previous visual.

pub mod choropleth;
pub mod histogram;
pub mod line;
pub mod pie;
pub mod radar;

use plotters::style::RGBColor;

pub const ACCENT_BLUE: RGBColor = RGBColor(79, 172, 254);
pub const GRID_GRAY: RGBColor = RGBColor(210, 214, 220);
pub const TEXT_DARK: RGBColor = RGBColor(40, 44, 52);

/// Rounds an axis maximum up to 1, 2 or 5 times a power of ten, so count
/// axes end on a round number.
pub fn nice_ceil(value: f64) -> f64 {
    if value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(value.log10().floor());
    let scaled = value / magnitude;
    let factor = if scaled <= 1.0 {
        1.0
    } else if scaled <= 2.0 {
        2.0
    } else if scaled <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn nice_ceil_rounds_up_to_round_numbers() {
        assert_relative_eq!(nice_ceil(7.0), 10.0);
        assert_relative_eq!(nice_ceil(43.0), 50.0);
        assert_relative_eq!(nice_ceil(97.0), 100.0);
        assert_relative_eq!(nice_ceil(100.0), 100.0);
        assert_relative_eq!(nice_ceil(101.0), 200.0);
        assert_relative_eq!(nice_ceil(0.0), 1.0);
    }
}
