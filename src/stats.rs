use anyhow::{bail, Result};

use crate::models::{AggregateStats, CountyRecord};

/// Single pass over the attainment rates. Callers guard against an empty
/// dataset before getting here; summarizing nothing is a contract error,
/// not a NaN.
pub fn summarize(records: &[CountyRecord]) -> Result<AggregateStats> {
    if records.is_empty() {
        bail!("cannot summarize an empty dataset");
    }

    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for record in records {
        let rate = record.bachelors_or_higher;
        sum += rate;
        if rate < min {
            min = rate;
        }
        if rate > max {
            max = rate;
        }
    }

    Ok(AggregateStats {
        mean: sum / records.len() as f64,
        min,
        max,
        count: records.len(),
    })
}

/// Comma-grouped integer formatting for the county-count label.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    pub(crate) fn record(fips: u32, rate: f64) -> CountyRecord {
        CountyRecord {
            fips,
            state: "XX".to_string(),
            area_name: format!("County {}", fips),
            bachelors_or_higher: rate,
        }
    }

    #[test]
    fn summarize_matches_the_known_scenario() {
        let records = vec![record(1, 10.0), record(2, 20.0), record(3, 90.0)];
        let stats = summarize(&records).unwrap();
        assert_relative_eq!(stats.mean, 40.0);
        assert_relative_eq!(stats.min, 10.0);
        assert_relative_eq!(stats.max, 90.0);
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn mean_sits_between_min_and_max() {
        let records = vec![
            record(1, 3.2),
            record(2, 17.9),
            record(3, 44.4),
            record(4, 61.0),
        ];
        let stats = summarize(&records).unwrap();
        assert!(stats.min <= stats.mean);
        assert!(stats.mean <= stats.max);
        assert_eq!(stats.count, records.len());
    }

    #[test]
    fn single_record_collapses_to_one_value() {
        let stats = summarize(&[record(1, 33.3)]).unwrap();
        assert_relative_eq!(stats.mean, 33.3);
        assert_relative_eq!(stats.min, 33.3);
        assert_relative_eq!(stats.max, 33.3);
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn empty_input_fails_explicitly() {
        assert!(summarize(&[]).is_err());
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(3142), "3,142");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }
}
