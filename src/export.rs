use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::CountyRecord;

/// Writes the loaded county records to a timestamped CSV in the output
/// directory and returns the file path.
pub fn export_records_csv(records: &[CountyRecord], output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("county_education_{}.csv", timestamp));
    let mut writer = Writer::from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(["FIPS", "County", "State", "Bachelor's degree or higher (%)"])?;
    for record in records {
        writer.write_record([
            record.fips.to_string(),
            record.area_name.clone(),
            record.state.clone(),
            format!("{:.1}", record.bachelors_or_higher),
        ])?;
    }

    writer.flush()?;
    Ok(path)
}
