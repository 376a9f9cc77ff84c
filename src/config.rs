use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const EDUCATION_URL: &str =
    "https://cdn.freecodecamp.org/testable-projects-fcc/data/choropleth_map/for_user_education.json";
const COUNTIES_URL: &str =
    "https://cdn.freecodecamp.org/testable-projects-fcc/data/choropleth_map/counties.json";

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub education_url: String,
    pub counties_url: String,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            education_url: EDUCATION_URL.to_string(),
            counties_url: COUNTIES_URL.to_string(),
            output_dir: PathBuf::from("output"),
        }
    }
}

pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    // Missing config file is fine, the defaults point at the public CDN.
    if !path.exists() {
        return Ok(Config::default());
    }
    let config_str = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
