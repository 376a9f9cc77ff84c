//! Orchestration: load -> guard -> stats -> animated labels -> charts ->
//! static HTML page. Constructed once at startup; the loaded dataset is
//! explicit controller state, not module globals.

use anyhow::{bail, Context, Result};
use chrono::Local;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::animate::NumberAnimator;
use crate::api::DataClient;
use crate::charts::{choropleth, histogram, line, pie, radar};
use crate::config::Config;
use crate::export;
use crate::models::{AggregateStats, CountyRecord, Dataset};
use crate::stats::{self, format_thousands};

const STAT_ANIMATION: Duration = Duration::from_millis(800);

pub struct DashboardController {
    config: Config,
    client: DataClient,
}

impl DashboardController {
    pub fn new(config: Config) -> Self {
        let client = DataClient::new(&config);
        Self { config, client }
    }

    /// Full dashboard build. A failed load renders nothing; any later
    /// failure aborts the whole initialization.
    pub async fn run(&self, seed: Option<u64>) -> Result<()> {
        let dataset = self.client.load().await;
        if dataset.is_empty() {
            eprintln!("❌ No data available.");
            return Ok(());
        }

        let date = current_date();
        println!("📅 {}", date);

        let summary = stats::summarize(&dataset.records)?;
        show_stats(&summary).await?;

        update_charts(&dataset, &self.config.output_dir, seed)?;

        let html = render_page(&dataset.records, &summary, &date);
        let page_path = self.config.output_dir.join("dashboard.html");
        fs::write(&page_path, html)
            .with_context(|| format!("Failed to write {}", page_path.display()))?;

        println!("🎉 Dashboard ready: {}", page_path.display());
        Ok(())
    }

    /// Summary statistics only, no charts.
    pub async fn run_stats(&self) -> Result<()> {
        let dataset = self.client.load().await;
        if dataset.is_empty() {
            eprintln!("❌ No data available.");
            return Ok(());
        }
        println!("📅 {}", current_date());
        let summary = stats::summarize(&dataset.records)?;
        show_stats(&summary).await
    }

    /// CSV export of the loaded records.
    pub async fn run_export(&self) -> Result<()> {
        let dataset = self.client.load().await;
        if dataset.is_empty() {
            eprintln!("❌ No data available.");
            return Ok(());
        }
        let summary = stats::summarize(&dataset.records)?;
        let path = export::export_records_csv(&dataset.records, &self.config.output_dir)?;
        println!(
            "📊 {} counties exported, mean {:.1}%, range {:.1}%-{:.1}%",
            format_thousands(summary.count as u64),
            summary.mean,
            summary.min,
            summary.max
        );
        println!("📝 CSV file created: {}", path.display());
        Ok(())
    }
}

fn current_date() -> String {
    Local::now().format("%A, %B %e, %Y").to_string()
}

/// Counts the four stat cards up from zero in the terminal.
async fn show_stats(summary: &AggregateStats) -> Result<()> {
    let progress = MultiProgress::new();
    let style = ProgressStyle::with_template("{msg}").context("bad progress template")?;
    let bars: Vec<ProgressBar> = (0..4)
        .map(|_| {
            progress.add(
                ProgressBar::new_spinner().with_style(style.clone()),
            )
        })
        .collect();

    let animators = [
        NumberAnimator::new(),
        NumberAnimator::new(),
        NumberAnimator::new(),
        NumberAnimator::new(),
    ];

    let percent = |v: f64| format!("{:.1}%", v);
    let whole = |v: f64| format_thousands(v.round() as u64);

    tokio::join!(
        animators[0].animate(&bars[0], "📈 Average rate", summary.mean, STAT_ANIMATION, percent),
        animators[1].animate(
            &bars[1],
            "🏛️  Counties",
            summary.count as f64,
            STAT_ANIMATION,
            whole,
        ),
        animators[2].animate(&bars[2], "🔺 Maximum rate", summary.max, STAT_ANIMATION, percent),
        animators[3].animate(&bars[3], "🔻 Minimum rate", summary.min, STAT_ANIMATION, percent),
    );

    for bar in &bars {
        bar.finish();
    }
    Ok(())
}

/// Renders all five charts into the output directory, replacing whatever a
/// previous run left there. Refuses to run on an empty dataset.
pub fn update_charts(dataset: &Dataset, output_dir: &Path, seed: Option<u64>) -> Result<()> {
    if dataset.is_empty() {
        bail!("no data available, refusing to render charts");
    }
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    choropleth::render(dataset, &output_dir.join("choropleth-map.svg"))?;
    histogram::render(&dataset.records, &output_dir.join("histogram.svg"))?;
    pie::render(&dataset.records, &output_dir.join("pie-chart.svg"))?;
    radar::render(&dataset.records, &output_dir.join("radar-chart.svg"))?;
    line::render(&output_dir.join("line-chart.svg"), seed)?;

    println!("✅ Five charts rendered in {}", output_dir.display());
    Ok(())
}

/// The static page that stands in for the original DOM surface: date, four
/// stat cards and the five chart containers.
pub fn render_page(records: &[CountyRecord], summary: &AggregateStats, date: &str) -> String {
    let rates = choropleth::rate_by_fips(records);
    let names = choropleth::names_by_fips(records);
    let best = records
        .iter()
        .max_by(|a, b| a.bachelors_or_higher.total_cmp(&b.bachelors_or_higher));
    let worst = records
        .iter()
        .min_by(|a, b| a.bachelors_or_higher.total_cmp(&b.bachelors_or_higher));
    let best_label = best
        .map(|r| choropleth::hover_label(r.fips, &rates, &names))
        .unwrap_or_default();
    let worst_label = worst
        .map(|r| choropleth::hover_label(r.fips, &rates, &names))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>US County Education Dashboard</title>
<style>
  body {{ font-family: sans-serif; margin: 2rem; color: #282c34; }}
  .cards {{ display: flex; gap: 1rem; }}
  .card {{ border: 1px solid #d2d6dc; border-radius: 8px; padding: 1rem; min-width: 10rem; }}
  .card .value {{ font-size: 1.6rem; font-weight: 700; }}
  .chart {{ margin-top: 2rem; }}
  img {{ max-width: 100%; height: auto; }}
</style>
</head>
<body>
<h1>US County Education Dashboard</h1>
<p id="current-date">{date}</p>
<div class="cards">
  <div class="card"><div>Average rate</div><div class="value" id="avg-education">{mean:.1}%</div></div>
  <div class="card"><div>Counties</div><div class="value" id="total-counties">{count}</div></div>
  <div class="card"><div>Maximum rate</div><div class="value" id="max-education">{max:.1}%</div></div>
  <div class="card"><div>Minimum rate</div><div class="value" id="min-education">{min:.1}%</div></div>
</div>
<p>Highest: {best_label} &middot; Lowest: {worst_label}</p>
<div class="chart" id="choropleth-map"><img src="choropleth-map.svg" alt="Choropleth map"></div>
<div class="chart" id="histogram"><img src="histogram.svg" alt="Histogram"></div>
<div class="chart" id="pie-chart"><img src="pie-chart.svg" alt="Pie chart"></div>
<div class="chart" id="radar-chart"><img src="radar-chart.svg" alt="Radar chart"></div>
<div class="chart" id="line"><img src="line-chart.svg" alt="Trend line"></div>
</body>
</html>
"#,
        date = date,
        mean = summary.mean,
        count = format_thousands(summary.count as u64),
        max = summary.max,
        min = summary.min,
        best_label = best_label,
        worst_label = worst_label,
    )
}
