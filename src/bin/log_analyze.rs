//! Offline usage report for the bot's event log.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs;
use std::path::PathBuf;

use shora_bot::log_analysis::{
    city_counts, color_for, distinct_sources, hourly_series, list_deliveries, parse_log,
    render_chart,
};

#[derive(Parser, Debug)]
#[command(name = "log-analyze", about = "Summarize the bot's usage log and chart list deliveries")]
struct Args {
    /// Event log captured from the bot's stderr
    #[arg(short, long, default_value = "stderr.log")]
    input: PathBuf,

    /// Where to write the PNG chart
    #[arg(short, long, default_value = "usage.png")]
    output: PathBuf,

    /// Chart width in pixels
    #[arg(long, default_value_t = 1800)]
    width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = 400)]
    height: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let entries = parse_log(&content);

    println!("Distinct chats: {}", distinct_sources(&entries));

    let deliveries = list_deliveries(&entries);
    println!("List deliveries by city:");
    for (city, count) in city_counts(&deliveries) {
        println!("  {count:>6}  {city}");
    }

    let series = hourly_series(&deliveries);
    if let (Some(first), Some(last)) = (series.hours.first(), series.hours.last()) {
        info!("Charting {} hourly buckets from {} to {}", series.hours.len(), first, last);
    }

    println!("Legend:");
    for (index, city) in series.cities.keys().enumerate() {
        let [r, g, b] = color_for(index).0;
        println!("  #{r:02x}{g:02x}{b:02x}  {city}");
    }

    render_chart(&series, args.width, args.height)
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!("Chart written to {}", args.output.display());

    Ok(())
}
