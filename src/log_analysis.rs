//! # Log Analysis Module
//!
//! Offline statistics over the usage event log written by [`crate::event_log`]:
//! distinct chats, per-city list deliveries, and an hourly usage chart.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use image::{Rgb, RgbImage};
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

use crate::event_log::{LIST_EVENT_PREFIX, TIMESTAMP_FORMAT};

lazy_static! {
    static ref LIST_EVENT: Regex = Regex::new(&format!(
        "^{}(?P<city>.+)$",
        regex::escape(LIST_EVENT_PREFIX)
    ))
    .expect("List event pattern should be valid");
}

/// Line colors, cycled when there are more cities than entries
pub const PALETTE: &[[u8; 3]] = &[
    [31, 119, 180],
    [255, 127, 14],
    [44, 160, 44],
    [214, 39, 40],
    [148, 103, 189],
    [140, 86, 75],
    [227, 119, 194],
    [127, 127, 127],
    [188, 189, 34],
    [23, 190, 207],
];

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const MARGIN: u32 = 40;

/// Longest hour range charted, counted back from the latest delivery
pub const MAX_SERIES_HOURS: i64 = 24 * 366;

/// One line of the event log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// `None` when the timestamp field does not parse
    pub timestamp: Option<NaiveDateTime>,
    /// Chat id or `bot`, without the trailing colon
    pub source: String,
    pub message: String,
}

/// A city list delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub at: NaiveDateTime,
    pub city: String,
}

/// Deliveries per city per hour over a continuous hour range
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageSeries {
    /// Start of every hour bucket, ascending
    pub hours: Vec<NaiveDateTime>,
    /// Per city, one count per entry of `hours`
    pub cities: BTreeMap<String, Vec<u32>>,
}

/// Parse a tab separated `timestamp, source, message` line.
///
/// Lines with fewer than three fields yield `None`.
pub fn parse_line(line: &str) -> Option<LogEntry> {
    let mut fields = line.trim().splitn(3, '\t');
    let timestamp = fields.next()?;
    let source = fields.next()?;
    let message = fields.next()?;

    Some(LogEntry {
        timestamp: NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT).ok(),
        source: source.trim().trim_end_matches(':').to_string(),
        message: message.trim().to_string(),
    })
}

pub fn parse_log(content: &str) -> Vec<LogEntry> {
    let entries: Vec<LogEntry> = content.lines().filter_map(parse_line).collect();
    debug!("Parsed {} log entries", entries.len());
    entries
}

/// Number of distinct sources, `bot` included
pub fn distinct_sources(entries: &[LogEntry]) -> usize {
    entries
        .iter()
        .map(|entry| entry.source.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// City list deliveries with a parseable timestamp
pub fn list_deliveries(entries: &[LogEntry]) -> Vec<Delivery> {
    entries
        .iter()
        .filter_map(|entry| {
            let at = entry.timestamp?;
            let city = LIST_EVENT.captures(&entry.message)?.name("city")?.as_str();
            Some(Delivery {
                at,
                city: city.to_string(),
            })
        })
        .collect()
}

/// Deliveries per city, most requested first, ties by name
pub fn city_counts(deliveries: &[Delivery]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for delivery in deliveries {
        *counts.entry(delivery.city.as_str()).or_default() += 1;
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(city, count)| (city.to_string(), count))
        .collect();
    // Stable sort keeps the name order of the BTreeMap among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn hour_start(at: NaiveDateTime) -> NaiveDateTime {
    at.date()
        .and_hms_opt(at.hour(), 0, 0)
        .unwrap_or(at)
}

/// Bucket deliveries by hour, from the first delivery's hour to the last one's.
///
/// The range is capped at [`MAX_SERIES_HOURS`] before the last delivery;
/// older deliveries are left out of the series.
pub fn hourly_series(deliveries: &[Delivery]) -> UsageSeries {
    let (Some(earliest), Some(last)) = (
        deliveries.iter().map(|d| hour_start(d.at)).min(),
        deliveries.iter().map(|d| hour_start(d.at)).max(),
    ) else {
        return UsageSeries::default();
    };
    let first = earliest.max(last - Duration::hours(MAX_SERIES_HOURS - 1));
    if first > earliest {
        warn!(
            "Leaving out deliveries before {} from the hourly series",
            first.format(TIMESTAMP_FORMAT)
        );
    }

    let mut hours = Vec::new();
    let mut hour = first;
    while hour <= last {
        hours.push(hour);
        hour += Duration::hours(1);
    }

    let mut cities: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for delivery in deliveries.iter().filter(|d| hour_start(d.at) >= first) {
        let index = (hour_start(delivery.at) - first).num_hours() as usize;
        let counts = cities
            .entry(delivery.city.clone())
            .or_insert_with(|| vec![0; hours.len()]);
        counts[index] += 1;
    }

    UsageSeries { hours, cities }
}

/// `"<day> <hour>"` label of an hour bucket
pub fn bucket_label(hour: NaiveDateTime) -> String {
    format!("{} {}", hour.day(), hour.hour())
}

pub fn color_for(index: usize) -> Rgb<u8> {
    Rgb(PALETTE[index % PALETTE.len()])
}

fn put(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_line(image: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).max(1);
    for step in 0..=steps {
        let x = from.0 + dx * step / steps;
        let y = from.1 + dy * step / steps;
        put(image, x, y, color);
        put(image, x, y + 1, color);
    }
}

/// Render one polyline per city over the hour buckets.
///
/// Cities are colored in name order with [`color_for`].
pub fn render_chart(series: &UsageSeries, width: u32, height: u32) -> RgbImage {
    let width = width.max(2 * MARGIN + 2);
    let height = height.max(2 * MARGIN + 2);
    let mut image = RgbImage::from_pixel(width, height, BACKGROUND);

    let (left, right) = (MARGIN as i64, (width - MARGIN) as i64);
    let (top, bottom) = (MARGIN as i64, (height - MARGIN) as i64);
    let buckets = series.hours.len();
    let max_count = series
        .cities
        .values()
        .flat_map(|counts| counts.iter().copied())
        .max()
        .unwrap_or(0)
        .max(1) as i64;

    let x_at = |index: usize| -> i64 {
        if buckets <= 1 {
            (left + right) / 2
        } else {
            left + (right - left) * index as i64 / (buckets as i64 - 1)
        }
    };
    let y_at = |count: u32| -> i64 { bottom - (bottom - top) * count as i64 / max_count };

    // Horizontal grid in fifths, vertical grid at every midnight
    for fifth in 0..=5 {
        let y = bottom - (bottom - top) * fifth / 5;
        draw_line(&mut image, (left, y), (right, y), GRID);
    }
    for (index, hour) in series.hours.iter().enumerate() {
        if hour.hour() == 0 {
            draw_line(&mut image, (x_at(index), top), (x_at(index), bottom), GRID);
        }
    }
    draw_line(&mut image, (left, bottom), (right, bottom), AXIS);
    draw_line(&mut image, (left, top), (left, bottom), AXIS);

    for (city_index, counts) in series.cities.values().enumerate() {
        let color = color_for(city_index);
        let points: Vec<(i64, i64)> = counts
            .iter()
            .enumerate()
            .map(|(index, count)| (x_at(index), y_at(*count)))
            .collect();
        match points.as_slice() {
            [only] => draw_line(&mut image, *only, *only, color),
            _ => {
                for pair in points.windows(2) {
                    draw_line(&mut image, pair[0], pair[1], color);
                }
            }
        }
    }

    image
}
