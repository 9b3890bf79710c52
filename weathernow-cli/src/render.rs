//! Text rendering of a report: the info line, the forecast chart as a daily table, the map link.

use std::{collections::BTreeMap, fmt::Write};

use chrono::NaiveDate;
use weathernow_core::{Chart, Report, chart::{PRECIPITATION_AXIS_TITLE, TEMPERATURE_AXIS_TITLE}};

#[derive(Debug, Clone, Copy, PartialEq)]
struct DaySummary {
    min_c: f64,
    max_c: f64,
    rain_mm: f64,
}

/// Collapse the hourly traces into one row per local calendar day.
fn daily_summaries(chart: &Chart) -> BTreeMap<NaiveDate, DaySummary> {
    let mut days: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();

    let hours = chart
        .temperature
        .x
        .iter()
        .zip(&chart.temperature.y)
        .zip(&chart.precipitation.y);

    for ((time, &temp), &rain) in hours {
        days.entry(time.date())
            .and_modify(|d| {
                d.min_c = d.min_c.min(temp);
                d.max_c = d.max_c.max(temp);
                d.rain_mm += rain;
            })
            .or_insert(DaySummary {
                min_c: temp,
                max_c: temp,
                rain_mm: rain,
            });
    }

    days
}

pub fn render_report(report: &Report) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &Report) -> std::fmt::Result {
    let current = &report.current;

    writeln!(out, "{} ({})", report.map.label, report.coordinates)?;
    writeln!(out)?;
    writeln!(out, "Temperature: {}°C", current.temperature_c)?;
    writeln!(out, "Wind: {} m/s from {}", current.wind_speed_mps, report.wind_from)?;
    writeln!(out)?;

    writeln!(out, "Weekly forecast (local time, UTC{})", report.utc_offset)?;
    writeln!(
        out,
        "{:<16} {:>14} {:>14} {:>10}",
        "Day",
        format!("Min {TEMPERATURE_AXIS_TITLE}"),
        format!("Max {TEMPERATURE_AXIS_TITLE}"),
        PRECIPITATION_AXIS_TITLE,
    )?;

    let today = report.chart.now.x.date();
    for (day, summary) in daily_summaries(&report.chart) {
        let marker = if day == today { "  <- now" } else { "" };
        writeln!(
            out,
            "{:<16} {:>14.1} {:>14.1} {:>10.1}{}",
            day.format("%a %d %b %Y"),
            summary.min_c,
            summary.max_c,
            summary.rain_mm,
            marker,
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Now: {}", report.chart.now.label)?;
    writeln!(out, "Map: {}  {}", report.map.label, report.map.url())?;
    writeln!(out)?;
    writeln!(out, "Weather data: open-meteo.com | Cities: simplemaps.com")?;

    Ok(())
}
