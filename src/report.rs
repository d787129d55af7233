use std::fmt::Write;

use chrono::{Days, NaiveDate};

use crate::forecast::{self, DEFAULT_FORECAST_DAYS};
use crate::load::{group_by_day, score, total_load};
use crate::models::{DailyLoad, ScheduleRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Period {
    Week,
    Month,
}

impl Period {
    pub fn days(self) -> u64 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::Week => "past week",
            Period::Month => "past month",
        }
    }
}

pub fn load_history(records: &[ScheduleRecord], end: NaiveDate, days: u64) -> Vec<DailyLoad> {
    let buckets = group_by_day(records);

    (0..days)
        .rev()
        .filter_map(|back| end.checked_sub_days(Days::new(back)))
        .map(|date| {
            let bucket = buckets.get(&date);
            DailyLoad {
                date,
                total_load: bucket.map_or(0.0, |b| total_load(b.iter().copied())),
                count: bucket.map_or(0, Vec::len),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadMix {
    pub positive: usize,
    pub negative: usize,
    pub output: usize,
    pub input: usize,
    pub average_score: f64,
}

impl LoadMix {
    /// Neutral axes (exactly zero) are counted on neither side.
    pub fn from_records(records: &[ScheduleRecord]) -> Self {
        let mut mix = LoadMix::default();

        for record in records {
            if record.load.emotional > 0.0 {
                mix.positive += 1;
            } else if record.load.emotional < 0.0 {
                mix.negative += 1;
            }
            if record.load.activity > 0.0 {
                mix.output += 1;
            } else if record.load.activity < 0.0 {
                mix.input += 1;
            }
        }

        if !records.is_empty() {
            mix.average_score = total_load(records) / records.len() as f64;
        }

        mix
    }
}

pub fn build_report(
    user_id: &str,
    period: Period,
    today: NaiveDate,
    records: &[ScheduleRecord],
) -> String {
    let week_ahead = forecast::forecast(today, DEFAULT_FORECAST_DAYS, records);
    let history = load_history(records, today, period.days());
    let history_start = history.first().map(|d| d.date).unwrap_or(today);
    let in_period: Vec<ScheduleRecord> = records
        .iter()
        .filter(|r| r.day() >= history_start && r.day() <= today)
        .cloned()
        .collect();
    let mix = LoadMix::from_records(&in_period);

    let mut output = String::new();

    let _ = writeln!(output, "# Capacity Forecast Report");
    let _ = writeln!(
        output,
        "Generated for {} on {} ({} since {})",
        user_id,
        today,
        period.label(),
        history_start
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Week Ahead");

    for day in &week_ahead {
        let _ = writeln!(
            output,
            "- {}: {} load {:.2} across {} entries",
            day.date, day.weather, day.total_load, day.record_count
        );
    }
    let _ = writeln!(
        output,
        "Average daily load {:.2}",
        forecast::average_load(&week_ahead)
    );
    match forecast::peak_load_day(&week_ahead) {
        Some(peak) if peak.record_count > 0 => {
            let _ = writeln!(
                output,
                "Peak day {} ({}): {}",
                peak.date, peak.weather, peak.description
            );
        }
        _ => {
            let _ = writeln!(output, "No entries scheduled for the week ahead.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Load History");

    if in_period.is_empty() {
        let _ = writeln!(output, "No entries recorded for this period.");
    } else {
        for day in history.iter().filter(|d| d.count > 0) {
            let _ = writeln!(
                output,
                "- {}: load {:.2} across {} entries",
                day.date, day.total_load, day.count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Load Mix");
    let _ = writeln!(output, "- Entries: {}", in_period.len());
    let _ = writeln!(output, "- Average score: {:.2}", mix.average_score);
    let _ = writeln!(
        output,
        "- Emotional: {} positive, {} negative",
        mix.positive, mix.negative
    );
    let _ = writeln!(
        output,
        "- Activity: {} output, {} input",
        mix.output, mix.input
    );

    let mut heaviest: Vec<&ScheduleRecord> = in_period.iter().collect();
    heaviest.sort_by(|a, b| score(&b.load).total_cmp(&score(&a.load)));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Heaviest Entries");

    if heaviest.is_empty() {
        let _ = writeln!(output, "No entries recorded for this period.");
    } else {
        for record in heaviest.iter().take(5) {
            let _ = writeln!(
                output,
                "- {} on {}: score {:.2}",
                record.title,
                record.day(),
                score(&record.load)
            );
        }
    }

    output
}
