use chrono::{Days, NaiveDate};

use crate::load::{group_by_day, score, total_load};
use crate::models::{ForecastDay, LoadVector, ScheduleRecord};
use crate::weather::classify;

pub const DEFAULT_FORECAST_DAYS: usize = 7;
pub const DEFAULT_SUGGESTION_COUNT: usize = 3;

pub fn forecast(start: NaiveDate, num_days: usize, records: &[ScheduleRecord]) -> Vec<ForecastDay> {
    let buckets = group_by_day(records);

    start
        .iter_days()
        .take(num_days)
        .map(|date| {
            let (total, count) = buckets
                .get(&date)
                .map(|bucket| (total_load(bucket.iter().copied()), bucket.len()))
                .unwrap_or((0.0, 0));
            let classification = classify(total, count);

            ForecastDay {
                date,
                weather: classification.category,
                total_load: total,
                record_count: count,
                description: classification.description,
            }
        })
        .collect()
}

/// Days where adding `candidate` as one more record keeps the average load
/// lowest. Duration and deadlines are not considered. Equal projections keep
/// forecast order and unscorable (NaN) days rank last.
pub fn suggest_dates(forecast: &[ForecastDay], candidate: &LoadVector, count: usize) -> Vec<NaiveDate> {
    let candidate_score = score(candidate);

    let mut projected: Vec<(NaiveDate, f64)> = forecast
        .iter()
        .map(|day| {
            let average = (day.total_load + candidate_score) / (day.record_count + 1) as f64;
            (day.date, average)
        })
        .collect();

    // sort_by is stable, so equal projections keep forecast order
    projected.sort_by(|a, b| {
        a.1.is_nan()
            .cmp(&b.1.is_nan())
            .then_with(|| a.1.total_cmp(&b.1))
    });
    projected.into_iter().take(count).map(|(date, _)| date).collect()
}

pub fn average_load(forecast: &[ForecastDay]) -> f64 {
    if forecast.is_empty() {
        return 0.0;
    }

    let total: f64 = forecast.iter().map(|day| day.total_load).sum();
    total / forecast.len() as f64
}

/// Heaviest day of the forecast; the earliest one wins a tie.
pub fn peak_load_day(forecast: &[ForecastDay]) -> Option<&ForecastDay> {
    forecast.iter().fold(None, |peak, day| match peak {
        Some(current) if day.total_load <= current.total_load => Some(current),
        _ => Some(day),
    })
}

pub fn offset_date(start: NaiveDate, days: u64) -> Option<NaiveDate> {
    start.checked_add_days(Days::new(days))
}
