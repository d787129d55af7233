use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::weather::WeatherCategory;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadVector {
    pub emotional: f64,
    pub activity: f64,
    pub intensity: f64,
}

impl LoadVector {
    pub fn new(emotional: f64, activity: f64, intensity: f64) -> Self {
        Self {
            emotional,
            activity,
            intensity,
        }
    }

    /// Axes must lie in -1..=1 and intensity in 0..=1; NaN and infinities fail.
    pub fn ensure_in_range(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (-1.0..=1.0).contains(&self.emotional),
            "emotional must be within -1..=1, got {}",
            self.emotional
        );
        anyhow::ensure!(
            (-1.0..=1.0).contains(&self.activity),
            "activity must be within -1..=1, got {}",
            self.activity
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.intensity),
            "intensity must be within 0..=1, got {}",
            self.intensity
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub load: LoadVector,
}

impl ScheduleRecord {
    pub fn day(&self) -> NaiveDate {
        self.scheduled_at.date_naive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub scheduled_for: Option<NaiveDate>,
    pub completed: bool,
    pub load: LoadVector,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub weather: WeatherCategory,
    pub total_load: f64,
    pub record_count: usize,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyLoad {
    pub date: NaiveDate,
    pub total_load: f64,
    pub count: usize,
}
