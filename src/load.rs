use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{LoadVector, ScheduleRecord};

pub const NEGATIVE_EMOTION_WEIGHT: f64 = 1.5;

/// Intensity scales each axis and then the combined sum again, so the score
/// grows with the square of intensity.
pub fn score(load: &LoadVector) -> f64 {
    let emotional_impact = load.emotional.abs() * load.intensity;
    let activity_impact = load.activity.abs() * load.intensity;
    let emotional_weight = if load.emotional < 0.0 {
        NEGATIVE_EMOTION_WEIGHT
    } else {
        1.0
    };

    (emotional_impact * emotional_weight + activity_impact) * load.intensity
}

pub fn total_load<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a ScheduleRecord>,
{
    records.into_iter().map(|record| score(&record.load)).sum()
}

pub fn group_by_day(records: &[ScheduleRecord]) -> BTreeMap<NaiveDate, Vec<&ScheduleRecord>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&ScheduleRecord>> = BTreeMap::new();

    for record in records {
        buckets.entry(record.day()).or_default().push(record);
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{day, record_at, record_on};

    #[test]
    fn zero_intensity_scores_zero() {
        for (emotional, activity) in [(-1.0, -1.0), (1.0, 1.0), (-0.4, 0.9)] {
            assert_eq!(score(&LoadVector::new(emotional, activity, 0.0)), 0.0);
        }
    }

    #[test]
    fn neutral_axes_score_zero() {
        assert_eq!(score(&LoadVector::new(0.0, 0.0, 1.0)), 0.0);
    }

    #[test]
    fn reference_scores() {
        assert_eq!(score(&LoadVector::new(-1.0, 0.0, 1.0)), 1.5);
        assert_eq!(score(&LoadVector::new(1.0, 0.0, 1.0)), 1.0);
        assert_eq!(score(&LoadVector::new(0.0, 1.0, 1.0)), 1.0);
    }

    #[test]
    fn score_is_quadratic_in_intensity() {
        let full = score(&LoadVector::new(-0.6, 0.4, 1.0));
        let half = score(&LoadVector::new(-0.6, 0.4, 0.5));
        assert!((half - full * 0.25).abs() < 1e-12);
    }

    #[test]
    fn scores_are_never_negative() {
        let steps = [-1.0, -0.5, 0.0, 0.5, 1.0];
        for emotional in steps {
            for activity in steps {
                for intensity in [0.0, 0.25, 1.0] {
                    let value = score(&LoadVector::new(emotional, activity, intensity));
                    assert!(value >= 0.0);
                }
            }
        }
    }

    #[test]
    fn total_load_sums_scores() {
        let records = vec![
            record_on(day(2026, 3, 2), LoadVector::new(-1.0, 0.0, 1.0)),
            record_on(day(2026, 3, 2), LoadVector::new(0.0, 1.0, 1.0)),
        ];
        assert!((total_load(&records) - 2.5).abs() < 1e-12);
        assert_eq!(total_load(&Vec::<ScheduleRecord>::new()), 0.0);
    }

    #[test]
    fn grouping_partitions_records_by_day() {
        let records = vec![
            record_at(day(2026, 3, 2), 8, LoadVector::new(0.2, 0.1, 0.3)),
            record_at(day(2026, 3, 2), 23, LoadVector::new(0.2, 0.1, 0.3)),
            record_at(day(2026, 3, 3), 0, LoadVector::new(0.2, 0.1, 0.3)),
            record_at(day(2026, 3, 9), 12, LoadVector::new(0.2, 0.1, 0.3)),
        ];

        let buckets = group_by_day(&records);
        let total: usize = buckets.values().map(Vec::len).sum();
        assert_eq!(total, records.len());
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[&day(2026, 3, 2)].len(), 2);

        for (key, bucket) in &buckets {
            assert!(bucket.iter().all(|record| record.day() == *key));
        }
    }
}
