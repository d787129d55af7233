use chrono::{NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::models::{LoadVector, ScheduleRecord};

pub fn day(year: i32, month: u32, date: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, date).expect("valid test date")
}

pub fn record_at(date: NaiveDate, hour: u32, load: LoadVector) -> ScheduleRecord {
    let naive = date.and_hms_opt(hour, 0, 0).expect("valid test time");
    ScheduleRecord {
        id: Uuid::new_v4(),
        user_id: "demo-user".to_string(),
        title: "Team sync".to_string(),
        description: None,
        scheduled_at: Utc.from_utc_datetime(&naive),
        start_time: None,
        end_time: None,
        load,
    }
}

pub fn record_on(date: NaiveDate, load: LoadVector) -> ScheduleRecord {
    record_at(date, 10, load)
}
