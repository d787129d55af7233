use anyhow::Context;
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{LoadVector, ScheduleRecord, TaskRecord};

pub const DEMO_USER_ID: &str = "demo-user";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    pub fn days(first: NaiveDate, last: NaiveDate) -> anyhow::Result<Self> {
        let after_last = last
            .checked_add_days(Days::new(1))
            .with_context(|| format!("date window ending {last} is out of range"))?;
        let start = first.and_time(NaiveTime::MIN).and_utc();
        let end = after_last.and_time(NaiveTime::MIN).and_utc() - Duration::milliseconds(1);
        Ok(Self { start, end })
    }
}

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn ensure_user(pool: &PgPool, user_id: &str, email: &str) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO visuy_cast.users (id, email)
        VALUES ($1, $2)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(email)
    .execute(pool)
    .await?;
    Ok(())
}

// Seed entries follow the current day, so re-seeding moves them.
fn seed_time(today: NaiveDate, offset: i64) -> anyhow::Result<DateTime<Utc>> {
    let day = today
        .checked_add_signed(Duration::days(offset))
        .context("invalid seed date")?;
    Ok(day.and_hms_opt(9, 0, 0).context("invalid seed time")?.and_utc())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    ensure_user(pool, DEMO_USER_ID, "demo@visuy.app").await?;

    let today = Utc::now().date_naive();
    let schedules = vec![
        ("seed-001", "Quarterly review", 0, "10:00", "11:30", (-0.8, 0.6, 0.9)),
        ("seed-002", "Lunch with Mika", 0, "12:30", "13:30", (0.7, 0.2, 0.4)),
        ("seed-003", "Dentist", 1, "09:00", "10:00", (-0.5, -0.3, 0.6)),
        ("seed-004", "Conference talk", 3, "14:00", "15:00", (0.4, 0.9, 0.8)),
        ("seed-005", "Reading session", 4, "19:00", "21:00", (0.6, -0.7, 0.3)),
        ("seed-006", "Budget deadline", 4, "17:00", "18:00", (-0.9, 0.8, 1.0)),
        ("seed-007", "Team retro", -2, "16:00", "17:00", (-0.2, 0.4, 0.5)),
    ];

    for (source_key, title, offset, start_time, end_time, (emotional, activity, intensity)) in
        schedules
    {
        let scheduled_at = seed_time(today, offset)?;

        sqlx::query(
            r#"
            INSERT INTO visuy_cast.schedules
            (id, user_id, title, scheduled_at, start_time, end_time,
             emotional, activity, intensity, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (source_key) DO UPDATE
            SET scheduled_at = EXCLUDED.scheduled_at, updated_at = now()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(DEMO_USER_ID)
        .bind(title)
        .bind(scheduled_at)
        .bind(start_time)
        .bind(end_time)
        .bind(emotional)
        .bind(activity)
        .bind(intensity)
        .bind(source_key)
        .execute(pool)
        .await?;
    }

    let tasks = vec![
        (
            Uuid::parse_str("6a0f3c52-1d7e-4b8f-9a44-2f1c9e0b7d31")?,
            "Draft slides for conference talk",
            (0.3, 0.8, 0.7),
        ),
        (
            Uuid::parse_str("b94e2d17-5c3a-4e61-8f0d-7a2b6c1e9f48")?,
            "File expense report",
            (-0.6, 0.4, 0.5),
        ),
    ];

    for (id, title, (emotional, activity, intensity)) in tasks {
        sqlx::query(
            r#"
            INSERT INTO visuy_cast.tasks
            (id, user_id, title, emotional, activity, intensity)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(DEMO_USER_ID)
        .bind(title)
        .bind(emotional)
        .bind(activity)
        .bind(intensity)
        .execute(pool)
        .await?;
    }

    Ok(())
}

fn load_from_row(row: &PgRow) -> LoadVector {
    LoadVector {
        emotional: row.get("emotional"),
        activity: row.get("activity"),
        intensity: row.get("intensity"),
    }
}

fn schedule_from_row(row: &PgRow) -> ScheduleRecord {
    ScheduleRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        description: row.get("description"),
        scheduled_at: row.get("scheduled_at"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        load: load_from_row(row),
    }
}

fn task_from_row(row: &PgRow) -> TaskRecord {
    TaskRecord {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        scheduled_for: row.get("scheduled_for"),
        completed: row.get("completed"),
        load: load_from_row(row),
    }
}

/// All schedule entries owned by `user_id`, oldest first.
pub async fn fetch_schedules(
    pool: &PgPool,
    user_id: &str,
    window: Option<DateWindow>,
) -> anyhow::Result<Vec<ScheduleRecord>> {
    let mut query = String::from(
        "SELECT id, user_id, title, description, scheduled_at, start_time, end_time, \
         emotional, activity, intensity \
         FROM visuy_cast.schedules \
         WHERE user_id = $1",
    );

    if window.is_some() {
        query.push_str(" AND scheduled_at >= $2 AND scheduled_at <= $3");
    }
    query.push_str(" ORDER BY scheduled_at");

    let mut rows = sqlx::query(&query).bind(user_id);

    if let Some(window) = window {
        rows = rows.bind(window.start).bind(window.end);
    }

    let records = rows.fetch_all(pool).await?;
    Ok(records.iter().map(schedule_from_row).collect())
}

pub async fn fetch_open_tasks(pool: &PgPool, user_id: &str) -> anyhow::Result<Vec<TaskRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, title, scheduled_for, completed, emotional, activity, intensity
        FROM visuy_cast.tasks
        WHERE user_id = $1 AND NOT completed AND scheduled_for IS NULL
        ORDER BY created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(task_from_row).collect())
}

pub async fn fetch_task(pool: &PgPool, task_id: Uuid) -> anyhow::Result<Option<TaskRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, title, scheduled_for, completed, emotional, activity, intensity
        FROM visuy_cast.tasks
        WHERE id = $1
        "#,
    )
    .bind(task_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(task_from_row))
}

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    title: String,
    scheduled_at: DateTime<Utc>,
    emotional: f64,
    activity: f64,
    intensity: f64,
    description: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    source_key: Option<String>,
}

impl CsvRow {
    fn load(&self) -> LoadVector {
        LoadVector::new(self.emotional, self.activity, self.intensity)
    }
}

/// Parses every row before anything is written, so one bad load rejects the
/// whole file.
fn read_csv_rows<R: std::io::Read>(input: R) -> anyhow::Result<Vec<CsvRow>> {
    let mut reader = csv::Reader::from_reader(input);
    let mut rows = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        // header is line 1
        let line = index + 2;
        let row = result.with_context(|| format!("invalid CSV row on line {line}"))?;
        row.load()
            .ensure_in_range()
            .with_context(|| format!("invalid load for \"{}\" on line {line}", row.title))?;
        rows.push(row);
    }

    Ok(rows)
}

pub async fn import_csv(
    pool: &PgPool,
    user_id: &str,
    csv_path: &std::path::Path,
) -> anyhow::Result<usize> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let rows = read_csv_rows(file)?;

    ensure_user(pool, user_id, &format!("{user_id}@users.invalid")).await?;
    let mut inserted = 0usize;

    for row in rows {
        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        let result = sqlx::query(
            r#"
            INSERT INTO visuy_cast.schedules
            (id, user_id, title, description, scheduled_at, start_time, end_time,
             emotional, activity, intensity, source_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&row.title)
        .bind(&row.description)
        .bind(row.scheduled_at)
        .bind(&row.start_time)
        .bind(&row.end_time)
        .bind(row.emotional)
        .bind(row.activity)
        .bind(row.intensity)
        .bind(source_key)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_spans_whole_days() {
        let first = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        let window = DateWindow::days(first, last).unwrap();

        assert_eq!(window.start.to_rfc3339(), "2026-03-01T00:00:00+00:00");
        assert_eq!(window.end.date_naive(), last);
        assert_eq!(window.end.format("%H:%M:%S%.3f").to_string(), "23:59:59.999");
    }

    #[test]
    fn window_ending_on_last_date_is_an_error() {
        assert!(DateWindow::days(NaiveDate::MAX, NaiveDate::MAX).is_err());
    }

    #[test]
    fn seed_times_follow_today() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(
            seed_time(today, -2).unwrap().to_rfc3339(),
            "2026-02-27T09:00:00+00:00"
        );
        assert_eq!(seed_time(today, 4).unwrap().date_naive(), today + Duration::days(4));
    }

    #[test]
    fn csv_rows_parse_with_optional_fields() {
        let input = "title,scheduled_at,emotional,activity,intensity,description,start_time,end_time,source_key\n\
                     Dentist,2026-03-02T09:00:00Z,-0.5,-0.3,0.6,,09:00,10:00,demo-1\n";
        let rows = read_csv_rows(input.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].load(), LoadVector::new(-0.5, -0.3, 0.6));
        assert!(rows[0].description.is_none());
        assert_eq!(rows[0].source_key.as_deref(), Some("demo-1"));
    }

    #[test]
    fn csv_rows_with_non_finite_load_are_rejected() {
        let header = "title,scheduled_at,emotional,activity,intensity,description,start_time,end_time,source_key\n";
        for bad in ["NaN,0.0,0.5", "0.1,inf,0.5", "0.1,0.2,1.5"] {
            let input = format!("{header}Fine,2026-03-01T09:00:00Z,0.1,0.1,0.1,,,,a\nBroken,2026-03-02T09:00:00Z,{bad},,,,b\n");
            let err = read_csv_rows(input.as_bytes()).unwrap_err();
            assert!(format!("{err:#}").contains("line 3"), "{err:#}");
        }
    }
}
