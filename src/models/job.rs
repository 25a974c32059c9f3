use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A time range already occupied by a provider job. Always UTC.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookedInterval {
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
}

impl BookedInterval {
    pub fn new(scheduled_start: DateTime<Utc>, scheduled_end: DateTime<Utc>) -> Self {
        Self {
            scheduled_start,
            scheduled_end,
        }
    }

    /// Strict half-open overlap: touching boundaries do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.scheduled_end && end > self.scheduled_start
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schedule {
    pub scheduled_start: DateTime<Utc>,
    pub scheduled_end: DateTime<Utc>,
}

/// Body accepted by the create-job relay and forwarded to the provider.
///
/// `schedule` is passed through untouched: offsets, arrival windows and any
/// other provider keys reach the provider as sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewJob {
    pub customer_id: String,
    pub schedule: Value,
}

impl NewJob {
    pub fn new(customer_id: impl Into<String>, schedule: Schedule) -> Self {
        Self {
            customer_id: customer_id.into(),
            schedule: serde_json::json!(schedule),
        }
    }
}

/// Schedule block of a provider job. Bounds are kept as raw strings since
/// unscheduled jobs carry nulls and the provider's offsets vary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct JobSchedule {
    #[serde(default)]
    pub scheduled_start: Option<String>,
    #[serde(default)]
    pub scheduled_end: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub schedule: Option<JobSchedule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Returns `None` for jobs without both schedule bounds or with bounds
    /// that do not parse as RFC 3339.
    pub fn booked_interval(&self) -> Option<BookedInterval> {
        let schedule = self.schedule.as_ref()?;
        let start = parse_instant(schedule.scheduled_start.as_deref()?)?;
        let end = parse_instant(schedule.scheduled_end.as_deref()?)?;
        Some(BookedInterval::new(start, end))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobPage {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobPage {
    pub fn booked_intervals(&self) -> Vec<BookedInterval> {
        self.jobs
            .iter()
            .filter_map(|job| {
                let interval = job.booked_interval();
                if interval.is_none() {
                    tracing::debug!(job_id = ?job.id, "skipping job without a usable schedule");
                }
                interval
            })
            .collect()
    }
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_overlap_is_strict() {
        let booked = BookedInterval::new(utc(2024, 1, 1, 11, 0), utc(2024, 1, 1, 12, 0));
        assert!(!booked.overlaps(utc(2024, 1, 1, 10, 0), utc(2024, 1, 1, 11, 0)));
        assert!(!booked.overlaps(utc(2024, 1, 1, 12, 0), utc(2024, 1, 1, 13, 0)));
        assert!(booked.overlaps(utc(2024, 1, 1, 11, 30), utc(2024, 1, 1, 12, 30)));
        assert!(booked.overlaps(utc(2024, 1, 1, 10, 0), utc(2024, 1, 1, 14, 0)));
    }

    #[test]
    fn test_booked_intervals_normalize_offsets_to_utc() {
        let page: JobPage = serde_json::from_str(
            r#"{"jobs":[{"id":"job_1","schedule":{"scheduled_start":"2024-01-01T12:00:00+02:00","scheduled_end":"2024-01-01T13:00:00+02:00","arrival_window":0}}]}"#,
        )
        .unwrap();

        let intervals = page.booked_intervals();
        assert_eq!(
            intervals,
            vec![BookedInterval::new(utc(2024, 1, 1, 10, 0), utc(2024, 1, 1, 11, 0))]
        );
    }

    #[test]
    fn test_unscheduled_jobs_are_skipped() {
        let page: JobPage = serde_json::from_str(
            r#"{"jobs":[
                {"id":"no_schedule"},
                {"id":"null_schedule","schedule":null},
                {"id":"null_bounds","schedule":{"scheduled_start":null,"scheduled_end":null}},
                {"id":"half","schedule":{"scheduled_start":"2024-01-01T10:00:00Z","scheduled_end":null}},
                {"id":"garbage","schedule":{"scheduled_start":"tomorrow","scheduled_end":"2024-01-01T11:00:00Z"}},
                {"id":"ok","schedule":{"scheduled_start":"2024-01-01T10:00:00Z","scheduled_end":"2024-01-01T11:00:00Z"}}
            ]}"#,
        )
        .unwrap();

        let intervals = page.booked_intervals();
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].scheduled_start, utc(2024, 1, 1, 10, 0));
    }

    #[test]
    fn test_new_job_serializes_utc_schedule() {
        let job = NewJob::new(
            "cus_1",
            Schedule {
                scheduled_start: utc(2024, 1, 2, 14, 0),
                scheduled_end: utc(2024, 1, 2, 15, 0),
            },
        );
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["customer_id"], "cus_1");
        assert_eq!(value["schedule"]["scheduled_start"], "2024-01-02T14:00:00Z");
        assert_eq!(value["schedule"]["scheduled_end"], "2024-01-02T15:00:00Z");
    }

    #[test]
    fn test_relayed_schedule_is_kept_verbatim() {
        let body = r#"{"customer_id":"cus_1","schedule":{"scheduled_start":"2024-01-02T09:00:00-05:00","scheduled_end":"soon","arrival_window":60}}"#;
        let job: NewJob = serde_json::from_str(body).unwrap();
        assert_eq!(job.schedule["scheduled_start"], "2024-01-02T09:00:00-05:00");
        assert_eq!(job.schedule["scheduled_end"], "soon");
        assert_eq!(job.schedule["arrival_window"], 60);
        assert_eq!(
            serde_json::to_value(&job).unwrap(),
            serde_json::from_str::<Value>(body).unwrap()
        );
    }
}
