use crate::contributors::ContributorInfo;
use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// One commit as extracted from a working copy. Scoped to a single
/// repository and immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub author_email: String,
    pub author_date: DateTime<Utc>,
    pub inserted_lines: u64,
}

/// All-time aggregation for one canonical identity, as written to
/// `generated_contrib.json`.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimedEntry {
    pub id: String,
    pub contributions: u64,
    pub commits: Vec<CommitRecord>,
    pub info: ContributorInfo,
    pub team: bool,
}

/// A fixed 3-calendar-month window, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuarterBucket {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QuarterBucket {
    /// Windows from the 2021-04-01 epoch forward, generated while the
    /// window start is on or before `now`.
    pub fn sequence(now: DateTime<Utc>) -> Vec<QuarterBucket> {
        let mut buckets = Vec::new();
        let mut start = quarter_epoch();
        while at_midnight(start) <= now {
            let Some(end) = start.checked_add_months(Months::new(3)) else {
                break;
            };
            buckets.push(QuarterBucket {
                start: at_midnight(start),
                end: at_midnight(end),
            });
            start = end;
        }
        buckets
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.start <= *timestamp && *timestamp < self.end
    }
}

fn quarter_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 4, 1).expect("fixed epoch is a valid date")
}

fn at_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// One identity's contribution within a quarter. Rows carry raw counts;
/// percentage shares are computed at render time.
#[derive(Debug, Clone)]
pub struct QuarterRow {
    pub name: String,
    pub team: bool,
    pub contributions: u64,
}

#[derive(Debug, Clone)]
pub struct QuarterReport {
    pub bucket: QuarterBucket,
    pub rows: Vec<QuarterRow>,
    pub total: u64,
    pub team_total: u64,
}
