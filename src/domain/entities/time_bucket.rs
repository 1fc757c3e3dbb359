use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Width of the buckets used when counting events over time. All buckets are
/// aligned in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BucketFrequency {
    Hourly,
    #[default]
    Daily,
    /// Weeks start on Monday.
    Weekly,
    /// Months start on the 1st.
    Monthly,
}

impl BucketFrequency {
    /// Start of the bucket containing `time`.
    pub fn floor(&self, time: DateTime<Utc>) -> DateTime<Utc> {
        let date = time.date_naive();
        match self {
            BucketFrequency::Hourly => at_hour(date, time.hour()),
            BucketFrequency::Daily => at_hour(date, 0),
            BucketFrequency::Weekly => at_hour(
                date - Duration::days(i64::from(date.weekday().num_days_from_monday())),
                0,
            ),
            BucketFrequency::Monthly => at_hour(date - Duration::days(i64::from(date.day0())), 0),
        }
    }

    /// Start of the bucket following the one starting at `bucket_start`.
    pub fn next(&self, bucket_start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            BucketFrequency::Hourly => bucket_start.checked_add_signed(Duration::hours(1)),
            BucketFrequency::Daily => bucket_start.checked_add_signed(Duration::days(1)),
            BucketFrequency::Weekly => bucket_start.checked_add_signed(Duration::weeks(1)),
            BucketFrequency::Monthly => bucket_start.checked_add_months(Months::new(1)),
        }
    }
}

fn at_hour(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&date.and_time(time))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub start: DateTime<Utc>,
    pub count: usize,
}

/// Counts `times` per bucket. The result covers every bucket between the
/// earliest and latest event, including empty ones, in chronological order.
pub(crate) fn resample<I>(times: I, frequency: BucketFrequency) -> Vec<TimeBucket>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut counts: BTreeMap<DateTime<Utc>, usize> = BTreeMap::new();
    for time in times {
        *counts.entry(frequency.floor(time)).or_default() += 1;
    }
    let (Some(first), Some(last)) = (
        counts.keys().next().copied(),
        counts.keys().next_back().copied(),
    ) else {
        return Vec::new();
    };

    let mut buckets = Vec::new();
    let mut cursor = Some(first);
    while let Some(start) = cursor.filter(|start| *start <= last) {
        buckets.push(TimeBucket {
            start,
            count: counts.get(&start).copied().unwrap_or(0),
        });
        cursor = frequency.next(start);
    }
    buckets
}
