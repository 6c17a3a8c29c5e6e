// Granularity domain model - period boundaries for bucketing
use super::error::KpiError;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Day,
    /// ISO week, Monday 00:00 UTC to the following Monday.
    Week,
    /// Calendar month anchored on the 1st.
    Month,
}

impl Granularity {
    pub fn code(&self) -> &'static str {
        match self {
            Granularity::Day => "D",
            Granularity::Week => "W",
            Granularity::Month => "M",
        }
    }

    /// Human label for the aggregated view.
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Day => "daily",
            Granularity::Week => "weekly (Monday start)",
            Granularity::Month => "monthly",
        }
    }

    /// Start of the bucket containing `timestamp`.
    pub fn bucket_start(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        let date = timestamp.date_naive();
        let start = match self {
            Granularity::Day => date,
            Granularity::Week => {
                let back = date.weekday().num_days_from_monday() as u64;
                date.checked_sub_days(Days::new(back)).unwrap_or(date)
            }
            Granularity::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date),
        };
        start.and_time(NaiveTime::MIN).and_utc()
    }
}

impl FromStr for Granularity {
    type Err = KpiError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code.trim().to_ascii_lowercase().as_str() {
            "d" | "day" => Ok(Granularity::Day),
            "w" | "week" => Ok(Granularity::Week),
            "m" | "month" => Ok(Granularity::Month),
            _ => Err(KpiError::InvalidGranularity(code.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Granularity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code())
    }
}
