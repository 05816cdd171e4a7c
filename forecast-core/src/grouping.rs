//! Collapse the flat 3-hour sample list into one entry per calendar date.

use chrono::{FixedOffset, NaiveDate, Timelike};

use crate::model::{DailyRepresentative, ForecastResponse, ForecastSample, TimeBasis};

/// Earliest local hour a sample may start at to represent its date.
pub const REPRESENTATIVE_MIN_HOUR: u32 = 6;

fn local_date(sample: &ForecastSample, offset: FixedOffset) -> NaiveDate {
    sample.timestamp.with_timezone(&offset).date_naive()
}

fn local_hour(sample: &ForecastSample, offset: FixedOffset) -> u32 {
    sample.timestamp.with_timezone(&offset).hour()
}

/// Unique calendar dates of `samples`, in order of first appearance.
pub fn distinct_dates(samples: &[ForecastSample], offset: FixedOffset) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = Vec::new();
    for sample in samples {
        let date = local_date(sample, offset);
        if !dates.contains(&date) {
            dates.push(date);
        }
    }
    dates
}

/// One [`DailyRepresentative`] per distinct date, in order of first appearance.
///
/// The representative is the first sample on the date whose local hour is at
/// least [`REPRESENTATIVE_MIN_HOUR`]. Dates without such a sample are kept with
/// an empty slot so callers can decide whether to skip them.
pub fn group_by_day(response: &ForecastResponse, basis: TimeBasis) -> Vec<DailyRepresentative> {
    let offset = basis.offset(&response.city);

    let days: Vec<DailyRepresentative> = distinct_dates(&response.samples, offset)
        .into_iter()
        .map(|date| DailyRepresentative {
            date,
            sample: response
                .samples
                .iter()
                .find(|s| local_date(s, offset) == date && local_hour(s, offset) >= REPRESENTATIVE_MIN_HOUR)
                .cloned(),
        })
        .collect();

    let missing = days.iter().filter(|d| d.sample.is_none()).count();
    if missing > 0 {
        tracing::debug!(missing, total = days.len(), "dates without a daytime sample");
    }

    days
}

/// The first `days` dates that have a representative, for the multi-day list.
///
/// Empty slots do not count toward `days`.
pub fn forecast_days(response: &ForecastResponse, basis: TimeBasis, days: usize) -> Vec<DailyRepresentative> {
    group_by_day(response, basis)
        .into_iter()
        .filter(|d| d.sample.is_some())
        .take(days)
        .collect()
}
