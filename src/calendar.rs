//! Reporting-window months and invoice/month interval overlap.

use chrono::{Datelike, NaiveDate};

use crate::types::{CalendarMonth, DateSpan};

impl CalendarMonth {
    /// Builds the month for the given year and month number.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Self {
        let start = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month start");
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .expect("valid next month start")
            .pred_opt()
            .expect("valid month end");
        Self {
            year,
            month,
            key: format!("{year:04}-{month:02}"),
            start,
            end,
            // The last day's number is the month's day count.
            day_count: end.day(),
        }
    }

    /// Builds the month containing `date`.
    #[inline]
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

/// Generates the ordered months a report covers: `months_before` months
/// back, the reference month itself, and `months_after` months forward.
///
/// Deterministic for a given reference date; always yields
/// `months_before + months_after + 1` entries in chronological order.
#[must_use]
pub fn month_window(
    reference: NaiveDate,
    months_before: u32,
    months_after: u32,
) -> Vec<CalendarMonth> {
    let base = i64::from(reference.year()) * 12 + i64::from(reference.month()) - 1;
    let first = base - i64::from(months_before);
    let last = base + i64::from(months_after);
    (first..=last)
        .map(|index| {
            let year = i32::try_from(index.div_euclid(12)).expect("year in i32 range");
            let month = u32::try_from(index.rem_euclid(12) + 1).expect("month in 1..=12");
            CalendarMonth::new(year, month)
        })
        .collect()
}

/// Result of intersecting an invoice span with one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthOverlap {
    /// Overlapping day count, both boundary days included.
    pub overlap_days: u32,
    /// Whether the span contains the whole month.
    pub covers_full_month: bool,
    /// Day count of the month itself.
    pub month_days: u32,
}

/// Intersects an inclusive invoice span with a month.
#[must_use]
pub fn overlap(span: DateSpan, month: &CalendarMonth) -> MonthOverlap {
    let overlap_start = span.start.max(month.start);
    let overlap_end = span.end.min(month.end);
    let overlap_days = if overlap_start > overlap_end {
        0
    } else {
        // Inclusive counting: both boundary days belong to the overlap.
        u32::try_from((overlap_end - overlap_start).num_days() + 1).expect("non-negative days")
    };
    MonthOverlap {
        overlap_days,
        covers_full_month: span.start <= month.start && span.end >= month.end,
        month_days: month.day_count,
    }
}
