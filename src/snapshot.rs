//! Month-level rollup snapshots for historical trend comparison.
//!
//! Snapshots are plain aggregates rebuilt on demand and overwritten at
//! will; persisting them is the caller's concern.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::report::RentReport;
use crate::summary::summarize_months;
use crate::types::Money;

/// One persisted month-level rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySnapshot {
    /// `YYYY-MM` key of the month.
    pub month: String,
    /// Date the rollup was captured.
    pub captured_on: NaiveDate,
    /// Total attributed amount.
    pub total: Money,
    /// Amount backed by paid invoices.
    pub paid: Money,
    /// Amount still outstanding.
    pub unpaid: Money,
    /// Employees with a non-zero amount in the month.
    pub employee_count: usize,
}

/// Builds snapshot rollups for every month of a computed report.
#[must_use]
pub fn build_snapshots(report: &RentReport, captured_on: NaiveDate) -> Vec<MonthlySnapshot> {
    let summaries = report.month_summaries.as_ref().map_or_else(
        || summarize_months(&report.employees, &report.months),
        Clone::clone,
    );
    summaries
        .into_iter()
        .map(|(month, summary)| MonthlySnapshot {
            month,
            captured_on,
            total: summary.total,
            paid: summary.paid,
            unpaid: summary.unpaid,
            employee_count: summary.employee_count,
        })
        .collect()
}
