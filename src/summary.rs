//! Month-level rollups, company breakdown and the discrepancy report.

use std::collections::BTreeMap;

use crate::allocate::eligible_for_allocation;
use crate::matching::invoice_matches_employee;
use crate::types::{
    CalendarMonth, DiscrepancyReport, Employee, EmployeeAllocation, EmployeeDiscrepancy, Invoice,
    InvoiceCoverage, Money, MonthSummary,
};

/// Rolls allocations into per-month totals across all employees.
///
/// Every window month gets an entry, zeroed when nothing was attributed.
#[must_use]
pub fn summarize_months(
    allocations: &[EmployeeAllocation],
    months: &[CalendarMonth],
) -> BTreeMap<String, MonthSummary> {
    let mut summaries = empty_summaries(months);
    for allocation in allocations {
        accumulate(&mut summaries, allocation);
    }
    summaries
}

/// The same rollup grouped by employing company.
#[must_use]
pub fn company_breakdown(
    allocations: &[EmployeeAllocation],
    months: &[CalendarMonth],
) -> BTreeMap<String, BTreeMap<String, MonthSummary>> {
    let mut breakdown: BTreeMap<String, BTreeMap<String, MonthSummary>> = BTreeMap::new();
    for allocation in allocations {
        let summaries = breakdown
            .entry(allocation.company.clone())
            .or_insert_with(|| empty_summaries(months));
        accumulate(summaries, allocation);
    }
    breakdown
}

/// Builds the theoretical-versus-invoiced comparison for one month.
///
/// `invoiced_rent` is a direct face-value sum over eligible invoices
/// overlapping the month, computed independently of the allocation
/// engine's month total. The two figures are expected to disagree
/// slightly; both are reported and neither is reconciled away.
#[must_use]
pub fn discrepancy_report(
    employees: &[Employee],
    invoices: &[Invoice],
    month: &CalendarMonth,
) -> DiscrepancyReport {
    let overlapping: Vec<&Invoice> = invoices
        .iter()
        .filter(|invoice| eligible_for_allocation(invoice))
        .filter(|invoice| {
            invoice
                .period
                .is_some_and(|period| period.start <= month.end && period.end >= month.start)
        })
        .collect();
    let invoiced_rent: Money = overlapping.iter().map(|invoice| invoice.amount).sum();

    let mut theoretical_rent = Money::ZERO;
    let mut rows = Vec::new();
    for employee in employees {
        if !employee.status.is_active_payer() {
            continue;
        }
        theoretical_rent += employee.monthly_rent;

        let matched: Vec<&&Invoice> = overlapping
            .iter()
            .filter(|invoice| invoice_matches_employee(invoice, employee))
            .collect();
        let invoiced: Money = matched.iter().map(|invoice| invoice.amount).sum();
        let coverage = if matched.is_empty() {
            InvoiceCoverage::NoInvoice
        } else if invoiced == employee.monthly_rent {
            InvoiceCoverage::Match
        } else {
            InvoiceCoverage::AmountMismatch
        };
        rows.push(EmployeeDiscrepancy {
            employee_id: employee.id.clone(),
            employee_name: employee.name.clone(),
            company: employee.company.clone(),
            monthly_rent: employee.monthly_rent,
            invoiced,
            coverage,
        });
    }

    DiscrepancyReport {
        month: month.key.clone(),
        theoretical_rent,
        invoiced_rent,
        difference: theoretical_rent - invoiced_rent,
        employees: rows,
    }
}

/// Zeroed summaries for every window month.
fn empty_summaries(months: &[CalendarMonth]) -> BTreeMap<String, MonthSummary> {
    months
        .iter()
        .map(|month| (month.key.clone(), MonthSummary::default()))
        .collect()
}

/// Folds one employee's months into the running summaries.
fn accumulate(summaries: &mut BTreeMap<String, MonthSummary>, allocation: &EmployeeAllocation) {
    for (key, monthly) in &allocation.months {
        let Some(summary) = summaries.get_mut(key) else {
            continue;
        };
        if monthly.capped_amount > Money::ZERO {
            summary.employee_count += 1;
        }
        for item in &monthly.line_items {
            summary.total += item.amount;
            if item.is_paid {
                summary.paid += item.amount;
                summary.paid_count += 1;
            } else {
                summary.unpaid += item.amount;
                summary.unpaid_count += 1;
            }
        }
    }
}
