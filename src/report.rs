//! Report assembly: engine configuration, section toggles and the builder.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::allocate::allocate_employee;
use crate::calendar::month_window;
use crate::prorate::DEFAULT_MONTHLY_RENT;
use crate::summary::{company_breakdown, discrepancy_report, summarize_months};
use crate::types::{
    CalendarMonth, DiscrepancyReport, Employee, EmployeeAllocation, Invoice, Money, MonthSummary,
};

/// Engine policy values, hoisted out of the calculation code.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Fallback rent for employees whose record carries no monthly rent.
    pub default_monthly_rent: Money,
    /// Months before the reference month included in the window.
    pub months_before: u32,
    /// Months after the reference month included in the window.
    pub months_after: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_monthly_rent: DEFAULT_MONTHLY_RENT,
            months_before: 5,
            months_after: 0,
        }
    }
}

/// Set of flags determining which report sections to compute (internal type).
#[derive(Debug, Clone, Copy)]
pub(crate) struct ComputeOptions {
    pub month_summaries: bool,
    pub company_breakdown: bool,
    pub discrepancy: bool,
}

impl ComputeOptions {
    /// Computes every section.
    pub const fn everything() -> Self {
        Self {
            month_summaries: true,
            company_breakdown: true,
            discrepancy: true,
        }
    }
}

impl Default for ComputeOptions {
    fn default() -> Self {
        Self::everything()
    }
}

/// Computed report over one snapshot of employee and invoice records.
#[derive(Debug, Clone)]
pub struct RentReport {
    /// Ordered months of the reporting window.
    pub months: Vec<CalendarMonth>,
    /// Per-employee allocations, one entry per input employee.
    pub employees: Vec<EmployeeAllocation>,
    /// Month-level totals, when requested.
    pub month_summaries: Option<BTreeMap<String, MonthSummary>>,
    /// Month-level totals grouped by company, when requested.
    pub company_breakdown: Option<BTreeMap<String, BTreeMap<String, MonthSummary>>>,
    /// Theoretical-versus-invoiced comparison for the reference month, when requested.
    pub discrepancy: Option<DiscrepancyReport>,
}

/// Builder for [`RentReport`] with section toggles.
pub struct RentReportBuilder<'a> {
    employees: &'a [Employee],
    invoices: &'a [Invoice],
    reference_date: NaiveDate,
    config: EngineConfig,
    options: ComputeOptions,
}

impl<'a> RentReportBuilder<'a> {
    /// Creates a builder over one snapshot of records.
    ///
    /// # Example
    ///
    /// ```
    /// # use dorm_rent_report::RentReportBuilder;
    /// # use chrono::NaiveDate;
    /// let reference = NaiveDate::from_ymd_opt(2025, 9, 10).unwrap();
    /// let report = RentReportBuilder::new(&[], &[], reference)
    ///     .window(2, 0)
    ///     .discrepancy(false)
    ///     .compute();
    /// assert_eq!(report.months.len(), 3);
    /// ```
    #[inline]
    #[must_use]
    pub fn new(employees: &'a [Employee], invoices: &'a [Invoice], reference_date: NaiveDate) -> Self {
        Self {
            employees,
            invoices,
            reference_date,
            config: EngineConfig::default(),
            options: ComputeOptions::everything(),
        }
    }

    /// Replaces the whole engine configuration.
    #[inline]
    #[must_use]
    pub const fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the fallback monthly rent.
    #[inline]
    #[must_use]
    pub const fn default_monthly_rent(mut self, rent: Money) -> Self {
        self.config.default_monthly_rent = rent;
        self
    }

    /// Overrides the window span around the reference month.
    #[inline]
    #[must_use]
    pub const fn window(mut self, months_before: u32, months_after: u32) -> Self {
        self.config.months_before = months_before;
        self.config.months_after = months_after;
        self
    }

    /// Enables or disables the month summaries section.
    #[inline]
    #[must_use]
    pub const fn month_summaries(mut self, enabled: bool) -> Self {
        self.options.month_summaries = enabled;
        self
    }

    /// Enables or disables the company breakdown section.
    #[inline]
    #[must_use]
    pub const fn company_breakdown(mut self, enabled: bool) -> Self {
        self.options.company_breakdown = enabled;
        self
    }

    /// Enables or disables the discrepancy section.
    #[inline]
    #[must_use]
    pub const fn discrepancy(mut self, enabled: bool) -> Self {
        self.options.discrepancy = enabled;
        self
    }

    /// Runs the allocation engine over the snapshot.
    ///
    /// Pure and deterministic for a given snapshot and reference date; the
    /// records are treated as an immutable snapshot for the whole run.
    #[must_use]
    pub fn compute(self) -> RentReport {
        let months = month_window(
            self.reference_date,
            self.config.months_before,
            self.config.months_after,
        );
        let employees: Vec<EmployeeAllocation> = self
            .employees
            .iter()
            .map(|employee| {
                allocate_employee(
                    employee,
                    self.invoices,
                    &months,
                    self.config.default_monthly_rent,
                )
            })
            .collect();
        debug!(
            employees = employees.len(),
            months = months.len(),
            "allocation computed"
        );

        let month_summaries = self
            .options
            .month_summaries
            .then(|| summarize_months(&employees, &months));
        let companies = self
            .options
            .company_breakdown
            .then(|| company_breakdown(&employees, &months));
        let discrepancy = self.options.discrepancy.then(|| {
            let current = CalendarMonth::containing(self.reference_date);
            discrepancy_report(self.employees, self.invoices, &current)
        });

        RentReport {
            months,
            employees,
            month_summaries,
            company_breakdown: companies,
            discrepancy,
        }
    }
}
