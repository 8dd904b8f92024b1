//! Domain types for employees, invoices, reporting months and derived allocations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Monetary value, `Decimal` for exact arithmetic.
pub type Money = Decimal;

/// Opaque employee identifier from the record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmployeeId(pub String);

/// Opaque invoice identifier from the record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvoiceId(pub String);

/// Housing status of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeStatus {
    /// Currently housed in a property.
    Housed,
    /// Waiting for a room assignment.
    PendingAssignment,
    /// Moved out of the property.
    Departed,
    /// Left the company.
    Resigned,
    /// Any other or unknown status.
    Other,
}

impl EmployeeStatus {
    /// Whether the employee counts as an active rent-payer.
    #[inline]
    #[must_use]
    pub const fn is_active_payer(self) -> bool {
        matches!(self, Self::Housed)
    }
}

/// Employee record consumed read-only by the engine.
#[derive(Debug, Clone)]
pub struct Employee {
    /// Store identifier.
    pub id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Employing company, used for the company breakdown.
    pub company: String,
    /// Housing status.
    pub status: EmployeeStatus,
    /// Contractual monthly rent; zero means the record has no rent set.
    pub monthly_rent: Money,
}

/// Processing status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    /// Settled; the only status counted toward received totals.
    Paid,
    /// Issued and awaiting payment.
    Pending,
    /// Past its due date.
    Overdue,
    /// Raised for a newly signed contract.
    NewlySigned,
    /// Security-deposit charge, excluded from rent revenue.
    Deposit,
    /// Any other or unknown status.
    Other,
}

impl InvoiceStatus {
    /// Whether amounts on this invoice count as received.
    #[inline]
    #[must_use]
    pub const fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// Link between an invoice and the employee(s) it bills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeRef {
    /// Direct link by employee id.
    Id(EmployeeId),
    /// Free-text employee names requiring fuzzy matching.
    Names(Vec<String>),
}

/// Inclusive calendar-date span covered by an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    /// First covered day.
    pub start: NaiveDate,
    /// Last covered day.
    pub end: NaiveDate,
}

/// Invoice record consumed read-only by the engine.
#[derive(Debug, Clone)]
pub struct Invoice {
    /// Store identifier.
    pub id: InvoiceId,
    /// Human-facing invoice number.
    pub invoice_number: String,
    /// Billed employee linkage.
    pub employee_ref: EmployeeRef,
    /// Face value of the invoice as a single lump sum.
    pub amount: Money,
    /// Covered span; `None` when either date is missing in the store.
    pub period: Option<DateSpan>,
    /// Processing status.
    pub status: InvoiceStatus,
    /// Some views exclude invoices explicitly flagged as not issued.
    pub is_issued: Option<bool>,
    /// Free-text description, scanned for deposit keywords.
    pub description: String,
    /// Invoice type label, scanned for deposit keywords.
    pub kind: String,
    /// Operator notes, scanned for deposit keywords.
    pub notes: String,
}

/// One calendar month of the reporting window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonth {
    /// Calendar year.
    pub year: i32,
    /// Month number, 1–12.
    pub month: u32,
    /// Stable `YYYY-MM` key.
    pub key: String,
    /// First day of the month.
    pub start: NaiveDate,
    /// Last day of the month.
    pub end: NaiveDate,
    /// Number of days in the month, 28–31.
    pub day_count: u32,
}

/// Origin of one contribution within a monthly allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineItemSource {
    /// Prorated contribution of one invoice.
    Invoice {
        /// Invoice id.
        id: InvoiceId,
        /// Human-facing invoice number.
        number: String,
        /// First day the invoice covers.
        start: NaiveDate,
        /// Last day the invoice covers.
        end: NaiveDate,
    },
    /// Synthetic inflow redistributed from capped months.
    Redistribution {
        /// Keys of the capped months the excess came from.
        from_months: Vec<String>,
    },
}

/// One contribution to an employee's month, kept for drill-down views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Where the contribution came from.
    pub source: LineItemSource,
    /// Contribution after any capping scale-down.
    pub amount: Money,
    /// Whether the backing invoice is paid; redistributed inflow counts as unpaid.
    pub is_paid: bool,
}

/// Derived rent attribution for one employee in one month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyAllocation {
    /// Sum of raw proportional contributions before capping.
    pub original_amount: Money,
    /// Amount after the cap-and-redistribute pass.
    pub capped_amount: Money,
    /// Whether the month-level cap was applied.
    pub was_capped: bool,
    /// Amount removed by capping, zero if not capped.
    pub excess_amount: Money,
    /// Amount added from other months' excess, zero if none.
    pub redistributed_amount: Money,
    /// Ordered contributions backing `capped_amount`.
    pub line_items: Vec<LineItem>,
}

/// Finalized allocation of one employee across the reporting window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeAllocation {
    /// Employee id.
    pub employee_id: EmployeeId,
    /// Employee display name.
    pub employee_name: String,
    /// Employing company.
    pub company: String,
    /// Rent used for proration and capping, contractual or the configured default.
    pub effective_rent: Money,
    /// Whether the default rent stood in for a zero/absent contractual rent.
    pub default_rent_applied: bool,
    /// Per-month allocations, keyed by `YYYY-MM`.
    pub months: BTreeMap<String, MonthlyAllocation>,
    /// Capped excess that no month in the window had room to absorb.
    pub unresolved_excess: Money,
}

/// Month-level totals across all employees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthSummary {
    /// Total attributed amount.
    pub total: Money,
    /// Attributed amount backed by paid invoices.
    pub paid: Money,
    /// Attributed amount still outstanding.
    pub unpaid: Money,
    /// Number of paid line items.
    pub paid_count: usize,
    /// Number of unpaid line items.
    pub unpaid_count: usize,
    /// Employees with a non-zero amount in the month.
    pub employee_count: usize,
}

/// How an employee's invoices cover a month in the discrepancy report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceCoverage {
    /// Invoiced face value equals the contractual rent.
    Match,
    /// No eligible invoice overlaps the month.
    NoInvoice,
    /// Invoiced face value differs from the contractual rent.
    AmountMismatch,
}

/// Per-employee row of the discrepancy report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDiscrepancy {
    /// Employee id.
    pub employee_id: EmployeeId,
    /// Employee display name.
    pub employee_name: String,
    /// Employing company.
    pub company: String,
    /// Contractual monthly rent.
    pub monthly_rent: Money,
    /// Face value of overlapping eligible invoices.
    pub invoiced: Money,
    /// Coverage classification.
    pub coverage: InvoiceCoverage,
}

/// Theoretical versus invoiced rent for one month.
///
/// The invoiced total here is computed directly from invoice face values,
/// independently of the allocation engine's month total. The two figures
/// are expected to differ slightly and are both reported as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscrepancyReport {
    /// `YYYY-MM` key of the examined month.
    pub month: String,
    /// Sum of contractual rents over housed employees.
    pub theoretical_rent: Money,
    /// Direct face-value sum of invoices overlapping the month.
    pub invoiced_rent: Money,
    /// `theoretical_rent - invoiced_rent`.
    pub difference: Money,
    /// Per-employee coverage rows.
    pub employees: Vec<EmployeeDiscrepancy>,
}
