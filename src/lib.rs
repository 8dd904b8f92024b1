#![warn(missing_docs)]
//! Monthly rent allocation and collection reports for dormitory operators.
//!
//! Takes a read-only snapshot of employee and invoice records, prorates
//! every invoice across the calendar months it covers, caps each month at
//! the employee's contractual rent while redistributing the excess, and
//! rolls the result into month, company and discrepancy summaries.

mod allocate;
mod calendar;
mod deposit;
mod error;
mod export;
mod matching;
mod prorate;
mod raw;
mod report;
mod snapshot;
mod summary;
mod types;

pub use crate::allocate::{aggregate, allocate_employee, cap_and_redistribute, eligible_for_allocation};
pub use crate::calendar::{month_window, overlap, MonthOverlap};
pub use crate::deposit::{is_deposit_invoice, DEPOSIT_KEYWORDS};
pub use crate::error::ReportError;
pub use crate::export::{write_allocations_csv, write_discrepancy_csv, write_month_summary_csv};
pub use crate::matching::{invoice_matches_employee, names_match};
pub use crate::prorate::{effective_rent, prorate, DEFAULT_MONTHLY_RENT};
pub use crate::raw::{parse_store_date, RawEmployee, RawInvoice, RecordSet};
pub use crate::report::{EngineConfig, RentReport, RentReportBuilder};
pub use crate::snapshot::{build_snapshots, MonthlySnapshot};
pub use crate::summary::{company_breakdown, discrepancy_report, summarize_months};
pub use crate::types::*;
