//! Raw document-store records and the normalization boundary.
//!
//! The hosted store hands back loosely typed JSON, with rent under two
//! field names, string dates in several shapes and free-text statuses.
//! This module is the only place that tolerates the mess; the engine sees
//! normalized domain types only.

use std::io::Read;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ReportError;
use crate::types::{
    DateSpan, Employee, EmployeeId, EmployeeRef, EmployeeStatus, Invoice, InvoiceId, InvoiceStatus,
    Money,
};

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})").expect("valid date regex"));

/// Employee record as stored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEmployee {
    /// Store identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Employing company.
    #[serde(default)]
    pub company: String,
    /// Free-text housing status.
    #[serde(default)]
    pub status: String,
    /// Contractual monthly rent; the store uses two field names for it.
    #[serde(default, alias = "monthlyRent")]
    pub rent: Option<Decimal>,
}

impl RawEmployee {
    /// Normalizes into the engine's employee type.
    #[must_use]
    pub fn normalize(&self) -> Employee {
        Employee {
            id: EmployeeId(self.id.clone()),
            name: self.name.trim().to_string(),
            company: self.company.trim().to_string(),
            status: parse_employee_status(&self.status),
            monthly_rent: self.rent.unwrap_or(Money::ZERO),
        }
    }
}

/// Invoice record as stored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawInvoice {
    /// Store identifier.
    pub id: String,
    /// Human-facing invoice number.
    #[serde(default)]
    pub invoice_number: String,
    /// Direct employee link, when present.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Free-text employee names, used when no direct link exists.
    #[serde(default)]
    pub employee_names: Vec<String>,
    /// Face value.
    pub amount: Decimal,
    /// First covered day, when present.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Last covered day, when present.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Free-text status.
    #[serde(default)]
    pub status: String,
    /// Issued flag used by some views.
    #[serde(default)]
    pub is_issued: Option<bool>,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Invoice type label.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Operator notes.
    #[serde(default)]
    pub notes: String,
    /// Uploaded receipt URLs; never read by the engine.
    #[serde(default)]
    pub receipt_urls: Vec<String>,
}

impl RawInvoice {
    /// Normalizes into the engine's invoice type.
    ///
    /// A missing date leaves the period empty, which later excludes the
    /// invoice from month allocation. A present but unparseable date is an
    /// input-validation error.
    pub fn normalize(&self) -> Result<Invoice, ReportError> {
        let start = self.start_date.as_deref().map(parse_store_date).transpose()?;
        let end = self.end_date.as_deref().map(parse_store_date).transpose()?;
        let period = match (start, end) {
            (Some(start), Some(end)) => Some(DateSpan { start, end }),
            _ => None,
        };
        let employee_ref = self.employee_id.as_ref().map_or_else(
            || EmployeeRef::Names(self.employee_names.clone()),
            |id| EmployeeRef::Id(EmployeeId(id.clone())),
        );
        Ok(Invoice {
            id: InvoiceId(self.id.clone()),
            invoice_number: self.invoice_number.clone(),
            employee_ref,
            amount: self.amount,
            period,
            status: parse_invoice_status(&self.status),
            is_issued: self.is_issued,
            description: self.description.clone(),
            kind: self.kind.clone(),
            notes: self.notes.clone(),
        })
    }
}

/// Normalized snapshot of the two store collections.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    /// Normalized employees.
    pub employees: Vec<Employee>,
    /// Normalized invoices.
    pub invoices: Vec<Invoice>,
}

impl RecordSet {
    /// Reads and normalizes the two JSON collections.
    ///
    /// # Example
    ///
    /// ```
    /// # use dorm_rent_report::RecordSet;
    /// let employees = r#"[{"id": "e1", "name": "陳大文", "status": "housed", "rent": 3500}]"#;
    /// let records = RecordSet::from_json(employees.as_bytes(), "[]".as_bytes()).unwrap();
    /// assert_eq!(records.employees.len(), 1);
    /// ```
    pub fn from_json<R: Read, S: Read>(employees: R, invoices: S) -> Result<Self, ReportError> {
        let raw_employees: Vec<RawEmployee> = serde_json::from_reader(employees)?;
        let raw_invoices: Vec<RawInvoice> = serde_json::from_reader(invoices)?;
        Ok(Self {
            employees: raw_employees.iter().map(RawEmployee::normalize).collect(),
            invoices: raw_invoices
                .iter()
                .map(RawInvoice::normalize)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Parses a stored date string into a calendar date.
///
/// Accepts `YYYY-MM-DD` and `YYYY/M/D` shapes, with or without a trailing
/// time suffix.
pub fn parse_store_date(value: &str) -> Result<NaiveDate, ReportError> {
    let invalid = || ReportError::Date {
        value: value.trim().to_string(),
    };
    let caps = DATE_RE.captures(value.trim()).ok_or_else(invalid)?;
    let year: i32 = caps[1].parse().map_err(|_| invalid())?;
    let month: u32 = caps[2].parse().map_err(|_| invalid())?;
    let day: u32 = caps[3].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Classifies a free-text employee status.
fn parse_employee_status(value: &str) -> EmployeeStatus {
    match value.trim().to_lowercase().as_str() {
        "housed" => EmployeeStatus::Housed,
        "pending_assignment" => EmployeeStatus::PendingAssignment,
        "departed" => EmployeeStatus::Departed,
        "resigned" => EmployeeStatus::Resigned,
        _ => EmployeeStatus::Other,
    }
}

/// Classifies a free-text invoice status.
fn parse_invoice_status(value: &str) -> InvoiceStatus {
    match value.trim().to_lowercase().as_str() {
        "paid" => InvoiceStatus::Paid,
        "pending" => InvoiceStatus::Pending,
        "overdue" => InvoiceStatus::Overdue,
        "newly_signed" => InvoiceStatus::NewlySigned,
        "deposit" => InvoiceStatus::Deposit,
        _ => InvoiceStatus::Other,
    }
}
