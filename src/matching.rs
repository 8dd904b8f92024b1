//! Linkage between invoices and employees.
//!
//! Direct id links are exact. The free-text fallback matches names by
//! case-sensitive substring containment in either direction, which can
//! over- or under-match; it lives in this module, away from the allocation
//! math, so the ambiguity stays visible and testable on its own.

use crate::types::{Employee, EmployeeRef, Invoice};

/// Whether the invoice bills the given employee.
#[must_use]
pub fn invoice_matches_employee(invoice: &Invoice, employee: &Employee) -> bool {
    match &invoice.employee_ref {
        EmployeeRef::Id(id) => *id == employee.id,
        EmployeeRef::Names(names) => names.iter().any(|name| names_match(name, &employee.name)),
    }
}

/// Bidirectional substring containment over non-empty names.
#[must_use]
pub fn names_match(candidate: &str, employee_name: &str) -> bool {
    // An empty side would contain-match every name.
    if candidate.is_empty() || employee_name.is_empty() {
        return false;
    }
    candidate.contains(employee_name) || employee_name.contains(candidate)
}
