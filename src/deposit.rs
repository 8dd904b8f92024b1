//! Heuristic classification of security-deposit invoices.

use crate::types::Invoice;

/// Keywords marking a security/deposit charge, matched case-insensitively.
pub const DEPOSIT_KEYWORDS: [&str; 8] = [
    "deposit", "deposite", "按金", "押金", "security", "-a001", "-a002", "-a003",
];

/// Whether the invoice is a security/deposit charge to exclude from rent revenue.
///
/// Keyword heuristic over the invoice's text fields, not a schema flag: a
/// deposit that mentions none of the keywords slips into revenue totals
/// unnoticed.
#[must_use]
pub fn is_deposit_invoice(invoice: &Invoice) -> bool {
    [
        &invoice.invoice_number,
        &invoice.description,
        &invoice.kind,
        &invoice.notes,
    ]
    .into_iter()
    .any(|field| contains_deposit_keyword(field))
}

/// Case-insensitive scan of one text field.
fn contains_deposit_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    DEPOSIT_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}
