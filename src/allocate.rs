//! Per-employee monthly aggregation and the cap-and-redistribute pass.

use std::collections::BTreeMap;

use tracing::warn;

use crate::deposit::is_deposit_invoice;
use crate::matching::invoice_matches_employee;
use crate::prorate::{effective_rent, prorate};
use crate::types::{
    CalendarMonth, Employee, EmployeeAllocation, Invoice, InvoiceStatus, LineItem, LineItemSource,
    Money, MonthlyAllocation,
};

/// Whether an invoice participates in month allocation at all.
///
/// Deposits, invoices without a complete date span and invoices explicitly
/// flagged as not issued are filtered out rather than errored on.
#[must_use]
pub fn eligible_for_allocation(invoice: &Invoice) -> bool {
    invoice.period.is_some()
        && invoice.status != InvoiceStatus::Deposit
        && invoice.is_issued != Some(false)
        && !is_deposit_invoice(invoice)
}

/// Accumulates raw prorated contributions of one employee per month.
///
/// Only months an invoice actually touches get an entry. `capped_amount`
/// starts equal to `original_amount`; the cap pass adjusts it afterwards.
#[must_use]
pub fn aggregate(
    employee: &Employee,
    invoices: &[Invoice],
    months: &[CalendarMonth],
    rent: Money,
) -> BTreeMap<String, MonthlyAllocation> {
    let mut allocations: BTreeMap<String, MonthlyAllocation> = BTreeMap::new();

    for invoice in invoices {
        if !eligible_for_allocation(invoice) || !invoice_matches_employee(invoice, employee) {
            continue;
        }
        let Some(period) = invoice.period else {
            continue;
        };
        for month in months {
            let amount = prorate(period, month, rent);
            if amount == Money::ZERO {
                continue;
            }
            let entry = allocations.entry(month.key.clone()).or_default();
            entry.original_amount += amount;
            entry.capped_amount += amount;
            entry.line_items.push(LineItem {
                source: LineItemSource::Invoice {
                    id: invoice.id.clone(),
                    number: invoice.invoice_number.clone(),
                    start: period.start,
                    end: period.end,
                },
                amount,
                is_paid: invoice.status.is_paid(),
            });
        }
    }

    allocations
}

/// Caps each month at the employee's rent and redistributes the excess.
///
/// Months above the rent shrink proportionally across their line items and
/// pool the removed excess. The pool is then shared among uncapped months
/// in proportion to their spare capacity, recorded as a synthetic
/// redistribution line item. Excess no month can absorb is returned
/// instead of dropped, so `sum(capped) == sum(original) - returned`.
/// Running the pass on its own output changes nothing.
#[must_use]
pub fn cap_and_redistribute(
    mut allocations: BTreeMap<String, MonthlyAllocation>,
    rent: Money,
) -> (BTreeMap<String, MonthlyAllocation>, Money) {
    let mut total_excess = Money::ZERO;
    let mut capped_keys: Vec<String> = Vec::new();

    for (key, allocation) in &mut allocations {
        if allocation.capped_amount > rent {
            let excess = allocation.capped_amount - rent;
            scale_line_items(&mut allocation.line_items, rent);
            allocation.capped_amount = rent;
            allocation.was_capped = true;
            allocation.excess_amount = excess;
            total_excess += excess;
            capped_keys.push(key.clone());
        }
    }

    if total_excess == Money::ZERO {
        return (allocations, Money::ZERO);
    }

    let donors: Vec<String> = allocations
        .iter()
        .filter(|(_, allocation)| !allocation.was_capped && allocation.capped_amount < rent)
        .map(|(key, _)| key.clone())
        .collect();
    let total_space: Money = donors
        .iter()
        .map(|key| rent - allocations[key].capped_amount)
        .sum();

    let distributable = total_excess.min(total_space);
    let mut remaining = distributable;

    for (index, key) in donors.iter().enumerate() {
        let allocation = allocations.get_mut(key).expect("donor key present");
        let space = rent - allocation.capped_amount;
        // The last donor takes the remainder so the shares sum exactly.
        let proportional = if index + 1 == donors.len() {
            remaining
        } else {
            distributable * space / total_space
        };
        let share = proportional.min(space).min(remaining);
        if share == Money::ZERO {
            continue;
        }
        remaining -= share;
        allocation.capped_amount += share;
        allocation.redistributed_amount = share;
        allocation.line_items.push(LineItem {
            source: LineItemSource::Redistribution {
                from_months: capped_keys.clone(),
            },
            amount: share,
            is_paid: false,
        });
    }

    let unresolved = total_excess - distributable + remaining;
    if unresolved > Money::ZERO {
        warn!(%unresolved, "capped excess exceeds spare capacity in the reporting window");
    }

    (allocations, unresolved)
}

/// Runs the full allocation pipeline for one employee.
#[must_use]
pub fn allocate_employee(
    employee: &Employee,
    invoices: &[Invoice],
    months: &[CalendarMonth],
    default_rent: Money,
) -> EmployeeAllocation {
    let rent = effective_rent(employee.monthly_rent, default_rent);
    let default_rent_applied = rent != employee.monthly_rent;
    if default_rent_applied {
        // Masks a likely data-entry gap, so make the substitution visible.
        warn!(employee = %employee.id.0, %default_rent, "monthly rent missing, default applied");
    }
    let raw = aggregate(employee, invoices, months, rent);
    let (months_map, unresolved_excess) = cap_and_redistribute(raw, rent);
    EmployeeAllocation {
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        company: employee.company.clone(),
        effective_rent: rent,
        default_rent_applied,
        months: months_map,
        unresolved_excess,
    }
}

/// Shrinks line items proportionally so they sum to the cap, absorbing
/// arithmetic drift into the last item.
fn scale_line_items(items: &mut [LineItem], cap: Money) {
    let current_total: Money = items.iter().map(|item| item.amount).sum();
    if current_total == Money::ZERO {
        return;
    }
    let ratio = cap / current_total;
    let mut assigned = Money::ZERO;
    let last = items.len() - 1;
    for (index, item) in items.iter_mut().enumerate() {
        item.amount = if index == last {
            cap - assigned
        } else {
            item.amount * ratio
        };
        assigned += item.amount;
    }
}
