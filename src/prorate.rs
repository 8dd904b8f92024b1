//! Conversion of a month overlap into a monetary contribution.

use rust_decimal::Decimal;

use crate::calendar;
use crate::types::{CalendarMonth, DateSpan, Money};

/// Fallback monthly rent applied when an employee record carries no rent.
///
/// A policy value, not a data fact; override it through
/// [`EngineConfig`](crate::EngineConfig).
pub const DEFAULT_MONTHLY_RENT: Money = Decimal::from_parts(3500, 0, 0, false, 0);

/// Picks the rent used for proration and capping.
#[inline]
#[must_use]
pub fn effective_rent(monthly_rent: Money, default_rent: Money) -> Money {
    if monthly_rent > Money::ZERO {
        monthly_rent
    } else {
        default_rent
    }
}

/// Prorates one invoice span into one month's contribution.
///
/// A span containing the whole month contributes exactly one month of rent
/// regardless of the invoice's face value. Partial overlap contributes a
/// day-weighted share of the rent, clamped so a single invoice can never
/// put more than one month of rent into one month.
#[must_use]
pub fn prorate(span: DateSpan, month: &CalendarMonth, rent: Money) -> Money {
    let overlap = calendar::overlap(span, month);
    if overlap.overlap_days == 0 {
        return Money::ZERO;
    }
    if overlap.covers_full_month {
        return rent;
    }
    let share = Money::from(overlap.overlap_days) / Money::from(overlap.month_days) * rent;
    share.min(rent)
}
