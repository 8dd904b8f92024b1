use std::collections::BTreeMap;

use chrono::NaiveDate;
use dorm_rent_report::{
    allocate_employee, cap_and_redistribute, eligible_for_allocation, invoice_matches_employee,
    is_deposit_invoice, month_window, names_match, overlap, prorate, CalendarMonth, DateSpan,
    Employee, EmployeeId, EmployeeRef, EmployeeStatus, Invoice, InvoiceId, InvoiceStatus, LineItem,
    LineItemSource, Money, MonthlyAllocation,
};
use rust_decimal_macros::dec;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

fn span(start: NaiveDate, end: NaiveDate) -> DateSpan {
    DateSpan { start, end }
}

fn housed(id: &str, name: &str, rent: Money) -> Employee {
    Employee {
        id: EmployeeId(id.to_string()),
        name: name.to_string(),
        company: "宏達製造".to_string(),
        status: EmployeeStatus::Housed,
        monthly_rent: rent,
    }
}

fn invoice_for(id: &str, employee_id: &str, status: InvoiceStatus, period: Option<DateSpan>) -> Invoice {
    Invoice {
        id: InvoiceId(id.to_string()),
        invoice_number: format!("R-{id}"),
        employee_ref: EmployeeRef::Id(EmployeeId(employee_id.to_string())),
        amount: dec!(3500),
        period,
        status,
        is_issued: None,
        description: String::new(),
        kind: String::new(),
        notes: String::new(),
    }
}

fn contribution(id: &str, amount: Money, is_paid: bool) -> LineItem {
    LineItem {
        source: LineItemSource::Invoice {
            id: InvoiceId(id.to_string()),
            number: format!("R-{id}"),
            start: date(2025, 9, 1),
            end: date(2025, 9, 30),
        },
        amount,
        is_paid,
    }
}

fn allocation_of(items: Vec<LineItem>) -> MonthlyAllocation {
    let total: Money = items.iter().map(|item| item.amount).sum();
    MonthlyAllocation {
        original_amount: total,
        capped_amount: total,
        was_capped: false,
        excess_amount: Money::ZERO,
        redistributed_amount: Money::ZERO,
        line_items: items,
    }
}

#[test]
fn window_spans_requested_months() {
    let months = month_window(date(2025, 9, 10), 2, 1);
    let keys: Vec<&str> = months.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, ["2025-07", "2025-08", "2025-09", "2025-10"]);
    assert_eq!(months[1].start, date(2025, 8, 1));
    assert_eq!(months[1].end, date(2025, 8, 31));
    assert_eq!(months[1].day_count, 31);
}

#[test]
fn window_crosses_year_boundary() {
    let months = month_window(date(2025, 1, 15), 2, 0);
    let keys: Vec<&str> = months.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, ["2024-11", "2024-12", "2025-01"]);
}

#[test]
fn leap_february_has_29_days() {
    let month = CalendarMonth::new(2024, 2);
    assert_eq!(month.day_count, 29);
    assert_eq!(month.end, date(2024, 2, 29));
}

#[test]
fn overlap_counts_inclusive_days() {
    let august = CalendarMonth::new(2025, 8);
    let result = overlap(span(date(2025, 8, 15), date(2025, 9, 14)), &august);
    assert_eq!(result.overlap_days, 17);
    assert!(!result.covers_full_month);
    assert_eq!(result.month_days, 31);
}

#[test]
fn overlap_detects_full_month_coverage() {
    let september = CalendarMonth::new(2025, 9);
    let result = overlap(span(date(2025, 8, 20), date(2025, 10, 5)), &september);
    assert!(result.covers_full_month);
    assert_eq!(result.overlap_days, 30);
}

#[test]
fn overlap_is_zero_outside_the_month() {
    let september = CalendarMonth::new(2025, 9);
    let result = overlap(span(date(2025, 7, 1), date(2025, 8, 31)), &september);
    assert_eq!(result.overlap_days, 0);
    assert!(!result.covers_full_month);
}

#[test]
fn single_day_span_overlaps_one_day() {
    let august = CalendarMonth::new(2025, 8);
    let result = overlap(span(date(2025, 8, 5), date(2025, 8, 5)), &august);
    assert_eq!(result.overlap_days, 1);
}

#[test]
fn full_month_coverage_contributes_exactly_one_rent() {
    let september = CalendarMonth::new(2025, 9);
    // Face value never enters the full-month shortcut.
    let amount = prorate(span(date(2025, 9, 1), date(2025, 9, 30)), &september, dec!(3500));
    assert_eq!(amount, dec!(3500));
}

#[test]
fn no_overlap_contributes_nothing() {
    let september = CalendarMonth::new(2025, 9);
    let amount = prorate(span(date(2025, 7, 1), date(2025, 7, 31)), &september, dec!(3500));
    assert_eq!(amount, Money::ZERO);
}

#[test]
fn single_day_contributes_one_thirty_first() {
    let august = CalendarMonth::new(2025, 8);
    let amount = prorate(span(date(2025, 8, 5), date(2025, 8, 5)), &august, dec!(3500));
    assert_eq!(amount.round_dp(2), dec!(112.90));
}

#[test]
fn partial_overlap_prorates_day_weighted_shares() {
    let august = CalendarMonth::new(2025, 8);
    let september = CalendarMonth::new(2025, 9);
    let period = span(date(2025, 8, 15), date(2025, 9, 14));
    assert_eq!(prorate(period, &august, dec!(3500)).round_dp(2), dec!(1919.35));
    assert_eq!(prorate(period, &september, dec!(3500)).round_dp(2), dec!(1633.33));
}

#[test]
fn deposit_detected_in_invoice_number_suffix() {
    let mut invoice = invoice_for("100", "emp-001", InvoiceStatus::Paid, None);
    invoice.invoice_number = "D100-A001".to_string();
    assert!(is_deposit_invoice(&invoice));
}

#[test]
fn deposit_detected_in_cjk_notes() {
    let mut invoice = invoice_for("100", "emp-001", InvoiceStatus::Paid, None);
    invoice.notes = "首月按金".to_string();
    assert!(is_deposit_invoice(&invoice));
}

#[test]
fn deposit_keywords_are_case_insensitive() {
    let mut invoice = invoice_for("100", "emp-001", InvoiceStatus::Paid, None);
    invoice.description = "Security DEPOSIT for room 203".to_string();
    assert!(is_deposit_invoice(&invoice));
}

#[test]
fn plain_rent_invoice_is_not_a_deposit() {
    let invoice = invoice_for("100", "emp-001", InvoiceStatus::Paid, None);
    assert!(!is_deposit_invoice(&invoice));
}

#[test]
fn allocation_requires_dates_issuance_and_non_deposit() {
    let september = Some(span(date(2025, 9, 1), date(2025, 9, 30)));

    let undated = invoice_for("100", "emp-001", InvoiceStatus::Paid, None);
    assert!(!eligible_for_allocation(&undated));

    let mut unissued = invoice_for("101", "emp-001", InvoiceStatus::Pending, september);
    unissued.is_issued = Some(false);
    assert!(!eligible_for_allocation(&unissued));

    let deposit = invoice_for("102", "emp-001", InvoiceStatus::Deposit, september);
    assert!(!eligible_for_allocation(&deposit));

    let mut issued = invoice_for("103", "emp-001", InvoiceStatus::Pending, september);
    issued.is_issued = Some(true);
    assert!(eligible_for_allocation(&issued));

    let unflagged = invoice_for("104", "emp-001", InvoiceStatus::Overdue, september);
    assert!(eligible_for_allocation(&unflagged));
}

#[test]
fn direct_id_match_is_exact() {
    let employee = housed("emp-001", "陳大文", dec!(3500));
    let matching = invoice_for("100", "emp-001", InvoiceStatus::Paid, None);
    let other = invoice_for("101", "emp-002", InvoiceStatus::Paid, None);
    assert!(invoice_matches_employee(&matching, &employee));
    assert!(!invoice_matches_employee(&other, &employee));
}

#[test]
fn name_fallback_matches_substrings_both_ways() {
    assert!(names_match("陳大文 (Room 203)", "陳大文"));
    assert!(names_match("大文", "陳大文"));
    assert!(names_match("陳大文", "陳大文"));
    assert!(!names_match("李小明", "陳大文"));
}

#[test]
fn name_fallback_is_case_sensitive_and_rejects_empties() {
    assert!(!names_match("john chan", "John Chan"));
    assert!(!names_match("", "陳大文"));
    assert!(!names_match("陳大文", ""));
}

#[test]
fn capping_pools_excess_and_fills_spare_months() {
    // Two full-month invoices put September at 7000 against a 3500 rent;
    // August sits at 1000 with 2500 of spare room.
    let mut months: BTreeMap<String, MonthlyAllocation> = BTreeMap::new();
    months.insert(
        "2025-08".to_string(),
        allocation_of(vec![contribution("aug", dec!(1000), true)]),
    );
    months.insert(
        "2025-09".to_string(),
        allocation_of(vec![
            contribution("sep-a", dec!(3500), true),
            contribution("sep-b", dec!(3500), false),
        ]),
    );

    let (result, unresolved) = cap_and_redistribute(months, dec!(3500));

    let september = &result["2025-09"];
    assert!(september.was_capped);
    assert_eq!(september.capped_amount, dec!(3500));
    assert_eq!(september.excess_amount, dec!(3500));
    assert_eq!(september.line_items[0].amount, dec!(1750));
    assert_eq!(september.line_items[1].amount, dec!(1750));

    let august = &result["2025-08"];
    assert!(!august.was_capped);
    assert_eq!(august.capped_amount, dec!(3500));
    assert_eq!(august.redistributed_amount, dec!(2500));
    let synthetic = august.line_items.last().expect("synthetic item");
    assert_eq!(
        synthetic.source,
        LineItemSource::Redistribution {
            from_months: vec!["2025-09".to_string()],
        }
    );
    assert_eq!(synthetic.amount, dec!(2500));
    assert!(!synthetic.is_paid);

    assert_eq!(unresolved, dec!(1000));
}

#[test]
fn redistribution_conserves_totals_when_space_suffices() {
    let mut months: BTreeMap<String, MonthlyAllocation> = BTreeMap::new();
    months.insert(
        "2025-07".to_string(),
        allocation_of(vec![contribution("jul", dec!(100), false)]),
    );
    months.insert(
        "2025-08".to_string(),
        allocation_of(vec![contribution("aug", dec!(500), true)]),
    );
    months.insert(
        "2025-09".to_string(),
        allocation_of(vec![
            contribution("sep-a", dec!(3500), true),
            contribution("sep-b", dec!(3500), true),
        ]),
    );
    let before: Money = months.values().map(|m| m.capped_amount).sum();

    let (result, unresolved) = cap_and_redistribute(months, dec!(3500));
    let after: Money = result.values().map(|m| m.capped_amount).sum();

    assert_eq!(unresolved, Money::ZERO);
    assert_eq!(after, before);
    for allocation in result.values() {
        assert!(allocation.capped_amount <= dec!(3500));
        let items: Money = allocation.line_items.iter().map(|item| item.amount).sum();
        assert_eq!(items, allocation.capped_amount);
    }
}

#[test]
fn cap_and_redistribute_is_idempotent() {
    let mut months: BTreeMap<String, MonthlyAllocation> = BTreeMap::new();
    months.insert(
        "2025-08".to_string(),
        allocation_of(vec![contribution("aug", dec!(1000), true)]),
    );
    months.insert(
        "2025-09".to_string(),
        allocation_of(vec![
            contribution("sep-a", dec!(3500), true),
            contribution("sep-b", dec!(3500), false),
        ]),
    );

    let (first, _) = cap_and_redistribute(months, dec!(3500));
    let (second, unresolved) = cap_and_redistribute(first.clone(), dec!(3500));
    assert_eq!(second, first);
    assert_eq!(unresolved, Money::ZERO);
}

#[test]
fn pipeline_reports_unresolved_excess_instead_of_dropping_it() {
    let employee = housed("emp-001", "陳大文", dec!(3500));
    let invoices = vec![
        invoice_for(
            "sep-a",
            "emp-001",
            InvoiceStatus::Paid,
            Some(span(date(2025, 9, 1), date(2025, 9, 30))),
        ),
        invoice_for(
            "sep-b",
            "emp-001",
            InvoiceStatus::Pending,
            Some(span(date(2025, 9, 1), date(2025, 9, 30))),
        ),
        invoice_for(
            "aug",
            "emp-001",
            InvoiceStatus::Paid,
            Some(span(date(2025, 8, 10), date(2025, 8, 18))),
        ),
    ];
    let months = month_window(date(2025, 9, 10), 1, 0);

    let allocation = allocate_employee(&employee, &invoices, &months, dec!(3500));

    let original: Money = allocation.months.values().map(|m| m.original_amount).sum();
    let capped: Money = allocation.months.values().map(|m| m.capped_amount).sum();
    assert_eq!(capped, original - allocation.unresolved_excess);
    assert!(allocation.unresolved_excess > Money::ZERO);
    assert_eq!(allocation.months["2025-08"].capped_amount, dec!(3500));
    for monthly in allocation.months.values() {
        let items: Money = monthly.line_items.iter().map(|item| item.amount).sum();
        assert_eq!(items, monthly.capped_amount);
    }
}

#[test]
fn zero_rent_falls_back_to_the_default() {
    let employee = housed("emp-003", "王美玲", Money::ZERO);
    let invoices = vec![invoice_for(
        "aug",
        "emp-003",
        InvoiceStatus::Pending,
        Some(span(date(2025, 8, 1), date(2025, 8, 31))),
    )];
    let months = month_window(date(2025, 8, 20), 0, 0);

    let allocation = allocate_employee(&employee, &invoices, &months, dec!(3500));

    assert!(allocation.default_rent_applied);
    assert_eq!(allocation.effective_rent, dec!(3500));
    assert_eq!(allocation.months["2025-08"].capped_amount, dec!(3500));
}

#[test]
fn overlapping_invoice_spreads_across_both_months() {
    let employee = housed("emp-001", "陳大文", dec!(3500));
    let invoices = vec![invoice_for(
        "inv",
        "emp-001",
        InvoiceStatus::Paid,
        Some(span(date(2025, 8, 15), date(2025, 9, 14))),
    )];
    let months = month_window(date(2025, 9, 10), 1, 0);

    let allocation = allocate_employee(&employee, &invoices, &months, dec!(3500));

    assert_eq!(allocation.months.len(), 2);
    assert_eq!(
        allocation.months["2025-08"].capped_amount.round_dp(2),
        dec!(1919.35)
    );
    assert_eq!(
        allocation.months["2025-09"].capped_amount.round_dp(2),
        dec!(1633.33)
    );
    assert_eq!(allocation.unresolved_excess, Money::ZERO);
    assert!(!allocation.months["2025-08"].was_capped);
    assert!(!allocation.months["2025-09"].was_capped);
}
