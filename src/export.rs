//! CSV exports for the dashboard's download buttons.
//!
//! Every export is UTF-8 with a leading BOM so spreadsheet software picks
//! the right encoding, comma-delimited with fields quoted as needed, and
//! headed by business field names in the operator's display language.

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::ReportError;
use crate::report::RentReport;
use crate::types::{DiscrepancyReport, InvoiceCoverage, Money, MonthSummary};

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes the employee-by-month allocation table.
pub fn write_allocations_csv<W: Write>(report: &RentReport, writer: W) -> Result<(), ReportError> {
    let mut writer = bom_writer(writer)?;
    writer.write_record([
        "員工",
        "公司",
        "月份",
        "原始金額",
        "入賬金額",
        "已封頂",
        "轉出超額",
        "轉入調撥",
        "未消化超額",
    ])?;
    for allocation in &report.employees {
        for (month, monthly) in &allocation.months {
            let original = money(monthly.original_amount);
            let capped = money(monthly.capped_amount);
            let excess = money(monthly.excess_amount);
            let redistributed = money(monthly.redistributed_amount);
            let unresolved = money(allocation.unresolved_excess);
            writer.write_record([
                allocation.employee_name.as_str(),
                allocation.company.as_str(),
                month.as_str(),
                original.as_str(),
                capped.as_str(),
                if monthly.was_capped { "是" } else { "否" },
                excess.as_str(),
                redistributed.as_str(),
                unresolved.as_str(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Writes the month-level summary table.
pub fn write_month_summary_csv<W: Write>(
    summaries: &BTreeMap<String, MonthSummary>,
    writer: W,
) -> Result<(), ReportError> {
    let mut writer = bom_writer(writer)?;
    writer.write_record([
        "月份",
        "應收合計",
        "已收金額",
        "未收金額",
        "已收筆數",
        "未收筆數",
        "員工人數",
    ])?;
    for (month, summary) in summaries {
        let total = money(summary.total);
        let paid = money(summary.paid);
        let unpaid = money(summary.unpaid);
        let paid_count = summary.paid_count.to_string();
        let unpaid_count = summary.unpaid_count.to_string();
        let employee_count = summary.employee_count.to_string();
        writer.write_record([
            month.as_str(),
            total.as_str(),
            paid.as_str(),
            unpaid.as_str(),
            paid_count.as_str(),
            unpaid_count.as_str(),
            employee_count.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the per-employee discrepancy table with a closing totals row.
pub fn write_discrepancy_csv<W: Write>(
    discrepancy: &DiscrepancyReport,
    writer: W,
) -> Result<(), ReportError> {
    let mut writer = bom_writer(writer)?;
    writer.write_record(["員工", "公司", "月租", "已開票金額", "狀態"])?;
    for row in &discrepancy.employees {
        let rent = money(row.monthly_rent);
        let invoiced = money(row.invoiced);
        writer.write_record([
            row.employee_name.as_str(),
            row.company.as_str(),
            rent.as_str(),
            invoiced.as_str(),
            coverage_label(row.coverage),
        ])?;
    }
    let theoretical = money(discrepancy.theoretical_rent);
    let invoiced = money(discrepancy.invoiced_rent);
    let difference = money(discrepancy.difference);
    writer.write_record([
        "合計",
        discrepancy.month.as_str(),
        theoretical.as_str(),
        invoiced.as_str(),
        difference.as_str(),
    ])?;
    writer.flush()?;
    Ok(())
}

/// Emits the BOM before handing the stream to the CSV writer.
fn bom_writer<W: Write>(mut writer: W) -> Result<csv::Writer<W>, ReportError> {
    writer.write_all(BOM)?;
    Ok(csv::Writer::from_writer(writer))
}

/// Two-decimal display form used in every export.
fn money(value: Money) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Display label of a coverage classification.
const fn coverage_label(coverage: InvoiceCoverage) -> &'static str {
    match coverage {
        InvoiceCoverage::Match => "相符",
        InvoiceCoverage::NoInvoice => "無發票",
        InvoiceCoverage::AmountMismatch => "金額不符",
    }
}
