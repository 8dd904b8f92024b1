//! Example CLI: loads record files and prints the monthly rent report.

use std::env;
use std::fs::File;
use std::path::Path;

use dorm_rent_report::{
    write_allocations_csv, write_discrepancy_csv, write_month_summary_csv, RecordSet,
    RentReportBuilder,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let (Some(employees_path), Some(invoices_path)) = (args.next(), args.next()) else {
        println!("Usage: dorm-rent-report <employees.json> <invoices.json> [export-dir]");
        return Ok(());
    };
    let export_dir = args.next();

    let records = RecordSet::from_json(File::open(&employees_path)?, File::open(&invoices_path)?)?;
    let today = chrono::Local::now().date_naive();
    let report =
        RentReportBuilder::new(&records.employees, &records.invoices, today).compute();

    if let (Some(first), Some(last)) = (report.months.first(), report.months.last()) {
        println!("Reporting window {} — {}", first.key, last.key);
    }
    println!("Employees: {}", report.employees.len());
    if let Some(summaries) = &report.month_summaries {
        for (month, summary) in summaries {
            println!(
                "{month}: total {} | paid {} ({} items) | unpaid {} ({} items) | {} employees",
                summary.total.round_dp(2),
                summary.paid.round_dp(2),
                summary.paid_count,
                summary.unpaid.round_dp(2),
                summary.unpaid_count,
                summary.employee_count
            );
        }
    }
    if let Some(discrepancy) = &report.discrepancy {
        println!(
            "{}: theoretical {} vs invoiced {} (difference {})",
            discrepancy.month,
            discrepancy.theoretical_rent,
            discrepancy.invoiced_rent,
            discrepancy.difference
        );
    }

    if let Some(dir) = export_dir {
        let dir = Path::new(&dir);
        write_allocations_csv(&report, File::create(dir.join("allocations.csv"))?)?;
        if let Some(summaries) = &report.month_summaries {
            write_month_summary_csv(summaries, File::create(dir.join("month_summary.csv"))?)?;
        }
        if let Some(discrepancy) = &report.discrepancy {
            write_discrepancy_csv(discrepancy, File::create(dir.join("discrepancy.csv"))?)?;
        }
        println!("CSV exports written to {}", dir.display());
    }
    Ok(())
}
