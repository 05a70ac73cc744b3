//! Colored console mirror of the run report

use crate::run_report::RunReport;
use colored::Colorize;
use stampede_core::health::Severity;

/// Print the summary to stdout. Any component that did not complete is
/// marked in red.
pub fn print_summary(report: &RunReport) {
    println!();
    println!("{}", "=== Stampede Run Report ===".bold());
    println!(
        "duration {:.1}s  requests {}  success {}",
        report.duration_secs,
        report.overall.total,
        colorize_rate(report.overall.success_rate(), &report.overall.success_rate_display()),
    );
    println!(
        "response times avg {:.1}ms  min {}ms  max {}ms",
        report.response_times.avg_ms(),
        report.response_times.min_ms.unwrap_or(0),
        report.response_times.max_ms.unwrap_or(0),
    );

    println!();
    for component in &report.components {
        let status = if component.completed {
            "completed".green()
        } else {
            "FAILED".red().bold()
        };
        println!(
            "  {:<12} {:>8} requests  {:>8} success  {}",
            component.component,
            component.totals.total,
            component.totals.success_rate_display(),
            status
        );
    }

    let alerts: Vec<_> = report.alerts().collect();
    if !alerts.is_empty() {
        println!();
        println!("{}", format!("alerts ({})", alerts.len()).yellow().bold());
        for alert in alerts {
            let line = format!("  [{:?}] {}", alert.kind, alert.message);
            match alert.severity {
                Severity::Critical => println!("{}", line.red()),
                Severity::Warning => println!("{}", line.yellow()),
            }
        }
    }

    let recommendations: Vec<_> = report.recommendations().collect();
    if !recommendations.is_empty() {
        println!();
        println!("{}", "recommendations".bold());
        for recommendation in recommendations {
            println!(
                "  [{:?}/{}] {}",
                recommendation.priority, recommendation.category, recommendation.message
            );
        }
    }
    println!();
}

fn colorize_rate(rate: f64, display: &str) -> colored::ColoredString {
    if rate >= 0.99 {
        display.green()
    } else if rate >= 0.90 {
        display.yellow()
    } else {
        display.red()
    }
}
