//! Console report rendering

use std::fmt::Write as _;
use std::time::Duration;

use crate::config::{Options, SlowLimit};
use crate::fetcher::{FetchOutcome, FetchStatus};
use crate::report::Report;

/// Renders the end-of-run summary.
pub fn render_report(report: &Report, options: &Options) -> String {
    let mut out = String::new();

    let limit = match report.limit {
        Some(n) => n.to_string(),
        None => "none".to_string(),
    };
    let _ = writeln!(out, "Sitemap ........: {}", report.root_url);
    let _ = writeln!(out, "Concurrency ....: {}", report.concurrency_limit);
    let _ = writeln!(out, "Limit ..........: {limit}");
    let _ = writeln!(out, "URLs fetched ...: {}", report.outcomes.len());
    let _ = writeln!(
        out,
        "Total Time .....: {:.2}s",
        report.total_time.as_secs_f64()
    );

    let failed = report.failed();
    if !failed.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Failed Requests ({}):", failed.len());
        for outcome in failed {
            let _ = writeln!(out, "  {}", outcome_line(outcome));
        }
    }

    let slow = report.slow(options.slow_threshold, options.slow_num);
    if !slow.is_empty() {
        let _ = writeln!(out);
        match options.slow_num {
            SlowLimit::Limited(n) => {
                let _ = writeln!(
                    out,
                    "Top {} Slow Responses (> {:.1}s):",
                    n.min(slow.len()),
                    options.slow_threshold.as_secs_f64()
                );
            }
            SlowLimit::Unlimited => {
                let _ = writeln!(
                    out,
                    "Slow Responses (> {:.1}s):",
                    options.slow_threshold.as_secs_f64()
                );
            }
        }
        for outcome in slow {
            let _ = writeln!(out, "  {}", outcome_line(outcome));
        }
    }

    out
}

pub fn print_report(report: &Report, options: &Options) {
    print!("{}", render_report(report, options));
}

fn outcome_line(outcome: &FetchOutcome) -> String {
    match outcome.status {
        FetchStatus::Http(code) => format!(
            "{:>3} {} ({:.3}s)",
            code,
            outcome.url,
            outcome.response_time.as_secs_f64()
        ),
        FetchStatus::Timeout => format!("408 {} (timeout)", outcome.url),
        FetchStatus::Failed => format!("  0 {} (connection failed)", outcome.url),
    }
}
