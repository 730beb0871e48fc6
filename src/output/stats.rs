//! Statistics reporting.

use console::style;

use crate::download::{QueueSummary, RunState};

/// Print statistics for the whole run.
pub fn print_summary(run: &RunState, summary: &QueueSummary) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Statistics:").bold());
    println!("  Series processed: {}", run.series_processed);
    if run.series_failed > 0 {
        println!("  Series failed:    {}", style(run.series_failed).red());
    }
    println!("  Episodes queued:  {}", run.episodes_queued);
    println!(
        "  Downloaded:       {} ({} pages)",
        style(summary.downloaded).green(),
        summary.pages
    );
    println!(
        "  Skipped:          {} (already in library)",
        style(summary.skipped).yellow()
    );
    if summary.failed > 0 {
        println!("  Failed:           {}", style(summary.failed).red());
    }
    if summary.cancelled > 0 {
        println!("  Interrupted:      {}", style(summary.cancelled).red());
    }
    println!("{}", style("═".repeat(50)).dim());
}
