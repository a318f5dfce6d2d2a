// src/report.rs
use crate::simulation::SimulationReport;
use crate::stats::{AggregateStats, RequestStats};

fn join_blocks(blocks: &[u32]) -> String {
    blocks.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(",")
}

pub fn request_line(stats: &RequestStats) -> String {
    format!(
        "Block: {:3}  Seek:{:3}  Rotate:{:3}  Transfer:{:3}  Total:{:4}",
        stats.block, stats.seek, stats.rotate, stats.transfer, stats.total
    )
}

pub fn totals_line(totals: &AggregateStats) -> String {
    format!(
        "TOTALS      Seek:{:3}  Rotate:{:3}  Transfer:{:3}  Total:{:4}",
        totals.seek, totals.rotate, totals.transfer, totals.total
    )
}

/// Renders a finished run. Without `compute` only the request lists and the
/// exercise prompt are shown.
pub fn display(report: &SimulationReport, compute: bool) -> String {
    let mut output = Vec::new();
    output.push(format!("REQUESTS {}", join_blocks(&report.requests)));
    output.push(String::new());
    if !report.late_requests.is_empty() {
        output.push(format!("LATE REQUESTS {}", join_blocks(&report.late_requests)));
        output.push(String::new());
    }

    if !compute {
        output.push(String::new());
        output.push("For the requests above, compute the seek, rotate, and transfer times.".to_string());
        output.push("Use -c to see the answers.".to_string());
        output.push(String::new());
        return output.join("\n");
    }

    for stats in &report.stats {
        output.push(request_line(stats));
    }
    output.push(String::new());
    output.push(totals_line(&report.totals));
    output.push(String::new());
    output.join("\n")
}
