use crate::model::Summary;
use serde::Serialize;
use std::time::Duration;

/// Floor for the elapsed time used as a divisor.
pub const MIN_ELAPSED_SECS: f64 = 1e-6;

pub fn rate(total: u64, elapsed: Duration) -> f64 {
    total as f64 / elapsed.as_secs_f64().max(MIN_ELAPSED_SECS)
}

/// The human-readable summary: a blank line, then two lines.
pub fn render_text(summary: &Summary) -> String {
    let secs = summary.elapsed.as_secs_f64().max(MIN_ELAPSED_SECS);
    format!(
        "\nDone. Successful requests: {}\nElapsed: {:.2}s | Approx. {:.1} req/s | Threads: {} | Target: {}",
        summary.successful_requests,
        secs,
        rate(summary.successful_requests, summary.elapsed),
        summary.threads,
        summary.target,
    )
}

#[derive(Serialize)]
struct Rendered<'a> {
    #[serde(flatten)]
    summary: &'a Summary,
    requests_per_second: f64,
}

pub fn render_json(summary: &Summary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Rendered {
        summary,
        requests_per_second: rate(summary.successful_requests, summary.elapsed),
    })
}
