//! Export of KPI snapshots for download and display.

mod dashboard_data;
mod kpi_report;

pub use dashboard_data::*;
pub use kpi_report::*;

/// Escape a string for CSV output.
pub(crate) fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
