//! Plain-text sustainability report
//!
//! The layout is a compatibility contract: header, 30-char rule, grade,
//! total joules to 4 decimals, derived CPU time and CO2 estimate, then one
//! bullet line per ranked function. Downstream tooling parses it, so the
//! bytes must not drift.

use crate::energy::{EnergyConfig, EnergyReading};
use crate::score::Grade;

/// Render the full text report for one analysis run.
pub fn render(grade: Grade, reading: &EnergyReading, config: &EnergyConfig) -> String {
    let mut out = String::new();
    out.push_str("ENERGY SUSTAINABILITY REPORT\n");
    out.push_str(&"=".repeat(30));
    out.push_str(&format!("\nGrade: {grade}"));
    out.push_str(&format!(
        "\nTotal Energy: {:.4} Joules",
        reading.total_joules
    ));
    out.push_str(&format!(
        "\nCPU Time: {:.4} s",
        config.report_cpu_secs(reading.total_joules)
    ));
    out.push_str(&format!(
        "\nCO2: {:.6} g",
        config.co2_grams(reading.total_joules)
    ));
    out.push_str("\n\nFUNCTION BREAKDOWN:\n");
    let breakdown: Vec<String> = reading
        .per_function
        .iter()
        .map(|(name, joules)| format!("\u{2022} {name}: {joules:.4} J"))
        .collect();
    out.push_str(&breakdown.join("\n"));
    out
}
