//! JSON output format for analysis results

use serde::{Deserialize, Serialize};

use crate::energy::{EnergyConfig, EnergyReading};
use crate::score::Grade;
use crate::stats::ProfileRecord;

/// One profiled function in the JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFunction {
    /// Function identity string
    pub name: String,
    /// Number of invocations
    pub calls: u64,
    /// Cumulative time including callees (seconds)
    pub cumulative_secs: f64,
    /// Own-frame CPU time (seconds)
    pub own_secs: f64,
    /// Estimated energy for the own-frame time
    pub joules: f64,
}

/// Full analysis result for machine consumption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonAnalysis {
    /// Sustainability grade label ("A+".."E")
    pub grade: String,
    /// Total estimated energy over the summary view
    pub total_joules: f64,
    /// Derived CPU-time figure (matches the text report line)
    pub cpu_time_secs: f64,
    /// CO2 estimate in grams
    pub co2_grams: f64,
    /// Share of the reference battery, in percent
    pub battery_impact_percent: f64,
    /// Tree-equivalents
    pub tree_equivalent: f64,
    /// Percent change against the previous run in this session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_percent: Option<f64>,
    /// Detailed ranked view
    pub functions: Vec<JsonFunction>,
}

impl JsonAnalysis {
    /// Assemble the document from one run's computed pieces.
    pub fn new(
        grade: Grade,
        reading: &EnergyReading,
        delta_percent: Option<f64>,
        detail: &[ProfileRecord],
        config: &EnergyConfig,
    ) -> Self {
        let functions = detail
            .iter()
            .map(|r| JsonFunction {
                name: r.name.clone(),
                calls: r.call_count,
                cumulative_secs: r.cumulative_secs,
                own_secs: r.own_secs,
                joules: config.estimate_energy(r.own_secs),
            })
            .collect();
        Self {
            grade: grade.to_string(),
            total_joules: reading.total_joules,
            cpu_time_secs: config.report_cpu_secs(reading.total_joules),
            co2_grams: config.co2_grams(reading.total_joules),
            battery_impact_percent: config.battery_impact_percent(reading.total_joules),
            tree_equivalent: config.tree_equivalent(reading.total_joules),
            delta_percent,
            functions,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
