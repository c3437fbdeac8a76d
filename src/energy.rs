//! Linear CPU-time-to-energy model and derived sustainability metrics
//!
//! The model is deliberately simple: `joules = cpu_seconds * tdp_watts`,
//! with the TDP treated as an assumed constant average device power draw.
//! It is declared policy, not a measured-hardware model, and the same goes
//! for the battery, tree and CO2 factors: illustrative heuristics exposed
//! as named configuration rather than calibrated values.

use crate::stats::ProfileRecord;

/// Assumed average device power draw in watts
pub const DEFAULT_TDP_WATTS: f64 = 25.0;

/// Reference battery capacity in joules (~55 Wh laptop pack)
pub const DEFAULT_BATTERY_CAPACITY_JOULES: f64 = 200_000.0;

/// Tree-equivalents per joule
pub const DEFAULT_TREE_FACTOR: f64 = 0.000_002;

/// Grams of CO2 per joule
pub const DEFAULT_CO2_GRAMS_PER_JOULE: f64 = 0.000_4;

/// Power figure the text report divides by to derive its CPU-time line
pub const DEFAULT_REPORT_POWER_WATTS: f64 = 30.0;

/// Named constants of the energy model
#[derive(Debug, Clone)]
pub struct EnergyConfig {
    /// Watts assumed to be drawn for every second of CPU time
    pub tdp_watts: f64,
    /// Battery capacity used for the battery-impact percentage
    pub battery_capacity_joules: f64,
    /// Multiplier for the tree-equivalent metric
    pub tree_factor: f64,
    /// Multiplier for the CO2 estimate
    pub co2_grams_per_joule: f64,
    /// Divisor for the report's derived CPU-time line. Kept separate from
    /// `tdp_watts` so the report format stays byte-compatible with the
    /// historical output.
    pub report_power_watts: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            tdp_watts: DEFAULT_TDP_WATTS,
            battery_capacity_joules: DEFAULT_BATTERY_CAPACITY_JOULES,
            tree_factor: DEFAULT_TREE_FACTOR,
            co2_grams_per_joule: DEFAULT_CO2_GRAMS_PER_JOULE,
            report_power_watts: DEFAULT_REPORT_POWER_WATTS,
        }
    }
}

impl EnergyConfig {
    /// Validate the model constants. Invalid constants are a startup
    /// failure, not something to limp along with.
    pub fn validate(&self) -> anyhow::Result<()> {
        let fields = [
            ("tdp-watts", self.tdp_watts),
            ("battery-capacity-joules", self.battery_capacity_joules),
            ("tree-factor", self.tree_factor),
            ("co2-grams-per-joule", self.co2_grams_per_joule),
            ("report-power-watts", self.report_power_watts),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                anyhow::bail!("invalid energy constant {name}: {value} (must be finite and > 0)");
            }
        }
        Ok(())
    }

    /// Convert CPU seconds to joules.
    ///
    /// Never fails: negative or non-finite input clamps to 0 by policy.
    pub fn estimate_energy(&self, cpu_secs: f64) -> f64 {
        if cpu_secs.is_finite() && cpu_secs > 0.0 {
            cpu_secs * self.tdp_watts
        } else {
            0.0
        }
    }

    /// Share of the reference battery drained by `total_joules`, in percent
    pub fn battery_impact_percent(&self, total_joules: f64) -> f64 {
        (total_joules / self.battery_capacity_joules) * 100.0
    }

    /// Tree-equivalents for `total_joules`
    pub fn tree_equivalent(&self, total_joules: f64) -> f64 {
        total_joules * self.tree_factor
    }

    /// CO2 estimate in grams for `total_joules`
    pub fn co2_grams(&self, total_joules: f64) -> f64 {
        total_joules * self.co2_grams_per_joule
    }

    /// Derived CPU-time figure shown in the text report
    pub fn report_cpu_secs(&self, total_joules: f64) -> f64 {
        total_joules / self.report_power_watts
    }
}

/// Energy attributed to each ranked function plus the session total.
///
/// Recomputed on every profiling run, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyReading {
    /// (function identity, joules) in rank order
    pub per_function: Vec<(String, f64)>,
    /// Sum of the per-function joules
    pub total_joules: f64,
}

impl EnergyReading {
    /// Compute energy for the summary view of a run.
    ///
    /// Sums `estimate_energy(own_secs)` over the records it is given,
    /// which by convention is the top-N summary view only. Long-tail
    /// functions outside that view are intentionally not counted; this is
    /// a sampling limitation of the model, not a full-program integral.
    pub fn from_ranked(summary: &[ProfileRecord], config: &EnergyConfig) -> Self {
        let per_function: Vec<(String, f64)> = summary
            .iter()
            .map(|r| (r.name.clone(), config.estimate_energy(r.own_secs)))
            .collect();
        let total_joules = per_function.iter().map(|(_, j)| j).sum();
        Self {
            per_function,
            total_joules,
        }
    }
}
