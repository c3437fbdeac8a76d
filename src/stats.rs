//! Per-function profiling statistics and deterministic ranking
//!
//! The profiler harness emits one raw record per function in discovery
//! order. `aggregate` turns that into a ranked view: stable sort by
//! cumulative time (descending) and truncation to a requested size,
//! without touching the underlying collection.

use std::cmp::Ordering;

/// Number of ranked functions in the summary view
pub const SUMMARY_LIMIT: usize = 10;

/// Number of ranked functions in the detailed view (CSV export)
pub const DETAIL_LIMIT: usize = 20;

/// Raw per-function record as parsed from the profiler harness output
#[derive(Debug, Clone, PartialEq)]
pub struct RawFunctionStats {
    /// Function identity: `name (file:line)` for user code, the
    /// interpreter's own label for builtins
    pub name: String,
    /// Number of invocations
    pub call_count: u64,
    /// Time spent in the function's own frame, excluding callees (seconds)
    pub own_secs: f64,
    /// Total time including callees (seconds)
    pub cumulative_secs: f64,
}

/// Raw profiler output, in discovery order
pub type RawStats = Vec<RawFunctionStats>;

/// One normalized, ranked per-function record
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRecord {
    /// Function identity string
    pub name: String,
    /// Number of invocations
    pub call_count: u64,
    /// Cumulative time including callees (seconds)
    pub cumulative_secs: f64,
    /// Own-frame CPU time excluding callees (seconds)
    pub own_secs: f64,
}

/// Ranked, truncated view over a raw profiling run
pub type RankedStats = Vec<ProfileRecord>;

/// Clamp a parsed timing value to a usable range.
///
/// Negative and non-finite values clamp to 0 rather than failing the run;
/// the records come from an external process that already completed
/// successfully by the time they are read.
fn clamp_secs(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        0.0
    }
}

/// Build a ranked view of a raw profiling run.
///
/// Records are sorted by cumulative time descending; ties keep discovery
/// order (stable sort). The result is truncated to `limit` entries. The
/// input is not consumed or reordered, so callers can derive differently
/// sized views (summary and detailed) from the same run.
pub fn aggregate(raw: &RawStats, limit: usize) -> RankedStats {
    let mut records: Vec<ProfileRecord> = raw
        .iter()
        .map(|r| {
            let cumulative_secs = clamp_secs(r.cumulative_secs);
            // Own time never exceeds cumulative time for a finished run.
            let own_secs = clamp_secs(r.own_secs).min(cumulative_secs);
            ProfileRecord {
                name: r.name.clone(),
                call_count: r.call_count,
                cumulative_secs,
                own_secs,
            }
        })
        .collect();

    records.sort_by(|a, b| {
        b.cumulative_secs
            .partial_cmp(&a.cumulative_secs)
            .unwrap_or(Ordering::Equal)
    });
    records.truncate(limit);
    records
}
