//! CSV export of the detailed statistics view
//!
//! Fixed column contract: `Function,Calls,Total,CPU,Energy` with
//! cumulative and own time to 4 decimals and energy to 2. Fields are
//! escaped when they contain commas, quotes or newlines so the output
//! stays parseable by spreadsheet tools.

use crate::energy::EnergyConfig;
use crate::stats::ProfileRecord;

/// One exported row
#[derive(Debug, Clone)]
pub struct CsvRow {
    pub function: String,
    pub calls: u64,
    pub cumulative_secs: f64,
    pub own_secs: f64,
    pub joules: f64,
}

/// CSV export formatter
#[derive(Debug, Default)]
pub struct CsvExport {
    rows: Vec<CsvRow>,
}

impl CsvExport {
    /// Create an empty export
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an export from the detailed ranked view
    pub fn from_ranked(detail: &[ProfileRecord], config: &EnergyConfig) -> Self {
        let rows = detail
            .iter()
            .map(|r| CsvRow {
                function: r.name.clone(),
                calls: r.call_count,
                cumulative_secs: r.cumulative_secs,
                own_secs: r.own_secs,
                joules: config.estimate_energy(r.own_secs),
            })
            .collect();
        Self { rows }
    }

    /// Add a row to the export
    pub fn add_row(&mut self, row: CsvRow) {
        self.rows.push(row);
    }

    /// Header row
    fn header() -> &'static str {
        "Function,Calls,Total,CPU,Energy"
    }

    /// Escape a CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    /// Format one row
    fn format_row(row: &CsvRow) -> String {
        format!(
            "{},{},{:.4},{:.4},{:.2}",
            Self::escape_field(&row.function),
            row.calls,
            row.cumulative_secs,
            row.own_secs,
            row.joules
        )
    }

    /// Generate the CSV document
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str(Self::header());
        output.push('\n');
        for row in &self.rows {
            output.push_str(&Self::format_row(row));
            output.push('\n');
        }
        output
    }
}
