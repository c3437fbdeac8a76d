//! CLI argument parsing for Vatio

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable sustainability report (default)
    Text,
    /// JSON document for machine parsing
    Json,
    /// CSV export of the detailed statistics view
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "vatio")]
#[command(version)]
#[command(about = "Energy-aware code profiler with sustainability grading", long_about = None)]
pub struct Cli {
    /// Python source files to analyze; consecutive files share one
    /// session, so the second and later runs show an energy trend
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Number of ranked functions in the summary view
    #[arg(long = "top", value_name = "N", default_value = "10")]
    pub top: usize,

    /// Assumed average device power draw in watts
    #[arg(long = "tdp", value_name = "WATTS", default_value = "25.0")]
    pub tdp_watts: f64,

    /// Wall-clock limit for the profiled program in seconds
    #[arg(short = 't', long = "timeout", value_name = "SECS", default_value = "60")]
    pub timeout_secs: u64,

    /// Python interpreter used to run the profiled program
    #[arg(long = "python", value_name = "PATH", default_value = "python3")]
    pub python: String,

    /// Ask the suggestion gateway for an optimized rewrite
    #[arg(short = 's', long = "suggest")]
    pub suggest: bool,

    /// Gateway model name
    #[arg(long = "model", value_name = "NAME", default_value = "gemini-2.5-flash")]
    pub model: String,

    /// Enable debug tracing to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_single_file() {
        let cli = Cli::parse_from(["vatio", "app.py"]);
        assert_eq!(cli.files.len(), 1);
        assert_eq!(cli.files[0], PathBuf::from("app.py"));
    }

    #[test]
    fn test_cli_parses_multiple_files() {
        let cli = Cli::parse_from(["vatio", "before.py", "after.py"]);
        assert_eq!(cli.files.len(), 2);
    }

    #[test]
    fn test_cli_requires_files() {
        assert!(Cli::try_parse_from(["vatio"]).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["vatio", "app.py"]);
        assert_eq!(cli.top, 10);
        assert_eq!(cli.tdp_watts, 25.0);
        assert_eq!(cli.timeout_secs, 60);
        assert_eq!(cli.python, "python3");
        assert_eq!(cli.model, "gemini-2.5-flash");
        assert!(!cli.suggest);
        assert!(!cli.debug);
        assert!(matches!(cli.format, OutputFormat::Text));
    }

    #[test]
    fn test_cli_format_csv() {
        let cli = Cli::parse_from(["vatio", "--format", "csv", "app.py"]);
        assert!(matches!(cli.format, OutputFormat::Csv));
    }

    #[test]
    fn test_cli_custom_tdp() {
        let cli = Cli::parse_from(["vatio", "--tdp", "45.5", "app.py"]);
        assert_eq!(cli.tdp_watts, 45.5);
    }

    #[test]
    fn test_cli_timeout_short_flag() {
        let cli = Cli::parse_from(["vatio", "-t", "5", "app.py"]);
        assert_eq!(cli.timeout_secs, 5);
    }

    #[test]
    fn test_cli_suggest_flag() {
        let cli = Cli::parse_from(["vatio", "-s", "--model", "gemini-2.5-pro", "app.py"]);
        assert!(cli.suggest);
        assert_eq!(cli.model, "gemini-2.5-pro");
    }

    #[test]
    fn test_cli_custom_python() {
        let cli = Cli::parse_from(["vatio", "--python", "/usr/bin/python3.12", "app.py"]);
        assert_eq!(cli.python, "/usr/bin/python3.12");
    }
}
