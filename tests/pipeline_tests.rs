//! End-to-end pipeline tests on synthetic profiler output
//!
//! Exercises aggregate -> estimate -> grade -> session without an
//! interpreter in the loop, so values are exact and deterministic.

use vatio::csv_output::CsvExport;
use vatio::energy::{EnergyConfig, EnergyReading};
use vatio::json_output::JsonAnalysis;
use vatio::report;
use vatio::score::{self, Grade, SessionState};
use vatio::stats::{self, RawFunctionStats, RawStats, DETAIL_LIMIT, SUMMARY_LIMIT};

fn raw(name: &str, calls: u64, own: f64, cum: f64) -> RawFunctionStats {
    RawFunctionStats {
        name: name.to_string(),
        call_count: calls,
        own_secs: own,
        cumulative_secs: cum,
    }
}

/// A run with a long tail of small functions, larger than both views
fn long_tail_run() -> RawStats {
    let mut run = vec![
        raw("main (app.py:1)", 1, 0.01, 1.0),
        raw("hot (app.py:10)", 500, 0.6, 0.9),
        raw("warm (app.py:20)", 100, 0.2, 0.25),
    ];
    for i in 0..30 {
        run.push(raw(
            &format!("tail{i} (app.py:{})", 40 + i),
            1,
            0.001,
            0.002,
        ));
    }
    run
}

#[test]
fn test_full_pipeline_totals_and_grade() {
    let config = EnergyConfig::default();
    let run = long_tail_run();

    let summary = stats::aggregate(&run, SUMMARY_LIMIT);
    let reading = EnergyReading::from_ranked(&summary, &config);

    // Top-10 own times: 0.01 + 0.6 + 0.2 + 7 * 0.001 = 0.817 s -> 20.425 J.
    assert!((reading.total_joules - 20.425).abs() < 1e-9);
    assert_eq!(score::grade(reading.total_joules), Grade::E);
}

#[test]
fn test_summary_energy_excludes_long_tail() {
    // The total is a sampling over the summary view, not a full-program
    // integral: shrinking the view shrinks the total.
    let config = EnergyConfig::default();
    let run = long_tail_run();

    let top3 = EnergyReading::from_ranked(&stats::aggregate(&run, 3), &config);
    let top10 = EnergyReading::from_ranked(&stats::aggregate(&run, SUMMARY_LIMIT), &config);
    assert!(top3.total_joules < top10.total_joules);
}

#[test]
fn test_summary_prefix_of_detail_on_large_run() {
    let run = long_tail_run();
    assert!(run.len() >= DETAIL_LIMIT);

    let summary = stats::aggregate(&run, SUMMARY_LIMIT);
    let detail = stats::aggregate(&run, DETAIL_LIMIT);
    assert_eq!(summary.len(), SUMMARY_LIMIT);
    assert_eq!(detail.len(), DETAIL_LIMIT);
    assert_eq!(summary.as_slice(), &detail[..SUMMARY_LIMIT]);
}

#[test]
fn test_session_trend_across_three_runs() {
    let config = EnergyConfig::default();
    let mut session = SessionState::new();

    let first = EnergyReading::from_ranked(
        &stats::aggregate(&vec![raw("f", 1, 0.4, 0.4)], SUMMARY_LIMIT),
        &config,
    );
    let second = EnergyReading::from_ranked(
        &stats::aggregate(&vec![raw("f", 1, 0.32, 0.32)], SUMMARY_LIMIT),
        &config,
    );

    assert_eq!(session.record(first.total_joules), None);
    // 10 J -> 8 J is a 20% improvement.
    let delta = session.record(second.total_joules).unwrap();
    assert!((delta - 20.0).abs() < 1e-9);
    // Unchanged third run compares at exactly zero.
    assert_eq!(session.record(second.total_joules), Some(0.0));
}

#[test]
fn test_report_and_csv_agree_on_energy() {
    let config = EnergyConfig::default();
    let run = vec![raw("work (app.py:3)", 4, 0.1, 0.1)];

    let summary = stats::aggregate(&run, SUMMARY_LIMIT);
    let detail = stats::aggregate(&run, DETAIL_LIMIT);
    let reading = EnergyReading::from_ranked(&summary, &config);

    let text = report::render(score::grade(reading.total_joules), &reading, &config);
    assert!(text.contains("\u{2022} work (app.py:3): 2.5000 J"));

    let csv = CsvExport::from_ranked(&detail, &config).to_csv();
    assert!(csv.contains("work (app.py:3),4,0.1000,0.1000,2.50"));
}

#[test]
fn test_json_document_matches_pipeline() {
    let config = EnergyConfig::default();
    let run = long_tail_run();

    let summary = stats::aggregate(&run, SUMMARY_LIMIT);
    let detail = stats::aggregate(&run, DETAIL_LIMIT);
    let reading = EnergyReading::from_ranked(&summary, &config);
    let grade = score::grade(reading.total_joules);

    let analysis = JsonAnalysis::new(grade, &reading, Some(-5.0), &detail, &config);
    let json = analysis.to_json().unwrap();
    let parsed: JsonAnalysis = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.grade, "E");
    assert_eq!(parsed.functions.len(), DETAIL_LIMIT);
    assert_eq!(parsed.delta_percent, Some(-5.0));
    assert!((parsed.total_joules - reading.total_joules).abs() < 1e-12);
    // Detail rows come back in rank order.
    assert_eq!(parsed.functions[0].name, "main (app.py:1)");
    assert_eq!(parsed.functions[1].name, "hot (app.py:10)");
}

#[test]
fn test_empty_run_grades_a_plus() {
    let config = EnergyConfig::default();
    let summary = stats::aggregate(&Vec::new(), SUMMARY_LIMIT);
    let reading = EnergyReading::from_ranked(&summary, &config);

    assert_eq!(reading.total_joules, 0.0);
    assert_eq!(score::grade(reading.total_joules), Grade::APlus);
}

#[test]
fn test_custom_tdp_flows_through_pipeline() {
    let config = EnergyConfig {
        tdp_watts: 50.0,
        ..EnergyConfig::default()
    };
    let run = vec![raw("f", 1, 0.1, 0.1)];
    let reading =
        EnergyReading::from_ranked(&stats::aggregate(&run, SUMMARY_LIMIT), &config);
    assert!((reading.total_joules - 5.0).abs() < 1e-12);
}
