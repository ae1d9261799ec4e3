//! Property-based tests for the loading and aggregation pipeline
//!
//! Core properties tested:
//! 1. Derived error fields
//! 2. Concatenation of result files through the loader
//! 3. Group counts and ordering
//! 4. Success rate bounds
//! 5. Summary statistics invariants

use delock_analyze::dataset::{RawResultRow, ResultTable, TrialRecord};
use delock_analyze::findings::auto_trend_threads;
use delock_analyze::stats::{group_by_threads, GroupStats, Summary};
use proptest::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn raw_row(threads: u32, initial: f64, final_balance: f64, expected: f64) -> RawResultRow {
    RawResultRow {
        threads,
        iterations: 1000,
        initial_balance: initial,
        final_balance,
        expected,
        time_sec: 0.01,
        run_id: None,
        amount: None,
        overdraws: None,
        failed_checks: None,
    }
}

fn row_strategy() -> impl Strategy<Value = RawResultRow> {
    (1u32..64, 1u32..1_000_000, 0u32..1_000_000).prop_map(|(threads, initial, lost)| {
        let initial = initial as f64;
        let final_balance = initial - (lost as f64).min(initial);
        raw_row(threads, initial, final_balance, initial)
    })
}

fn table_strategy() -> impl Strategy<Value = ResultTable> {
    prop::collection::vec(row_strategy(), 1..40).prop_map(|rows| {
        ResultTable::from_records(rows.into_iter().filter_map(TrialRecord::from_raw).collect())
    })
}

/// Write rows as a results CSV in the benchmark's column layout
fn write_csv(dir: &TempDir, name: &str, rows: &[RawResultRow]) -> PathBuf {
    let mut csv = String::from("threads,iterations,initial_balance,final_balance,expected,time_sec\n");
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            row.threads,
            row.iterations,
            row.initial_balance,
            row.final_balance,
            row.expected,
            row.time_sec
        ));
    }
    let path = dir.path().join(name);
    fs::write(&path, csv).unwrap();
    path
}

fn derived(record: &TrialRecord) -> (u32, f64, f64, bool) {
    (record.threads(), record.error, record.error_percent, record.is_correct)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_derived_fields(row in row_strategy()) {
        let initial = row.initial_balance;
        let final_balance = row.final_balance;
        let record = TrialRecord::from_raw(row).unwrap();

        prop_assert_eq!(record.error, initial - final_balance);
        let expected_percent = record.error / initial * 100.0;
        prop_assert!((record.error_percent - expected_percent).abs() < 1e-9);
        prop_assert_eq!(record.is_correct, final_balance == initial);
    }

    #[test]
    fn prop_zero_initial_balance_rejected(threads in 1u32..64, final_balance in -1000.0f64..1000.0) {
        prop_assert!(TrialRecord::from_raw(raw_row(threads, 0.0, final_balance, 0.0)).is_none());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_load_concatenates_files(
        rows_a in prop::collection::vec(row_strategy(), 1..30),
        rows_b in prop::collection::vec(row_strategy(), 1..30),
    ) {
        let dir = TempDir::new().unwrap();
        let path_a = write_csv(&dir, "a.csv", &rows_a);
        let path_b = write_csv(&dir, "b.csv", &rows_b);

        let a = ResultTable::load(&[path_a.clone()]).unwrap();
        let b = ResultTable::load(&[path_b.clone()]).unwrap();
        let combined = ResultTable::load(&[path_a, path_b]).unwrap();

        prop_assert_eq!(combined.len(), a.len() + b.len());
        prop_assert_eq!(combined.len(), rows_a.len() + rows_b.len());

        let alone: Vec<_> = a.iter().chain(b.iter()).map(derived).collect();
        let together: Vec<_> = combined.iter().map(derived).collect();
        prop_assert_eq!(together, alone);
    }

    #[test]
    fn prop_one_group_per_thread_count(table in table_strategy()) {
        let groups = group_by_threads(&table);
        let keys: Vec<u32> = groups.iter().map(|g| g.key).collect();

        prop_assert_eq!(keys, table.thread_counts());
        let total: usize = groups.iter().map(|g| g.stats.count).sum();
        prop_assert_eq!(total, table.len());
    }

    #[test]
    fn prop_success_rate_bounds(table in table_strategy()) {
        for group in group_by_threads(&table) {
            let rate = group.stats.success_rate();
            prop_assert!((0.0..=100.0).contains(&rate));
            prop_assert_eq!(rate == 100.0, group.stats.all_correct());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_all_correct_group_is_full_success(threads in 1u32..64, n in 1usize..20) {
        let records: Vec<TrialRecord> = (0..n)
            .filter_map(|_| TrialRecord::from_raw(raw_row(threads, 1000.0, 1000.0, 1000.0)))
            .collect();
        let refs: Vec<&TrialRecord> = records.iter().collect();
        let stats = GroupStats::from_records(&refs).unwrap();

        prop_assert_eq!(stats.success_rate(), 100.0);
        prop_assert_eq!(stats.error_percent.max, 0.0);
    }

    #[test]
    fn prop_summary_bounds(values in prop::collection::vec(-1000.0f64..1000.0, 1..50)) {
        let summary = Summary::from_values(&values).unwrap();

        prop_assert_eq!(summary.count, values.len());
        prop_assert!(summary.min <= summary.max);
        prop_assert!(summary.min <= summary.mean && summary.mean <= summary.max);
        prop_assert_eq!(summary.std_dev.is_some(), values.len() > 1);
        if let Some(std) = summary.std_dev {
            prop_assert!(std >= 0.0);
        }
    }

    #[test]
    fn prop_summary_matches_two_pass_reference(
        offset in 0.0f64..5e7,
        deltas in prop::collection::vec(-100.0f64..100.0, 2..20),
    ) {
        let values: Vec<f64> = deltas.iter().map(|d| offset + d).collect();
        let summary = Summary::from_values(&values).unwrap();

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        let std = (ss / (n - 1.0)).sqrt();

        prop_assert!((summary.mean - mean).abs() <= mean.abs() * 1e-12 + 1e-12);
        let got = summary.std_dev.unwrap();
        prop_assert!((got - std).abs() <= std * 1e-4 + 1e-6, "std {} vs {}", got, std);
    }

    #[test]
    fn prop_auto_trend_subset(threads in prop::collection::btree_set(1u32..128, 0..12)) {
        let available: Vec<u32> = threads.into_iter().collect();
        let picked = auto_trend_threads(&available);

        prop_assert!(picked.len() <= 3);
        prop_assert!(picked.iter().all(|t| available.contains(t)));
        prop_assert!(picked.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(picked.is_empty(), available.is_empty());
    }
}
