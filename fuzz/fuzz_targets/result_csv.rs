#![no_main]

use delock_analyze::dataset::ResultTable;
use delock_analyze::findings::{KeyFindings, TrendSelection};
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    // Malformed CSV must surface as an error, never a panic
    if let Ok(table) = ResultTable::from_reader(data, Path::new("fuzz.csv")) {
        let _ = KeyFindings::compute(&table, &TrendSelection::Auto);
    }
});
