//! JSON output format for key findings
//!
//! `--format json` implementation

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::findings::KeyFindings;

/// Complete JSON document printed on stdout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// Format version
    pub version: String,
    /// Output format identifier
    pub format: String,
    /// CSV files that were loaded, in load order
    pub inputs: Vec<PathBuf>,
    /// Files written to the output directory
    pub artifacts: Vec<PathBuf>,
    pub findings: KeyFindings,
}

impl JsonReport {
    pub fn new(inputs: Vec<PathBuf>, artifacts: Vec<PathBuf>, findings: KeyFindings) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "delock-findings-v1".to_string(),
            inputs,
            artifacts,
            findings,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::{BaselineFindings, TrendPoint, WorstCaseFindings};

    fn findings(baseline: bool) -> KeyFindings {
        KeyFindings {
            total_runs: 12,
            baseline: baseline.then_some(BaselineFindings {
                runs: 4,
                all_correct: true,
                mean_time_ms: 1.5,
            }),
            worst_case: WorstCaseFindings {
                threads: 48,
                runs: 4,
                mean_error_percent: 37.5,
                success_rate: 0.0,
                mean_time_ms: 20.0,
                mean_overdraws: None,
            },
            trend: vec![TrendPoint {
                threads: 48,
                mean_error_percent: 37.5,
            }],
        }
    }

    #[test]
    fn test_json_report_format() {
        let report = JsonReport::new(vec![], vec![], findings(true));
        let json = report.to_json().unwrap();
        assert!(json.contains("\"format\": \"delock-findings-v1\""));
        assert!(json.contains("\"total_runs\": 12"));
        assert!(json.contains("\"threads\": 48"));
    }

    #[test]
    fn test_json_omits_missing_sections() {
        let json = JsonReport::new(vec![], vec![], findings(false))
            .to_json()
            .unwrap();
        assert!(!json.contains("baseline"));
        assert!(!json.contains("mean_overdraws"));
    }

    #[test]
    fn test_json_lists_inputs_and_artifacts() {
        let report = JsonReport::new(
            vec![PathBuf::from("results/a.csv")],
            vec![PathBuf::from("out/summary_table.csv")],
            findings(true),
        );
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["inputs"][0], "results/a.csv");
        assert_eq!(value["artifacts"][0], "out/summary_table.csv");
        assert_eq!(value["findings"]["baseline"]["all_correct"], true);
    }

    #[test]
    fn test_json_deserialization() {
        let json = JsonReport::new(vec![], vec![], findings(true))
            .to_json()
            .unwrap();
        let parsed: JsonReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.findings, findings(true));
        assert_eq!(parsed.version, env!("CARGO_PKG_VERSION"));
    }
}
