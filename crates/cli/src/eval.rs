//! Golden-dataset evaluation.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use triage::{IssueDraft, LlmGateway, Priority, TriagePipeline};

pub const DEFAULT_DATASET_PATH: &str = "data/golden_dataset.json";

/// One labelled issue.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GoldenCase {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub expected_priority: Priority,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseOutcome {
    pub id: String,
    pub expected: Priority,
    pub predicted: Priority,
    pub matched_rules: Vec<String>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.expected == self.predicted
    }
}

#[derive(Debug, Clone, Default)]
pub struct EvalReport {
    pub outcomes: Vec<CaseOutcome>,
}

impl EvalReport {
    /// Fraction of cases predicted correctly. An empty run scores 0.
    pub fn accuracy(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        let passed = self.outcomes.iter().filter(|o| o.passed()).count();
        passed as f64 / self.outcomes.len() as f64
    }

    pub fn is_perfect(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(CaseOutcome::passed)
    }

    /// Counts indexed `[expected][predicted]` in [`Priority::ALL`] order.
    pub fn confusion(&self) -> [[usize; 3]; 3] {
        let mut matrix = [[0; 3]; 3];
        for outcome in &self.outcomes {
            matrix[index(outcome.expected)][index(outcome.predicted)] += 1;
        }
        matrix
    }
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy: {:.2}%", self.accuracy() * 100.0)?;
        writeln!(f)?;
        writeln!(f, "Confusion matrix (expected -> predicted):")?;
        write!(f, "{:>8}", "")?;
        for predicted in Priority::ALL {
            write!(f, "{:>8}", predicted.as_str())?;
        }
        writeln!(f)?;
        for (expected, row) in Priority::ALL.iter().zip(self.confusion()) {
            write!(f, "{:>8}", expected.as_str())?;
            for count in row {
                write!(f, "{count:>8}")?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        writeln!(f, "Per-case results:")?;
        for o in &self.outcomes {
            writeln!(
                f,
                "{}: expected={}, predicted={} [{}] rules={:?}",
                o.id,
                o.expected,
                o.predicted,
                if o.passed() { "PASS" } else { "FAIL" },
                o.matched_rules,
            )?;
        }
        Ok(())
    }
}

pub fn load_dataset(path: &Path) -> anyhow::Result<Vec<GoldenCase>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading dataset {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing dataset {}", path.display()))
}

/// Triages every case without repository or URL context.
pub async fn run(
    pipeline: &TriagePipeline,
    gateway: &dyn LlmGateway,
    cases: &[GoldenCase],
) -> EvalReport {
    let mut outcomes = Vec::with_capacity(cases.len());
    for case in cases {
        let issue = IssueDraft::new(case.title.clone()).with_body(case.description.clone());
        let result = pipeline.triage(gateway, &issue).await;
        outcomes.push(CaseOutcome {
            id: case.id.clone(),
            expected: case.expected_priority,
            predicted: result.priority(),
            matched_rules: result.matched_rules().to_vec(),
        });
    }
    EvalReport { outcomes }
}

fn index(priority: Priority) -> usize {
    match priority {
        Priority::High => 0,
        Priority::Medium => 1,
        Priority::Low => 2,
    }
}
