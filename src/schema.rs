use serde::{Deserialize, Serialize};

use crate::stats::Aggregate;
use crate::WorkloadKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub bench_version: String,
    pub profile: String,
    pub repetitions: u32,
    pub warmup: u32,
    pub seed: u64,
    pub timestamp_utc: String,
    pub git_sha: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadResult {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub kind: WorkloadKind,
    pub reference: f64,

    #[serde(flatten)]
    pub aggregate: Aggregate,
}

impl WorkloadResult {
    /// One human-readable line: average with range and index.
    pub fn summary_line(&self) -> String {
        let a = &self.aggregate;
        format!(
            "[{}] {} average: {:.1} {}  [min {:.1}, max {:.1}], index = {:.3}",
            self.id, self.title, a.average, self.unit, a.minimum, a.maximum, a.index
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub run: RunMeta,
    pub results: Vec<WorkloadResult>,
    /// Mean of all `index` values.
    pub grade: f64,
}
