//! Calibrated baselines used to normalize measured throughput.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::WorkloadKind;

/// One baseline per workload kind, in the unit of that kind's workloads.
///
/// The default is the compiled-in calibration; other machines can be captured
/// as JSON and loaded with [`ReferenceTable::from_json_file`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTable {
    pub integer_mips: f64,
    pub float_mflops: f64,
    pub memory_mbps: f64,
    pub cipher_mbps: f64,
    pub compress_mbps: f64,
    pub latency_mops: f64,
    pub disk_mbps: f64,
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self {
            integer_mips: 2255.066,
            float_mflops: 904.596,
            memory_mbps: 10195.801,
            cipher_mbps: 1682.464,
            compress_mbps: 721.390,
            latency_mops: 468.004,
            // Never calibrated: disk scores carry a zero index.
            disk_mbps: 0.0,
        }
    }
}

impl ReferenceTable {
    pub fn baseline(&self, kind: WorkloadKind) -> f64 {
        match kind {
            WorkloadKind::Integer => self.integer_mips,
            WorkloadKind::Float => self.float_mflops,
            WorkloadKind::Memory => self.memory_mbps,
            WorkloadKind::Cipher => self.cipher_mbps,
            WorkloadKind::Compress => self.compress_mbps,
            WorkloadKind::Latency => self.latency_mops,
            WorkloadKind::Disk => self.disk_mbps,
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ReferenceFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::ReferenceFormat {
            path: path.to_path_buf(),
            source,
        })
    }
}
