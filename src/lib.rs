use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod benches;
pub mod error;
pub mod harness;
pub mod refs;
pub mod report;
pub mod schema;
pub mod stats;
pub mod suite;

/// Category of measured operation; selects the reference baseline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadKind {
    /// Integer xor/multiply/rotate mix (MIPS).
    Integer,
    /// Floating-point dot product (MFLOPS).
    Float,
    /// Streaming memory TRIAD (MB/s).
    Memory,
    /// Cipher-like block transform (MB/s).
    Cipher,
    /// Run-length compress + decompress (MB/s).
    Compress,
    /// Dependent random memory loads (MOPS).
    Latency,
    /// Sequential disk write + read (MB/s).
    Disk,
}

impl WorkloadKind {
    pub const ALL: [WorkloadKind; 7] = [
        WorkloadKind::Integer,
        WorkloadKind::Float,
        WorkloadKind::Memory,
        WorkloadKind::Cipher,
        WorkloadKind::Compress,
        WorkloadKind::Latency,
        WorkloadKind::Disk,
    ];
}
