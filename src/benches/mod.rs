//! Concrete workloads and the built-in registry.

pub mod compress;

use crate::harness::{BenchConfig, WorkloadDescriptor};
use crate::WorkloadKind;

pub const MIB: f64 = 1024.0 * 1024.0;

/// Fallible allocation of `n` elements produced by `fill`; `None` when the
/// allocator refuses the request.
pub(crate) fn try_filled<T>(n: usize, fill: impl FnMut(usize) -> T) -> Option<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(n).ok()?;
    v.extend((0..n).map(fill));
    Some(v)
}

/// The seven workloads in suite order.
pub fn registry(cfg: &BenchConfig) -> Vec<WorkloadDescriptor> {
    vec![
        WorkloadDescriptor::new(
            "INT",
            "Integer checksum mix",
            "MIPS",
            WorkloadKind::Integer,
            Box::new(integer::IntegerMix::new(cfg)),
        ),
        WorkloadDescriptor::new(
            "FP",
            "Floating-point dot",
            "MFLOPS",
            WorkloadKind::Float,
            Box::new(float::FloatDot::new(cfg)),
        ),
        WorkloadDescriptor::new(
            "MEM",
            "Memory TRIAD (A=B+s*C)",
            "MB/s",
            WorkloadKind::Memory,
            Box::new(memory::Triad::new(cfg)),
        ),
        WorkloadDescriptor::new(
            "AES",
            "AES-style block rounds (throughput)",
            "MB/s",
            WorkloadKind::Cipher,
            Box::new(cipher::BlockRounds::new(cfg)),
        ),
        WorkloadDescriptor::new(
            "CMP",
            "Run-length codec",
            "MB/s",
            WorkloadKind::Compress,
            Box::new(compress::RunLength::new(cfg)),
        ),
        WorkloadDescriptor::new(
            "RND",
            "Memory random latency",
            "MOPS",
            WorkloadKind::Latency,
            Box::new(memory::RandomLatency::new(cfg)),
        ),
        WorkloadDescriptor::new(
            "DSK",
            "Disk I/O throughput",
            "MB/s",
            WorkloadKind::Disk,
            Box::new(disk::DiskIo::new(cfg)),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_filled() {
        let v = try_filled(4, |i| i * 2).unwrap();
        assert_eq!(v, vec![0, 2, 4, 6]);
        assert!(try_filled::<u64>(usize::MAX / 4, |_| 0).is_none());
    }

    #[test]
    fn test_registry_covers_every_kind() {
        let reg = registry(&BenchConfig::default());
        let kinds: Vec<WorkloadKind> = reg.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, WorkloadKind::ALL.to_vec());
        assert!(reg.iter().all(|d| !d.is_prepared()));
    }
}
