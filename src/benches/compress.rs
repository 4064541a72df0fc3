use std::hint::black_box;

use crate::benches::{try_filled, MIB};
use crate::harness::{rate, BenchConfig, Clock, Stopwatch, Workload};

const MAX_RUN: usize = u8::MAX as usize;

/// Run-length encode then decode. Buffers are allocated per call, outside
/// the timed window; the encode scratch is reserved at its worst-case size.
pub struct RunLength {
    bytes: usize,
}

impl RunLength {
    pub fn new(cfg: &BenchConfig) -> Self {
        Self::with_bytes(cfg.compress_bytes)
    }

    pub fn with_bytes(bytes: usize) -> Self {
        Self { bytes }
    }
}

pub fn input(n: usize) -> Option<Vec<u8>> {
    try_filled(n, |i| ((i.wrapping_mul(7)) ^ (i >> 3)) as u8)
}

/// Appends `(byte, run length)` pairs; runs longer than 255 are split.
pub fn encode(input: &[u8], out: &mut Vec<u8>) {
    let mut i = 0;
    while i < input.len() {
        let b = input[i];
        let mut run = 1;
        while i + run < input.len() && input[i + run] == b && run < MAX_RUN {
            run += 1;
        }
        out.push(b);
        out.push(run as u8);
        i += run;
    }
}

/// Expands pairs into `out`, stopping when it is full. Returns bytes written.
pub fn decode(encoded: &[u8], out: &mut [u8]) -> usize {
    let mut written = 0;
    for pair in encoded.chunks_exact(2) {
        if written >= out.len() {
            break;
        }
        let count = (pair[1] as usize).min(out.len() - written);
        out[written..written + count].fill(pair[0]);
        written += count;
    }
    written
}

impl Workload for RunLength {
    fn run_once(&mut self, clock: &dyn Clock) -> f64 {
        let Some(src) = input(self.bytes) else {
            return 0.0;
        };
        let mut scratch = Vec::new();
        if scratch.try_reserve_exact(self.bytes.saturating_mul(2)).is_err() {
            return 0.0;
        }
        let Some(mut out) = try_filled(self.bytes, |_| 0u8) else {
            return 0.0;
        };

        let sw = Stopwatch::start(clock);
        encode(black_box(&src), &mut scratch);
        let decoded = decode(&scratch, &mut out);
        let dt = sw.elapsed();
        black_box(out.get(decoded.saturating_sub(1)).copied());

        // Compress and decompress passes both count.
        rate((self.bytes + decoded) as f64, dt, MIB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::testing::SteppingClock;
    use std::time::Duration;

    #[test]
    fn test_long_runs_split_and_restore() {
        let mut data = vec![9u8; 600];
        data.extend_from_slice(&[1, 2, 2, 3]);
        let mut enc = Vec::new();
        encode(&data, &mut enc);
        assert_eq!(&enc[..6], &[9, 255, 9, 255, 9, 90]);

        let mut out = vec![0u8; data.len()];
        assert_eq!(decode(&enc, &mut out), data.len());
        assert_eq!(out, data);
    }

    #[test]
    fn test_decode_clamps_to_output() {
        let mut out = [0u8; 3];
        assert_eq!(decode(&[7, 10, 8, 1], &mut out), 3);
        assert_eq!(out, [7, 7, 7]);
    }

    #[test]
    fn test_throughput_counts_both_passes() {
        let clock = SteppingClock::new(Duration::from_secs(1));
        let mbps = RunLength::with_bytes(MIB as usize).run_once(&clock);
        assert!((mbps - 2.0).abs() < 1e-9);
    }
}
