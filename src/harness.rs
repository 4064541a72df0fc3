use std::fmt;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ConfigError;
use crate::stats::{self, Aggregate};
use crate::WorkloadKind;

const MIB: usize = 1024 * 1024;

/// Named parameter presets. Sizes scale roughly x0.25 / x1 / x4 and repetition
/// counts 2 / 5 / 10 from light to heavy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Light,
    #[default]
    Standard,
    Heavy,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Light => "light",
            Profile::Standard => "standard",
            Profile::Heavy => "heavy",
        }
    }

    /// Numeric profile ids: 0 = light, 2 = heavy, anything else is standard.
    pub fn from_id(id: u32) -> Self {
        match id {
            0 => Profile::Light,
            2 => Profile::Heavy,
            _ => Profile::Standard,
        }
    }

    /// Accepts a profile name (any case) or one of the numeric ids 0, 1, 2.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().parse::<u32>() {
            Ok(id @ 0..=2) => Ok(Self::from_id(id)),
            Ok(id) => Err(format!("unknown profile id {id} (expected 0, 1 or 2)")),
            Err(_) => <Self as ValueEnum>::from_str(s.trim(), true),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    pub profile: Profile,
    /// Measured repetitions per workload (K).
    pub repetitions: u32,
    /// Unmeasured repetitions run before the measured ones.
    pub warmup: u32,
    pub seed: u64,
    pub integer_block_bytes: usize,
    pub integer_passes: usize,
    pub float_n: usize,
    pub triad_n: usize,
    pub latency_n: usize,
    pub cipher_bytes: usize,
    pub compress_bytes: usize,
    pub disk_bytes: usize,
}

impl BenchConfig {
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Light => Self {
                profile,
                repetitions: 2,
                warmup: 1,
                seed: 0,
                integer_block_bytes: 16 * MIB,
                integer_passes: 2,
                float_n: 1 << 20,
                triad_n: 1 << 22,
                latency_n: 1 << 20,
                cipher_bytes: 32 * MIB,
                compress_bytes: 16 * MIB,
                disk_bytes: 32 * MIB,
            },
            Profile::Standard => Self {
                profile,
                repetitions: 5,
                warmup: 1,
                seed: 0,
                integer_block_bytes: 64 * MIB,
                integer_passes: 4,
                float_n: 1 << 22,
                triad_n: 1 << 24,
                latency_n: 1 << 22,
                cipher_bytes: 128 * MIB,
                compress_bytes: 64 * MIB,
                disk_bytes: 128 * MIB,
            },
            Profile::Heavy => Self {
                profile,
                repetitions: 10,
                warmup: 1,
                seed: 0,
                integer_block_bytes: 256 * MIB,
                integer_passes: 8,
                float_n: 1 << 24,
                triad_n: 1 << 26,
                latency_n: 1 << 24,
                cipher_bytes: 512 * MIB,
                compress_bytes: 256 * MIB,
                disk_bytes: 512 * MIB,
            },
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }

    pub fn with_warmup(mut self, warmup: u32) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repetitions == 0 {
            return Err(ConfigError::ZeroRepetitions);
        }
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::for_profile(Profile::Standard)
    }
}

/// Source of monotonic timestamps, relative to an arbitrary fixed origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// [`Clock`] backed by [`Instant`], immune to wall-clock adjustment.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// One timing window. Start a new stopwatch for every measured interval.
pub struct Stopwatch<'c> {
    clock: &'c dyn Clock,
    origin: Duration,
}

impl<'c> Stopwatch<'c> {
    pub fn start(clock: &'c dyn Clock) -> Self {
        Self {
            clock,
            origin: clock.now(),
        }
    }

    /// Seconds since [`Stopwatch::start`], never negative.
    pub fn elapsed(&self) -> f64 {
        self.clock.now().saturating_sub(self.origin).as_secs_f64()
    }
}

/// Converts an amount of work done in `seconds` into a per-second rate
/// divided by `scale`. A non-positive interval yields 0.0.
pub fn rate(amount: f64, seconds: f64, scale: f64) -> f64 {
    if seconds <= 0.0 {
        return 0.0;
    }
    (amount / seconds) / scale
}

/// A unit of measured work.
///
/// `prepare` runs at most once, before the first `run_once`, and is never
/// timed. Workloads that leave it as the default no-op do their setup inside
/// `run_once`. `run_once` must time exactly its measured compute with a
/// [`Stopwatch`] over `clock`, keep its result observable (`black_box`), and
/// return 0.0 when it cannot get the resources it needs.
pub trait Workload {
    fn prepare(&mut self) {}

    fn run_once(&mut self, clock: &dyn Clock) -> f64;
}

/// Registry entry: metadata plus the workload itself.
pub struct WorkloadDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub unit: &'static str,
    pub kind: WorkloadKind,
    workload: Box<dyn Workload>,
    prepared: bool,
}

impl WorkloadDescriptor {
    pub fn new(
        id: &'static str,
        title: &'static str,
        unit: &'static str,
        kind: WorkloadKind,
        workload: Box<dyn Workload>,
    ) -> Self {
        Self {
            id,
            title,
            unit,
            kind,
            workload,
            prepared: false,
        }
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    fn ensure_prepared(&mut self) {
        if !self.prepared {
            self.workload.prepare();
            self.prepared = true;
        }
    }

    /// One repetition, preparing the workload first if needed.
    pub fn run_once(&mut self, clock: &dyn Clock) -> f64 {
        self.ensure_prepared();
        self.workload.run_once(clock)
    }
}

impl fmt::Debug for WorkloadDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkloadDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("unit", &self.unit)
            .field("kind", &self.kind)
            .field("prepared", &self.prepared)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProgressEvent {
    /// 1-based index of the measured repetition.
    pub repetition: u32,
    pub sample: f64,
}

pub trait ProgressObserver {
    fn on_progress(&mut self, event: ProgressEvent);
}

impl<F: FnMut(ProgressEvent)> ProgressObserver for F {
    fn on_progress(&mut self, event: ProgressEvent) {
        self(event)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Init,
    Warmup,
    Measuring,
    Aggregating,
    Done,
}

/// Drives warmup and measured repetitions of one workload.
///
/// `run` consumes the controller; a new one is built for every workload.
pub struct RepetitionController<'a> {
    repetitions: u32,
    warmup: u32,
    clock: &'a dyn Clock,
    observer: Option<&'a mut dyn ProgressObserver>,
    phase: Phase,
}

impl<'a> RepetitionController<'a> {
    pub fn new(repetitions: u32, warmup: u32, clock: &'a dyn Clock) -> Self {
        Self {
            repetitions,
            warmup,
            clock,
            observer: None,
            phase: Phase::Init,
        }
    }

    pub fn with_observer(mut self, observer: &'a mut dyn ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase, id: &str) {
        trace!(workload = id, from = ?self.phase, to = ?phase, "phase transition");
        self.phase = phase;
    }

    pub fn run(mut self, descriptor: &mut WorkloadDescriptor, reference: f64) -> Aggregate {
        self.enter(Phase::Warmup, descriptor.id);
        for _ in 0..self.warmup {
            std::hint::black_box(descriptor.run_once(self.clock));
        }

        self.enter(Phase::Measuring, descriptor.id);
        let mut samples = Vec::with_capacity(self.repetitions as usize);
        for repetition in 1..=self.repetitions {
            let sample = descriptor.run_once(self.clock);
            samples.push(sample);
            if let Some(observer) = self.observer.as_deref_mut() {
                observer.on_progress(ProgressEvent { repetition, sample });
            }
        }

        self.enter(Phase::Aggregating, descriptor.id);
        let aggregate = stats::aggregate(&samples, reference);
        self.enter(Phase::Done, descriptor.id);
        aggregate
    }
}
