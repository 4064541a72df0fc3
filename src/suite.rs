//! Suite orchestration: runs every registered workload in order, persists one
//! row per workload and folds the indices into a composite grade.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::benches;
use crate::error::ConfigError;
use crate::harness::{
    BenchConfig, Clock, MonotonicClock, ProgressEvent, ProgressObserver, RepetitionController,
    WorkloadDescriptor,
};
use crate::refs::ReferenceTable;
use crate::report::{CsvReporter, ReportRow};
use crate::schema::WorkloadResult;
use crate::stats::{self, Aggregate};
use crate::WorkloadKind;

/// Calls made by [`Suite::run_single`] before the counted repetitions.
pub const SINGLE_RUN_WARMUP: u32 = 1;

#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    pub results: Vec<WorkloadResult>,
    pub grade: f64,
}

pub struct Suite {
    config: BenchConfig,
    refs: ReferenceTable,
    registry: Vec<WorkloadDescriptor>,
    clock: Box<dyn Clock>,
}

impl Suite {
    /// Suite over the built-in registry, timed with the monotonic clock.
    pub fn new(config: BenchConfig, refs: ReferenceTable) -> Result<Self, ConfigError> {
        let registry = benches::registry(&config);
        Self::with_registry(config, refs, registry, Box::new(MonotonicClock::new()))
    }

    pub fn with_registry(
        config: BenchConfig,
        refs: ReferenceTable,
        registry: Vec<WorkloadDescriptor>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut seen = HashSet::new();
        for d in &registry {
            if !seen.insert(d.id) {
                return Err(ConfigError::DuplicateWorkload(d.id.to_string()));
            }
        }
        Ok(Self {
            config,
            refs,
            registry,
            clock,
        })
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn descriptors(&self) -> &[WorkloadDescriptor] {
        &self.registry
    }

    pub fn find(&self, id: &str) -> Option<&WorkloadDescriptor> {
        self.registry.iter().find(|d| d.id.eq_ignore_ascii_case(id))
    }

    pub fn reference(&self, kind: WorkloadKind) -> f64 {
        self.refs.baseline(kind)
    }

    /// Runs every workload with the configured warmup and repetition count.
    ///
    /// `observer` sees the progress events of every workload in order; each
    /// workload restarts at repetition 1.
    pub fn run_all(
        &mut self,
        reporter: &mut CsvReporter,
        mut observer: Option<&mut dyn ProgressObserver>,
    ) -> SuiteOutcome {
        let repetitions = self.config.repetitions;
        let warmup = self.config.warmup;
        info!(
            profile = self.config.profile.as_str(),
            repetitions,
            warmup,
            workloads = self.registry.len(),
            "starting suite"
        );

        let mut results = Vec::with_capacity(self.registry.len());
        for descriptor in self.registry.iter_mut() {
            let reference = self.refs.baseline(descriptor.kind);
            let (id, unit) = (descriptor.id, descriptor.unit);

            let mut log_progress = |e: ProgressEvent| {
                info!("[{id}] run {}/{repetitions}: {:.1} {unit}", e.repetition, e.sample);
                if let Some(o) = observer.as_deref_mut() {
                    o.on_progress(e);
                }
            };
            let aggregate = RepetitionController::new(repetitions, warmup, self.clock.as_ref())
                .with_observer(&mut log_progress)
                .run(descriptor, reference);

            reporter.write(&ReportRow {
                id,
                title: descriptor.title,
                unit,
                aggregate: &aggregate,
            });
            let result = WorkloadResult {
                id: id.to_string(),
                title: descriptor.title.to_string(),
                unit: unit.to_string(),
                kind: descriptor.kind,
                reference,
                aggregate,
            };
            debug!("{}", result.summary_line());
            results.push(result);
        }

        let indices: Vec<f64> = results.iter().map(|r| r.aggregate.index).collect();
        let grade = stats::grade(&indices);
        info!(workloads = results.len(), grade, "suite finished");
        SuiteOutcome { results, grade }
    }

    /// Runs one workload by id: a single implicit warmup call that is
    /// discarded, then the configured number of counted repetitions.
    ///
    /// An unknown id yields [`Aggregate::ZERO`].
    pub fn run_single(
        &mut self,
        id: &str,
        observer: Option<&mut dyn ProgressObserver>,
    ) -> Aggregate {
        let Some(descriptor) = self
            .registry
            .iter_mut()
            .find(|d| d.id.eq_ignore_ascii_case(id))
        else {
            warn!(id, "unknown workload id");
            return Aggregate::ZERO;
        };

        let reference = self.refs.baseline(descriptor.kind);
        debug!(id = descriptor.id, reference, "running single workload");
        let controller = RepetitionController::new(
            self.config.repetitions,
            SINGLE_RUN_WARMUP,
            self.clock.as_ref(),
        );
        match observer {
            Some(o) => controller.with_observer(o).run(descriptor, reference),
            None => controller.run(descriptor, reference),
        }
    }
}
