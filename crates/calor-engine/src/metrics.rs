//! Per-step and per-run performance metrics.
//!
//! [`StepMetrics`] captures timing and numerical data for a single step;
//! [`RunMetrics`] accumulates them over a run.

/// Timing and numerical metrics collected during a single step.
///
/// All durations are in microseconds. The runner populates these fields
/// after each step; consumers read them from the most recent step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step, sink delivery included.
    pub total_us: u64,
    /// Time spent in the scheme and buffer swap.
    pub stencil_us: u64,
    /// Time spent scanning the field for divergence.
    pub inspect_us: u64,
    /// Time spent delivering the snapshot to the sink.
    pub sink_us: u64,
    /// Time step taken.
    pub dt: f64,
    /// Largest absolute change of any cell.
    pub max_delta: f64,
    /// Solver iterations used by the scheme.
    pub sweeps: u32,
}

/// Totals over a whole run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunMetrics {
    /// Steps completed.
    pub steps: u64,
    /// Sum of per-step wall-clock times.
    pub total_us: u64,
    /// Sum of scheme iterations.
    pub total_sweeps: u64,
    /// Largest per-step `max_delta` seen.
    pub peak_max_delta: f64,
    /// `max_delta` of the most recent step.
    pub last_max_delta: f64,
}

impl RunMetrics {
    /// Fold one step into the totals.
    pub fn record(&mut self, step: &StepMetrics) {
        self.steps += 1;
        self.total_us += step.total_us;
        self.total_sweeps += u64::from(step.sweeps);
        self.peak_max_delta = self.peak_max_delta.max(step.max_delta);
        self.last_max_delta = step.max_delta;
    }
}
