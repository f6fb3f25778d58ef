//! Per-step hooks into the convergence loop
//!
//! The loop calls the observer after every propagation step with the vector
//! it just produced. Tests use this to check intermediate vectors.

/// Receives a callback after every propagation step.
pub trait IterationObserver {
    /// `iteration` is 1-based; `scores` is the vector just produced.
    fn on_iteration(&mut self, iteration: usize, delta: f64, scores: &[f64]);
}

/// Observer that does nothing. The default for un-instrumented runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl IterationObserver for NoopObserver {
    #[inline]
    fn on_iteration(&mut self, _iteration: usize, _delta: f64, _scores: &[f64]) {}
}

/// Records the L1 delta of every step.
#[derive(Debug, Clone, Default)]
pub struct DeltaRecorder {
    pub deltas: Vec<f64>,
}

impl DeltaRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IterationObserver for DeltaRecorder {
    fn on_iteration(&mut self, _iteration: usize, delta: f64, _scores: &[f64]) {
        self.deltas.push(delta);
    }
}
