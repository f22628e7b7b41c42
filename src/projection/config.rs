//! Engine configuration

/// Default tolerance when checking whether allocation percentages already sum to 100
pub const DEFAULT_NORMALIZATION_TOLERANCE: f64 = 1e-6;

/// Configuration for a projection run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Whether to build the year-by-year schedule for each allocation
    pub detailed_output: bool,

    /// Project allocations on the rayon pool instead of sequentially
    pub parallel: bool,

    /// Percent sums within this distance of 100 are left untouched
    pub normalization_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            detailed_output: true,
            parallel: true,
            normalization_tolerance: DEFAULT_NORMALIZATION_TOLERANCE,
        }
    }
}

impl EngineConfig {
    /// Summary figures only, no per-year schedule
    pub fn summary_only() -> Self {
        Self {
            detailed_output: false,
            ..Default::default()
        }
    }

    /// Builder: toggle parallel fan-out
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
