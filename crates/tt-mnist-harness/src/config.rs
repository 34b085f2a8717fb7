//! Harness configuration
//!
//! Defaults, then the `TT_MNIST_VECTORS` environment override, then any
//! explicit `with_*` calls.

use std::path::{Path, PathBuf};
use tracing::debug;
use tt_mnist_driver::ProtocolTiming;
use tt_mnist_pins::timing::CLOCK_PERIOD_NS;

/// Environment variable overriding the vector directory
pub const VECTORS_ENV: &str = "TT_MNIST_VECTORS";

/// Vector directory used when nothing else is configured
pub const DEFAULT_VECTOR_DIR: &str = "test/test_vectors/vectors";

/// Verification run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Directory holding `test_NNN_*.txt` resources
    pub vector_dir: PathBuf,
    /// Protocol edge counts and cycle budget
    pub timing: ProtocolTiming,
    /// Clock period used to report simulated time
    pub clock_period_ns: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            vector_dir: PathBuf::from(DEFAULT_VECTOR_DIR),
            timing: ProtocolTiming::default(),
            clock_period_ns: CLOCK_PERIOD_NS,
        }
    }
}

impl HarnessConfig {
    /// Defaults with the environment override applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os(VECTORS_ENV) {
            debug!("{VECTORS_ENV} overrides vector directory");
            config.vector_dir = PathBuf::from(dir);
        }
        config
    }

    /// Set the vector directory.
    #[must_use]
    pub fn with_vector_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.vector_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the protocol timing.
    #[must_use]
    pub const fn with_timing(mut self, timing: ProtocolTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Set only the cycle budget.
    #[must_use]
    pub const fn with_cycle_budget(mut self, cycles: u64) -> Self {
        self.timing = self.timing.with_cycle_budget(cycles);
        self
    }

    /// Set the clock period.
    #[must_use]
    pub const fn with_clock_period_ns(mut self, ns: u64) -> Self {
        self.clock_period_ns = ns;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_bench() {
        let config = HarnessConfig::default();
        assert_eq!(config.vector_dir, PathBuf::from(DEFAULT_VECTOR_DIR));
        assert_eq!(config.timing.cycle_budget, 5_000);
        assert_eq!(config.clock_period_ns, 10);
    }

    #[test]
    fn builders_override_fields() {
        let config = HarnessConfig::default()
            .with_vector_dir("/tmp/vectors")
            .with_cycle_budget(64)
            .with_clock_period_ns(20);
        assert_eq!(config.vector_dir, PathBuf::from("/tmp/vectors"));
        assert_eq!(config.timing.cycle_budget, 64);
        assert_eq!(config.timing.settle_edges, 1);
        assert_eq!(config.clock_period_ns, 20);
    }
}
