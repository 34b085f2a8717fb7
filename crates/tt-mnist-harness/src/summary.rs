//! Batch accounting

use crate::case::CaseResult;
use std::fmt;

/// Cycle statistics over completed (non-timeout) cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleStats {
    samples: u64,
    min: u64,
    max: u64,
    total: u64,
}

impl CycleStats {
    /// Add one completed run.
    pub fn record(&mut self, cycles: u64) {
        if self.samples == 0 {
            self.min = cycles;
            self.max = cycles;
        } else {
            self.min = self.min.min(cycles);
            self.max = self.max.max(cycles);
        }
        self.samples += 1;
        self.total += cycles;
    }

    /// Runs recorded
    pub const fn samples(&self) -> u64 {
        self.samples
    }

    /// Fewest cycles, if any run was recorded
    pub const fn min(&self) -> Option<u64> {
        if self.samples == 0 {
            None
        } else {
            Some(self.min)
        }
    }

    /// Most cycles, if any run was recorded
    pub const fn max(&self) -> Option<u64> {
        if self.samples == 0 {
            None
        } else {
            Some(self.max)
        }
    }

    /// Mean cycles, if any run was recorded
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Option<f64> {
        (self.samples > 0).then(|| self.total as f64 / self.samples as f64)
    }
}

/// Outcome of a batch run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchSummary {
    /// Cases run
    pub total: usize,
    /// Cases passed
    pub passed: usize,
    /// Cases failed (mismatches and timeouts)
    pub failed: usize,
    /// Every failing case, in run order
    pub failures: Vec<CaseResult>,
    /// Cycles of completed cases only
    pub cycle_stats: CycleStats,
    /// Cycles of every case, timeouts included
    pub cycles_spent: u64,
}

impl BatchSummary {
    /// Fold one case into the summary.
    pub fn record(&mut self, result: CaseResult) {
        self.total += 1;
        self.cycles_spent += result.cycles_used;
        if !result.is_timeout() {
            self.cycle_stats.record(result.cycles_used);
        }
        if result.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
            self.failures.push(result);
        }
    }

    /// True when every case passed
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Passed cases as a percentage, 0 for an empty batch
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.passed as f64 / self.total as f64
        }
    }

    /// Time the whole batch took on a clock with the given period
    pub const fn simulated_ns(&self, clock_period_ns: u64) -> u64 {
        self.cycles_spent.saturating_mul(clock_period_ns)
    }

    /// Number of timeouts among the failures
    pub fn timeouts(&self) -> usize {
        self.failures.iter().filter(|r| r.is_timeout()).count()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(80);
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "RESULTS: {}/{} tests passed ({:.1}%)",
            self.passed,
            self.total,
            self.pass_rate()
        )?;
        if let (Some(min), Some(max), Some(mean)) = (
            self.cycle_stats.min(),
            self.cycle_stats.max(),
            self.cycle_stats.mean(),
        ) {
            writeln!(f, "Cycle Stats: Min={min}, Max={max}, Avg={mean:.1}")?;
        }
        write!(f, "{rule}")?;

        if self.failed > 0 {
            writeln!(f)?;
            writeln!(f)?;
            write!(f, "FAILURES: {} tests failed", self.failed)?;
            for r in &self.failures {
                writeln!(f)?;
                write!(
                    f,
                    "Test {:2}: Expected {}, Got {} ({} cycles)",
                    r.index, r.expected, r.observed, r.cycles_used
                )?;
            }
        }
        Ok(())
    }
}
