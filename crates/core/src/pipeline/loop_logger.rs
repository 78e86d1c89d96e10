use std::collections::HashMap;
use std::time::Instant;

use crate::access::domain::verdict::AccessState;

/// Cross-cutting logger for access-loop events.
///
/// Keeps the loop free of output concerns: the CLI prints audit lines and a
/// summary, tests record or discard.
pub trait LoopLogger: Send {
    /// Record the decision of one completed cycle.
    fn decision(&mut self, state: AccessState);

    /// Record how long a named stage took in one cycle.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. faces in frame).
    fn metric(&mut self, name: &str, value: f64);

    /// A capture failed and the cycle was skipped.
    fn capture_retry(&mut self);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullLoopLogger;

impl LoopLogger for NullLoopLogger {
    fn decision(&mut self, _state: AccessState) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn capture_retry(&mut self) {}
    fn info(&mut self, _message: &str) {}
}

/// Running count and total of one stage timing or metric.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunningTotal {
    pub count: u64,
    pub total: f64,
}

impl RunningTotal {
    fn add(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
    }

    pub fn mean(&self) -> f64 {
        self.total / self.count.max(1) as f64
    }
}

/// CLI logger: prints the per-cycle audit line to stdout and keeps running
/// timing/metric totals for a shutdown summary.
///
/// Memory stays constant however long the loop runs. Cycles with nobody in
/// frame print nothing.
pub struct StdoutLoopLogger {
    timings: HashMap<String, RunningTotal>,
    metrics: HashMap<String, RunningTotal>,
    decisions: HashMap<AccessState, usize>,
    retries: usize,
    start_time: Instant,
}

impl StdoutLoopLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            metrics: HashMap::new(),
            decisions: HashMap::new(),
            retries: 0,
            start_time: Instant::now(),
        }
    }

    pub fn cycles(&self) -> usize {
        self.decisions.values().sum()
    }

    pub fn decisions_for(&self, state: AccessState) -> usize {
        self.decisions.get(&state).copied().unwrap_or(0)
    }

    pub fn timings_for(&self, stage: &str) -> Option<RunningTotal> {
        self.timings.get(stage).copied()
    }

    /// Returns the formatted summary string, or `None` if no cycle ran.
    pub fn summary_string(&self) -> Option<String> {
        let cycles = self.cycles();
        if cycles == 0 && self.retries == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Loop summary ({cycles} cycles, {} capture retries, {:.1}s total):",
            self.retries,
            elapsed_ms / 1000.0
        )];

        for state in AccessState::ALL {
            lines.push(format!("  {:8}: {}", state.to_string(), self.decisions_for(state)));
        }

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = self.timings[stage];
            let (avg_ms, total_ms) = (durations.mean(), durations.total);
            lines.push(format!("  {stage:8}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms"));
        }

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            let avg = self.metrics[name].mean();
            lines.push(format!("  {name}: avg {avg:.1}"));
        }

        if cycles > 0 && elapsed_ms > 0.0 {
            let fps = cycles as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} cycles/s"));
        }

        Some(lines.join("\n"))
    }
}

impl Default for StdoutLoopLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopLogger for StdoutLoopLogger {
    fn decision(&mut self, state: AccessState) {
        *self.decisions.entry(state).or_default() += 1;
        if let Some(line) = state.audit_message() {
            println!("{line}");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .add(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .add(value);
    }

    fn capture_retry(&mut self) {
        self.retries += 1;
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullLoopLogger;
        logger.decision(AccessState::Denied);
        logger.timing("analyze", 5.0);
        logger.metric("faces", 1.0);
        logger.capture_retry();
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_decisions_are_counted_per_state() {
        let mut logger = StdoutLoopLogger::new();
        logger.decision(AccessState::Unlocked);
        logger.decision(AccessState::Locked);
        logger.decision(AccessState::Locked);

        assert_eq!(logger.cycles(), 3);
        assert_eq!(logger.decisions_for(AccessState::Locked), 2);
        assert_eq!(logger.decisions_for(AccessState::Denied), 0);
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = StdoutLoopLogger::new();
        logger.timing("analyze", 20.0);
        logger.timing("analyze", 30.0);

        let analyze = logger.timings_for("analyze").unwrap();
        assert_eq!(analyze.count, 2);
        approx::assert_relative_eq!(analyze.total, 50.0);
        approx::assert_relative_eq!(analyze.mean(), 25.0);
        assert!(logger.timings_for("render").is_none());
    }

    #[test]
    fn test_long_run_keeps_one_total_per_stage() {
        let mut logger = StdoutLoopLogger::new();
        for _ in 0..100_000 {
            for stage in ["capture", "analyze", "render", "display"] {
                logger.timing(stage, 2.0);
            }
            logger.metric("faces", 1.0);
        }

        assert_eq!(logger.timings.len(), 4);
        assert_eq!(logger.metrics.len(), 1);
        let analyze = logger.timings_for("analyze").unwrap();
        assert_eq!(analyze.count, 100_000);
        approx::assert_relative_eq!(analyze.mean(), 2.0);
        approx::assert_relative_eq!(logger.metrics["faces"].mean(), 1.0);
    }

    #[test]
    fn test_summary_includes_stages_states_and_retries() {
        let mut logger = StdoutLoopLogger::new();
        logger.decision(AccessState::Denied);
        logger.timing("capture", 4.0);
        logger.metric("faces", 1.0);
        logger.capture_retry();

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Loop summary (1 cycles, 1 capture retries"));
        assert!(summary.contains("denied"));
        assert!(summary.contains("capture"));
        assert!(summary.contains("faces: avg 1.0"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(StdoutLoopLogger::new().summary_string().is_none());
    }
}
