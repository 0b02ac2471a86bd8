use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for try-on orchestration events.
///
/// Decouples the use case from specific output mechanisms so each caller can
/// observe a run without changing the orchestration code.
pub trait TryOnLogger: Send {
    /// Report per-frame progress.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record that a frame was composed from the placeholder.
    fn placeholder_used(&mut self, frame_name: &str);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
///
/// Used by embedders with their own progress reporting and by tests.
pub struct NullTryOnLogger;

impl TryOnLogger for NullTryOnLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn placeholder_used(&mut self, _frame_name: &str) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI-oriented logger that tracks per-stage timing and prints a summary
/// when the run completes.
pub struct StdoutTryOnLogger {
    timings: HashMap<String, Vec<f64>>,
    placeholders: Vec<String>,
    start_time: Instant,
    total_frames: usize,
    messages: Vec<String>,
}

impl StdoutTryOnLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            placeholders: Vec::new(),
            start_time: Instant::now(),
            total_frames: 0,
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary string, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.total_frames == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.total_frames;
        let mut lines = Vec::new();

        lines.push(format!(
            "Try-on summary ({frames} frames, {:.1}s total):",
            elapsed_ms / 1000.0
        ));

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = if durations.is_empty() {
                0.0
            } else {
                total_ms / durations.len() as f64
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms"
            ));
        }

        if !self.placeholders.is_empty() {
            lines.push(format!(
                "  Placeholders: {} ({})",
                self.placeholders.len(),
                self.placeholders.join(", ")
            ));
        }

        Some(lines.join("\n"))
    }

    /// Returns the timing data for a given stage.
    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }
}

impl Default for StdoutTryOnLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl TryOnLogger for StdoutTryOnLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_frames = total;
        if total > 0 {
            log::info!("Trying on frame {current}/{total}");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn placeholder_used(&mut self, frame_name: &str) {
        self.placeholders.push(frame_name.to_string());
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
