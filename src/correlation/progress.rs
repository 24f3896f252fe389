//! Elapsed-time-gated progress reporting for long origin loops.
//!
//! Reports go to `tracing` at `trace` level and, when `verbose` is set, to an
//! `indicatif` progress bar on stderr. Reporting never affects results.
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

pub struct LoopProgress {
    bar: Option<ProgressBar>,
    interval: Duration,
    last_report: Instant,
    label: &'static str,
}

impl LoopProgress {
    /// `len == 0` means the number of steps is unknown and draws a spinner.
    pub fn new(len: usize, label: &'static str, verbose: bool, interval: Duration) -> Self {
        let bar = verbose.then(|| {
            if len == 0 {
                let pb = ProgressBar::new_spinner();
                pb.set_message(label);
                return pb;
            }
            let pb = ProgressBar::new(len as u64);
            let style = ProgressStyle::with_template(
                "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}]",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
            pb.set_style(style);
            pb.set_message(label);
            pb
        });
        LoopProgress { bar, interval, last_report: Instant::now(), label }
    }

    /// Record one finished step. `time` is the physical time of the step
    /// (origin time, first frame of a chunk) used in the message.
    pub fn step(&mut self, index: usize, time: f64) {
        if let Some(pb) = &self.bar {
            pb.inc(1);
            pb.tick();
        }
        let now = Instant::now();
        if now.duration_since(self.last_report) < self.interval {
            return;
        }
        let per_step = now.duration_since(self.last_report);
        self.last_report = now;
        let elapsed_ms = per_step.as_secs_f64() * 1e3;
        tracing::trace!(step = index, time, elapsed_ms, "{}", self.label);
        if let Some(pb) = &self.bar {
            pb.set_message(format!("{} @ {time:.3}", self.label));
        }
    }

    pub fn finish(self) {
        if let Some(pb) = self.bar {
            pb.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_progress_accepts_steps_without_a_bar() {
        let mut progress = LoopProgress::new(3, "origins", false, Duration::ZERO);
        for i in 0..3 {
            progress.step(i, i as f64);
        }
        assert!(progress.bar.is_none());
        progress.finish();
    }
}
