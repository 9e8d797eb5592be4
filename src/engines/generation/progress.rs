use super::evolution_engine::{BestReport, GenerationSummary, ProgressCallback};
use std::io::Write;

/// Writes each new best expression to `out` (`<expr>;`) and a progress line
/// to `diagnostics`. Generation boundaries are left to the log.
pub struct ConsoleProgressCallback<O: Write, D: Write> {
    out: O,
    diagnostics: D,
}

impl ConsoleProgressCallback<std::io::Stdout, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl<O: Write, D: Write> ConsoleProgressCallback<O, D> {
    pub fn new(out: O, diagnostics: D) -> Self {
        Self { out, diagnostics }
    }

    pub fn into_inner(self) -> (O, D) {
        (self.out, self.diagnostics)
    }
}

/// `FITNESS=<fitness>\tGENERATION=<n>\tSECONDS=<s>`, where the seconds are
/// printed with millisecond precision rather than truncated to whole seconds.
pub fn progress_line(report: &BestReport) -> String {
    format!(
        "FITNESS={:.6E}\tGENERATION={}\tSECONDS={:.3}",
        report.fitness, report.generation, report.elapsed_seconds
    )
}

impl<O: Write, D: Write> ProgressCallback for ConsoleProgressCallback<O, D> {
    fn on_generation_start(&mut self, generation: u64) {
        log::trace!("Generation {} starting", generation);
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        log::trace!(
            "Generation {} complete, best {:?}",
            summary.generation,
            summary.best_fitness
        );
    }

    fn on_new_best(&mut self, report: &BestReport) {
        // Write failures are logged, not fatal.
        if let Err(e) = writeln!(self.out, "{};", report.expression).and_then(|_| self.out.flush()) {
            log::warn!("Failed to write expression: {}", e);
        }
        if let Err(e) = writeln!(self.diagnostics, "{}", progress_line(report)) {
            log::warn!("Failed to write progress: {}", e);
        }
    }
}

/// Forwards progress to another thread.
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone)]
pub enum ProgressMessage {
    GenerationStart(u64),
    GenerationComplete(GenerationSummary),
    NewBest(BestReport),
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: u64) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete(summary.clone()));
    }

    fn on_new_best(&mut self, report: &BestReport) {
        let _ = self.sender.send(ProgressMessage::NewBest(report.clone()));
    }
}
